//! # 上传历史数据库模块
//!
//! ## 设计思路
//!
//! 上传历史集中存放在 Rust 后端的 SQLite 中，前端通过 Tauri IPC 调用。
//! 使用 `rusqlite` 直接操作，单一数据源、后端统一管控。
//!
//! ## 关键约束
//!
//! - 记录按插入顺序排列（最新在前），与时间戳无关：`seq` 自增列
//!   承载插入顺序，列表视图另行按时间戳防御性重排。
//! - 容量上限由设置中的 `history_limit` 控制，追加后立即裁掉尾部。
//! - `id` 全局唯一是硬性不变量，由 UNIQUE 约束兜底。

use std::fs;
use std::sync::Mutex;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tauri::{AppHandle, State};

use crate::error::AppError;

mod config;
mod history;
mod schema;

pub(crate) use history::{append_upload, clear_uploads, delete_upload, list_uploads};

// ============================================================================
// 数据模型
// ============================================================================

/// 一次已完成上传的历史记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRecord {
    /// 形如 `upload-<毫秒>-<随机后缀>`，创建后不变
    pub id: String,
    /// 上传接口返回的规范 URL，创建后不变
    pub url: String,
    /// 创建时刻的毫秒时间戳
    pub timestamp: i64,
}

// ============================================================================
// 数据库状态（Tauri Managed State）
// ============================================================================

/// 数据库连接封装，由 Tauri 托管
pub struct DbState(pub Mutex<Connection>);

pub(crate) fn with_conn<T>(
    state: &DbState,
    op: impl FnOnce(&Connection) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let conn = state
        .0
        .lock()
        .map_err(|e| AppError::Database(format!("获取数据库锁失败: {}", e)))?;
    op(&conn)
}

// ============================================================================
// 数据库初始化
// ============================================================================

/// 初始化数据库连接与 Schema
///
/// 在 `main.rs` 的 `setup` 阶段调用，创建表结构并执行迁移。
/// 返回的 `Connection` 将被包装为 `DbState` 注册到 Tauri 状态管理中。
pub fn init_db(app: &AppHandle) -> Result<Connection, AppError> {
    let db_path = config::resolve_db_path(app)?;
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Database(format!("创建数据库目录失败: {}", e)))?;
    }
    log::info!("数据库路径: {}", db_path.display());

    let conn = Connection::open(&db_path)
        .map_err(|e| AppError::Database(format!("打开数据库失败: {}", e)))?;

    schema::initialize_schema(&conn)?;

    Ok(conn)
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// 读取完整历史（最新插入在前）。
#[tauri::command]
pub fn db_get_history(state: State<'_, DbState>) -> Result<Vec<UploadRecord>, AppError> {
    with_conn(&state, history::list_uploads)
}
