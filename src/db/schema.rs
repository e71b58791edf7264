//! Schema 初始化子模块
//!
//! ## 职责
//! - 创建数据库表结构与索引
//! - 设置 SQLite 运行参数（WAL）
//! - 通过 `user_version` 预留后续迁移入口
//!
//! ## 错误语义
//! - DDL 失败统一映射为 `AppError::Database`

use rusqlite::Connection;

use crate::error::AppError;

const SCHEMA_VERSION: i64 = 1;

fn get_user_version(conn: &Connection) -> Result<i64, AppError> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| AppError::Database(format!("读取数据库版本失败: {}", e)))
}

fn set_user_version(conn: &Connection, version: i64) -> Result<(), AppError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| AppError::Database(format!("写入数据库版本失败: {}", e)))
}

fn create_base_tables(conn: &Connection) -> Result<(), AppError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS uploads (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            url TEXT NOT NULL,
            timestamp INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_uploads_timestamp ON uploads(timestamp DESC);",
    )
    .map_err(|e| AppError::Database(format!("创建基础表失败: {}", e)))
}

/// 初始化表结构与运行参数。
///
/// 幂等：重复调用不破坏既有数据。`seq` 自增列是插入顺序的唯一依据，
/// 绝不可改为按时间戳主键。
pub(crate) fn initialize_schema(conn: &Connection) -> Result<(), AppError> {
    // journal_mode 返回结果行，走 query_row 而非 execute
    conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))
        .map_err(|e| AppError::Database(format!("设置 WAL 模式失败: {}", e)))?;

    create_base_tables(conn)?;

    let version = get_user_version(conn)?;
    if version < SCHEMA_VERSION {
        set_user_version(conn, SCHEMA_VERSION)?;
    }

    Ok(())
}
