//! # 列表视图状态模块
//!
//! ## 设计思路
//!
//! popup 的历史列表需要一个分页游标（每页 10 条、「加载更多」递增、
//! 删除/清空后复位）。游标收敛在显式的 [`HistoryView`] 对象里，
//! 渲染是纯函数：权威数据每次从数据库重新读出，视图状态只保留游标。
//!
//! ## 排序约定
//!
//! 存储层保证插入顺序（最新在前），渲染层再按时间戳降序做一次
//! 防御性重排 —— 两者独立成立、分别可测，时钟回拨时以渲染层为准。

use serde::Serialize;
use std::sync::Mutex;

use tauri::{AppHandle, State};

use crate::db::{self, DbState, UploadRecord};
use crate::error::AppError;
use crate::settings;
use crate::transform::{transform, TransformConfig};

/// 每页条数与「加载更多」步长
pub const PAGE_SIZE: usize = 10;

/// 渲染结果中的单行
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedUpload {
    pub id: String,
    /// 原始 secure_url（缩略图与「查看原图」用）
    pub url: String,
    /// 套用当前变换配置后的 URL（复制按钮用）
    pub transformed_url: String,
    pub timestamp: i64,
}

/// 一次渲染的完整输出
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedHistory {
    pub items: Vec<RenderedUpload>,
    /// 还有多少条未展示；为 0 时前端不渲染「加载更多」
    pub remaining: usize,
    /// 全量历史条数（未分页）
    pub total: usize,
}

/// 分页游标。渲染/更新操作显式接收并返回它，不藏在模块级可变状态里。
#[derive(Debug)]
pub struct HistoryView {
    display_count: usize,
}

impl Default for HistoryView {
    fn default() -> Self {
        Self {
            display_count: PAGE_SIZE,
        }
    }
}

impl HistoryView {
    /// 「加载更多」：游标前移一页。
    pub fn load_more(&mut self) {
        self.display_count += PAGE_SIZE;
    }

    /// 底层列表发生删除/清空后调用：游标复位到第一页。
    pub fn reset(&mut self) {
        self.display_count = PAGE_SIZE;
    }

    /// 渲染：按时间戳降序重排 → 截取 `[0, display_count)` → 计算剩余数。
    pub fn render(&self, records: &[UploadRecord], config: &TransformConfig) -> RenderedHistory {
        let mut sorted: Vec<&UploadRecord> = records.iter().collect();
        // 稳定排序：时间戳相同的记录保持存储层的插入顺序
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let total = sorted.len();
        let items = sorted
            .into_iter()
            .take(self.display_count)
            .map(|record| RenderedUpload {
                id: record.id.clone(),
                url: record.url.clone(),
                transformed_url: transform(&record.url, config),
                timestamp: record.timestamp,
            })
            .collect();

        RenderedHistory {
            items,
            remaining: total.saturating_sub(self.display_count),
            total,
        }
    }
}

/// 视图状态封装，由 Tauri 托管
pub struct ViewState(pub Mutex<HistoryView>);

impl Default for ViewState {
    fn default() -> Self {
        Self(Mutex::new(HistoryView::default()))
    }
}

fn with_view<T>(
    state: &ViewState,
    op: impl FnOnce(&mut HistoryView) -> T,
) -> Result<T, AppError> {
    let mut view = state
        .0
        .lock()
        .map_err(|e| AppError::Storage(format!("获取视图状态锁失败: {}", e)))?;
    Ok(op(&mut view))
}

fn render_current(
    app: &AppHandle,
    db: &DbState,
    view: &ViewState,
) -> Result<RenderedHistory, AppError> {
    let settings = settings::load_settings(app)?;
    let records = db::with_conn(db, db::list_uploads)?;
    with_view(view, |v| v.render(&records, &settings.transformations))
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// 以当前游标渲染历史列表。
#[tauri::command]
pub fn history_render(
    app: AppHandle,
    db: State<'_, DbState>,
    view: State<'_, ViewState>,
) -> Result<RenderedHistory, AppError> {
    render_current(&app, &db, &view)
}

/// 「加载更多」后重新渲染。
#[tauri::command]
pub fn history_load_more(
    app: AppHandle,
    db: State<'_, DbState>,
    view: State<'_, ViewState>,
) -> Result<RenderedHistory, AppError> {
    with_view(&view, HistoryView::load_more)?;
    render_current(&app, &db, &view)
}

/// 删除一条记录（id 不存在时为 no-op），游标复位后重新渲染。
#[tauri::command]
pub fn history_delete(
    app: AppHandle,
    db: State<'_, DbState>,
    view: State<'_, ViewState>,
    id: String,
) -> Result<RenderedHistory, AppError> {
    db::with_conn(&db, |conn| db::delete_upload(conn, &id))?;
    with_view(&view, HistoryView::reset)?;
    render_current(&app, &db, &view)
}

/// 清空历史，游标复位后重新渲染。
#[tauri::command]
pub fn history_clear(
    app: AppHandle,
    db: State<'_, DbState>,
    view: State<'_, ViewState>,
) -> Result<RenderedHistory, AppError> {
    db::with_conn(&db, db::clear_uploads)?;
    with_view(&view, HistoryView::reset)?;
    render_current(&app, &db, &view)
}
