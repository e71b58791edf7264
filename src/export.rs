//! # 历史导出模块
//!
//! ## 设计思路
//!
//! 把全量（未分页）历史导出为一个自描述 JSON 文档：
//!
//! ```json
//! {
//!   "exported": "2026-08-06T12:00:00.000Z",
//!   "count": 2,
//!   "uploads": [
//!     { "url": "...", "transformedUrl": "...", "timestamp": 1754480000000,
//!       "date": "2026-08-06T11:33:20.000Z" }
//!   ]
//! }
//! ```
//!
//! `transformedUrl` 按导出时刻的变换配置计算；`count` 恒等于
//! `uploads.length` 与全量历史长度。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tauri::{AppHandle, State};

use crate::db::{self, DbState, UploadRecord};
use crate::error::AppError;
use crate::settings;
use crate::transform::{transform, TransformConfig};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedUpload {
    pub url: String,
    pub transformed_url: String,
    pub timestamp: i64,
    /// `timestamp` 的 ISO-8601 UTC 表示（毫秒精度）
    pub date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportDocument {
    pub exported: String,
    pub count: usize,
    pub uploads: Vec<ExportedUpload>,
}

/// 毫秒时间戳 → `YYYY-MM-DDTHH:MM:SS.mmmZ`。
///
/// 超出 chrono 可表示范围的异常值退化为空串，导出不因此中断。
fn iso_millis(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// 组装导出文档（纯函数，时刻由调用方注入以便测试）。
pub fn build_export(
    records: &[UploadRecord],
    config: &TransformConfig,
    exported_at: DateTime<Utc>,
) -> ExportDocument {
    let uploads: Vec<ExportedUpload> = records
        .iter()
        .map(|record| ExportedUpload {
            url: record.url.clone(),
            transformed_url: transform(&record.url, config),
            timestamp: record.timestamp,
            date: iso_millis(record.timestamp),
        })
        .collect();

    ExportDocument {
        exported: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        count: uploads.len(),
        uploads,
    }
}

fn current_export(app: &AppHandle, db: &DbState) -> Result<ExportDocument, AppError> {
    let settings = settings::load_settings(app)?;
    let records = db::with_conn(db, db::list_uploads)?;
    Ok(build_export(
        &records,
        &settings.transformations,
        Utc::now(),
    ))
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// 生成导出文档并返回给前端。
#[tauri::command]
pub fn export_history(
    app: AppHandle,
    db: State<'_, DbState>,
) -> Result<ExportDocument, AppError> {
    current_export(&app, &db)
}

/// 生成导出文档并写入指定路径（前端通过保存对话框选定）。
#[tauri::command]
pub fn export_history_to_file(
    app: AppHandle,
    db: State<'_, DbState>,
    path: String,
) -> Result<(), AppError> {
    let document = current_export(&app, &db)?;
    let content = serde_json::to_string_pretty(&document)
        .map_err(|e| AppError::Storage(format!("序列化导出文档失败: {}", e)))?;
    std::fs::write(&path, content)?;
    log::info!("历史已导出到 {path}");
    Ok(())
}
