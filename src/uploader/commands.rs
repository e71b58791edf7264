//! # Tauri 命令层
//!
//! ## 设计思路
//!
//! 命令层仅做 IPC 参数接收与结果返回，不承载业务逻辑。
//! 所有实际处理交由 `UploaderState`，保持命令函数薄、稳定、易测试。
//!
//! popup 触发的命令把错误原样返回（前端以 toast 呈现）；
//! 配置缺失时统一先打开设置界面再返回错误。

use tauri::{AppHandle, State, Wry};

use super::service::{self, UploadOutcome, UploaderState};
use super::{UploadError, UploadSource};
use crate::db::DbState;
use crate::error::AppError;

fn surface_config_missing(app: &AppHandle<Wry>, err: AppError) -> AppError {
    if matches!(err, AppError::Upload(UploadError::ConfigMissing)) {
        service::open_settings(app);
    }
    err
}

/// 上传一个远端图片 URL（右键菜单 / 链接上传）。
///
/// 后台触发面：结果与失败都以系统通知呈现，同时把结果返回给
/// 调用方以便刷新列表。
#[tauri::command]
pub async fn upload_image_from_url(
    app: AppHandle<Wry>,
    db: State<'_, DbState>,
    state: State<'_, UploaderState>,
    url: String,
) -> Result<UploadOutcome, AppError> {
    state
        .upload_with_notifications(&app, &db, UploadSource::Url(url))
        .await
}

/// 上传 popup 粘贴/拖放得到的 Base64 图片。
#[tauri::command]
pub async fn upload_image_base64(
    app: AppHandle<Wry>,
    db: State<'_, DbState>,
    state: State<'_, UploaderState>,
    data: String,
) -> Result<UploadOutcome, AppError> {
    state
        .upload(&app, &db, UploadSource::Base64(data))
        .await
        .map_err(|err| surface_config_missing(&app, err))
}

/// 上传文件选择器选中的本地图片。
#[tauri::command]
pub async fn upload_image_file(
    app: AppHandle<Wry>,
    db: State<'_, DbState>,
    state: State<'_, UploaderState>,
    path: String,
) -> Result<UploadOutcome, AppError> {
    state
        .upload(&app, &db, UploadSource::FilePath(path))
        .await
        .map_err(|err| surface_config_missing(&app, err))
}
