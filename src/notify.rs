//! 系统通知模块
//!
//! fire-and-forget：通知发送失败只记日志，绝不影响上传流水线本身。

use tauri::{AppHandle, Wry};
use tauri_plugin_notification::NotificationExt;

/// 发送一条 (标题, 正文) 系统通知。
pub fn notify(app: &AppHandle<Wry>, title: &str, body: &str) {
    if let Err(err) = app
        .notification()
        .builder()
        .title(title)
        .body(body)
        .show()
    {
        log::warn!("发送系统通知失败: {err}");
    }
}
