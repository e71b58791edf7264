//! # 剪贴板写入模块
//!
//! ## 设计思路
//!
//! 上传流水线的终点是把最终 URL 放进系统剪贴板。写入在
//! `spawn_blocking` 中执行（`arboard` 是同步 API），首次失败后
//! 做有限次数的退避重试作为回退路径。
//!
//! ## 错误语义
//!
//! - 托盘/后台路径：重试仍失败时静默（仅日志），不打断上传结果。
//! - popup 路径：`copy_text_to_clipboard` 命令把失败上抛为
//!   `AppError::Clipboard`，由前端以 toast 呈现。

use crate::error::AppError;

const CLIPBOARD_RETRIES: u32 = 3;
const CLIPBOARD_RETRY_DELAY_MS: u64 = 100;

fn try_write_text(text: &str) -> Result<(), String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| format!("无法访问剪贴板：{}", e))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| format!("写入失败：{}", e))
}

/// 写入剪贴板，失败时有限重试；最终结果以 bool 返回。
///
/// 调用方自行决定失败要不要对用户可见。
pub async fn write_text_with_fallback(text: String) -> bool {
    let result = tokio::task::spawn_blocking(move || {
        let mut last_error = None;

        for attempt in 1..=CLIPBOARD_RETRIES {
            if attempt > 1 {
                log::debug!("🔄 剪贴板重试 {}/{}", attempt, CLIPBOARD_RETRIES);
                std::thread::sleep(std::time::Duration::from_millis(CLIPBOARD_RETRY_DELAY_MS));
            }

            match try_write_text(&text) {
                Ok(()) => {
                    log::debug!("✅ URL 已写入剪贴板 (尝试 {})", attempt);
                    return Ok(());
                }
                Err(e) => {
                    log::warn!("❌ 剪贴板写入尝试 {} 失败: {}", attempt, e);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "未知错误".to_string()))
    })
    .await;

    match result {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            log::warn!("剪贴板写入最终失败: {err}");
            false
        }
        Err(err) => {
            log::warn!("剪贴板写入线程执行失败: {err}");
            false
        }
    }
}

/// popup 复制按钮使用的命令：失败上抛，由前端 toast 呈现。
#[tauri::command]
pub async fn copy_text_to_clipboard(text: String) -> Result<(), AppError> {
    if write_text_with_fallback(text).await {
        Ok(())
    } else {
        Err(AppError::Clipboard("多次重试后仍写入失败".to_string()))
    }
}
