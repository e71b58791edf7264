//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `UploaderState` 作为 Tauri 注入状态，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由 `main.rs` 统一管理）
//! 2. 测试可创建独立实例（接口基址可替换，mock 服务直接注入）
//! 3. 后续可扩展多实例或按会话配置
//!
//! ## 流水线编排
//!
//! ```text
//! 读取设置 → 配置检查 → 取源加载 → multipart 上传
//!    → 追加历史 → URL 变换 → 写剪贴板 → 返回结果
//! ```
//!
//! 忙碌指示用 RAII 守卫实现：进入流水线即置忙，任何路径退出
//! （包括错误提前返回）都会在 `Drop` 中复位。

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager, Wry};

use super::api::DEFAULT_API_BASE;
use super::source::UploadSource;
use super::UploadError;
use crate::db::{self, DbState, UploadRecord};
use crate::error::AppError;
use crate::notify::notify;
use crate::{clipboard, settings, transform};

/// 忙碌状态事件（前端据此切换 dropzone/图标样式）
pub const UPLOAD_BUSY_EVENT: &str = "upload-busy";
/// 请求前端切到设置界面的事件
pub const OPEN_SETTINGS_EVENT: &str = "open-settings";

/// 托盘触发的全局防重入标志
///
/// 托盘菜单可被快速连点，置位期间的再次触发直接忽略。
/// popup 命令不走此标志（并发上传由数据库锁串行化写入）。
static TRAY_UPLOAD_IN_FLIGHT: Lazy<AtomicBool> = Lazy::new(|| AtomicBool::new(false));

// ============================================================================
// 忙碌指示守卫
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct BusyPayload {
    busy: bool,
}

/// 忙碌指示的 RAII 守卫
///
/// 构造时广播「忙碌」，`Drop` 时广播「空闲」。上传流水线的所有
/// 退出路径（成功、各类错误）都经过同一个守卫，保证指示必然复位。
struct BusyGuard {
    app: AppHandle<Wry>,
}

impl BusyGuard {
    fn new(app: &AppHandle<Wry>) -> Self {
        let _ = app.emit(UPLOAD_BUSY_EVENT, BusyPayload { busy: true });
        Self { app: app.clone() }
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let _ = self.app.emit(UPLOAD_BUSY_EVENT, BusyPayload { busy: false });
    }
}

// ============================================================================
// 上传器与结果模型
// ============================================================================

/// HTTP 客户端与接口基址的封装。
///
/// 不配置额外超时：单次尝试、传输层默认行为（失败即上浮，无重试）。
pub(crate) struct Uploader {
    pub(crate) http: reqwest::Client,
    pub(crate) api_base: String,
}

impl Uploader {
    pub(crate) fn new() -> Result<Self, UploadError> {
        Self::with_api_base(DEFAULT_API_BASE.to_string())
    }

    pub(crate) fn with_api_base(api_base: impl Into<String>) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| UploadError::Network(format!("无法创建 HTTP 客户端：{}", e)))?;
        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }
}

/// 一次成功上传的完整结果。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    /// 已写入历史的记录（存储的是原始 `secure_url`）
    pub record: UploadRecord,
    /// 套用当前变换配置后的最终 URL（也是剪贴板内容）
    pub final_url: String,
    /// 剪贴板写入是否成功；popup 据此决定 toast 文案
    pub clipboard_copied: bool,
}

// ============================================================================
// 服务状态
// ============================================================================

/// 上传服务状态。
///
/// 作为 Tauri `State` 注入到命令层，内部持有 `Uploader`。
pub struct UploaderState {
    uploader: Uploader,
}

impl UploaderState {
    pub fn new() -> Result<Self, UploadError> {
        Ok(Self {
            uploader: Uploader::new()?,
        })
    }

    /// 执行完整上传流水线。
    ///
    /// 配置缺失时在任何网络调用之前返回 `ConfigMissing`，
    /// 不产生任何状态变更（忙碌指示除外，它必然复位）。
    pub async fn upload(
        &self,
        app: &AppHandle<Wry>,
        db: &DbState,
        source: UploadSource,
    ) -> Result<UploadOutcome, AppError> {
        let _busy = BusyGuard::new(app);

        let settings = settings::load_settings(app)?;
        if !settings.is_upload_ready() {
            return Err(UploadError::ConfigMissing.into());
        }

        let payload = self.uploader.load_payload(source).await?;
        let secure_url = self.uploader.post_upload(&settings, payload).await?;
        log::info!("✅ 上传成功: {secure_url}");

        let record = db::with_conn(db, |conn| {
            db::append_upload(conn, &secure_url, settings.history_limit)
        })?;

        let final_url = transform::transform(&record.url, &settings.transformations);
        let clipboard_copied = clipboard::write_text_with_fallback(final_url.clone()).await;

        Ok(UploadOutcome {
            record,
            final_url,
            clipboard_copied,
        })
    }

    /// 带系统通知的上传（托盘 / 右键等后台触发面使用）。
    ///
    /// 每个顶层失败恰好产生一条通知；配置缺失额外打开设置界面。
    pub async fn upload_with_notifications(
        &self,
        app: &AppHandle<Wry>,
        db: &DbState,
        source: UploadSource,
    ) -> Result<UploadOutcome, AppError> {
        notify(app, "正在上传到 Cloudinary…", "请稍候…");

        match self.upload(app, db, source).await {
            Ok(outcome) => {
                if outcome.clipboard_copied {
                    notify(app, "上传成功！", "图片链接已复制到剪贴板。");
                } else {
                    // 剪贴板失败在后台路径保持静默，只通报上传本身
                    notify(app, "上传成功！", &outcome.final_url);
                }
                Ok(outcome)
            }
            Err(err) => {
                if matches!(err, AppError::Upload(UploadError::ConfigMissing)) {
                    notify(app, "缺少配置", &err.to_string());
                    open_settings(app);
                } else {
                    notify(app, "上传失败", &err.to_string());
                }
                Err(err)
            }
        }
    }
}

// ============================================================================
// 触发面辅助
// ============================================================================

/// 显示主窗口并让前端切到设置表单。
pub(crate) fn open_settings(app: &AppHandle<Wry>) {
    if let Some(window) = app.get_webview_window("main") {
        if let Err(err) = window.show() {
            log::warn!("打开设置时显示窗口失败: {err}");
        }
        if let Err(err) = window.set_focus() {
            log::warn!("打开设置时聚焦窗口失败: {err}");
        }
    }
    let _ = app.emit(OPEN_SETTINGS_EVENT, ());
}

/// 托盘菜单入口：把系统剪贴板中的图片上传到 Cloudinary。
///
/// 剪贴板读取与 PNG 编码在阻塞线程完成；防重入标志保证同一时刻
/// 只有一个托盘触发的上传在跑。
pub async fn upload_clipboard_image(app: AppHandle<Wry>) {
    if TRAY_UPLOAD_IN_FLIGHT.swap(true, Ordering::SeqCst) {
        log::warn!("已有托盘上传任务进行中，忽略本次触发");
        return;
    }
    // swap 之后的所有路径都要复位标志
    let _flag = InFlightGuard;

    let bytes = match read_clipboard_png().await {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("读取剪贴板图片失败: {err}");
            notify(&app, "无法上传", "剪贴板中没有可用的图片。");
            return;
        }
    };

    // 初始化失败的受限模式下对应状态可能不存在，不能 panic
    let (Some(state), Some(db)) = (
        app.try_state::<UploaderState>(),
        app.try_state::<DbState>(),
    ) else {
        log::error!("上传服务或数据库未初始化，无法处理托盘上传");
        notify(&app, "无法上传", "上传服务未就绪，请重启应用。");
        return;
    };

    let _ = state
        .upload_with_notifications(&app, &db, UploadSource::Bytes(bytes))
        .await;
}

struct InFlightGuard;

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        TRAY_UPLOAD_IN_FLIGHT.store(false, Ordering::SeqCst);
    }
}

/// 读取剪贴板图片并编码为 PNG 字节。
async fn read_clipboard_png() -> Result<Vec<u8>, String> {
    tokio::task::spawn_blocking(|| {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| format!("无法访问剪贴板：{}", e))?;
        let image_data = clipboard
            .get_image()
            .map_err(|e| format!("剪贴板中没有图片：{}", e))?;

        let width = u32::try_from(image_data.width).map_err(|_| "图片宽度异常".to_string())?;
        let height = u32::try_from(image_data.height).map_err(|_| "图片高度异常".to_string())?;
        let buffer = image::RgbaImage::from_raw(width, height, image_data.bytes.into_owned())
            .ok_or_else(|| "剪贴板像素数据长度异常".to_string())?;

        let mut encoded = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(buffer)
            .write_to(&mut encoded, image::ImageFormat::Png)
            .map_err(|e| format!("PNG 编码失败：{}", e))?;

        Ok(encoded.into_inner())
    })
    .await
    .map_err(|e| format!("线程执行失败：{}", e))?
}
