//! # 上传流水线模块（uploader）
//!
//! ## 设计思路
//!
//! 该模块将「来源识别 → 载荷加载 → 接口调用 → 历史落库 →
//! URL 变换 → 写剪贴板 → 通知」按职责拆分为多个子模块，
//! 避免单文件膨胀与耦合。
//!
//! - `commands`：仅做 IPC 入参/出参适配（薄封装）
//! - `service`：承载可注入状态（`UploaderState`）与流水线编排
//! - `loader`：负责 URL/Base64/文件/字节来源的统一加载与回退
//! - `api`：负责 Cloudinary 接口调用与响应解析
//! - `error/source`：错误与中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! 前端 invoke / 托盘菜单
//!    ↓
//! commands.rs（参数适配，配置缺失时打开设置）
//!    ↓
//! service.rs（State 注入、BusyGuard、流水线编排）
//!    ├─ loader.rs（来源加载 + 取回失败回退为 URL 引用）
//!    ├─ api.rs（multipart 上传 + secure_url / error.message 解析）
//!    ├─ db（append_upload：落历史 + 容量裁剪）
//!    ├─ transform（套用 w_/h_/c_/q_/f_ 指令段）
//!    └─ clipboard（写入最终 URL，带重试回退）
//!    ↓
//! 返回 AppError 给前端
//! ```

pub mod commands;
mod api;
mod error;
mod loader;
mod service;
mod source;

pub use commands::{upload_image_base64, upload_image_file, upload_image_from_url};
pub use error::UploadError;
pub use service::{
    upload_clipboard_image, UploadOutcome, UploaderState, OPEN_SETTINGS_EVENT, UPLOAD_BUSY_EVENT,
};
pub use source::UploadSource;
