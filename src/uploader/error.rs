//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载上传链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配
//! （命令层专门匹配 `ConfigMissing` 以打开设置界面）。

/// 上传流水线统一错误类型。
///
/// 该类型会在命令层被上转为 `AppError`，最终透传给前端。
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// Cloud Name 或 Upload Preset 未配置，任何网络调用之前即检出
    #[error("缺少 Cloud Name 或 Upload Preset，请先在设置中完成配置")]
    ConfigMissing,

    #[error("网络错误：{0}")]
    Network(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    /// 上传接口返回非成功状态，消息优先取响应体中的 error.message
    #[error("上传失败：{0}")]
    Api(String),

    /// 状态码成功但响应体不含可用的 secure_url
    #[error("响应格式异常：{0}")]
    InvalidResponse(String),
}

impl From<UploadError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: UploadError) -> Self {
        error.to_string()
    }
}
