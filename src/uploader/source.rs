//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将「外部输入类型」和「实际提交形态」解耦：
//! - `UploadSource` 表示触发面给出的来源语义
//! - `UploadPayload` 表示 multipart 表单里 `file` 字段的最终形态

/// 上传输入来源。
pub enum UploadSource {
    /// 网络地址来源（右键菜单 / 远端图片）。
    Url(String),
    /// Base64（支持 Data URL 与纯 Base64 字符串，来自 popup 粘贴/拖放）。
    Base64(String),
    /// 本地文件路径来源（文件选择器）。
    FilePath(String),
    /// 已就绪的原始字节（托盘剪贴板图片）。
    Bytes(Vec<u8>),
}

/// 提交给上传接口的 `file` 字段载荷。
#[derive(Debug)]
pub(crate) enum UploadPayload {
    /// 二进制部件：字节 + 推断出的文件名与 MIME。
    Binary {
        bytes: Vec<u8>,
        filename: String,
        mime: String,
    },
    /// 源图片取回失败时的回退：把 URL 字符串直接交给远端拉取。
    Reference(String),
}
