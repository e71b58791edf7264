//! # 来源加载模块
//!
//! ## 设计思路
//!
//! 把四类 [`UploadSource`] 统一加载为 [`UploadPayload`]。
//!
//! ## 错误语义
//!
//! - URL 来源是唯一的「本地可恢复」路径：取回失败不中断流水线，
//!   回退为把 URL 字符串交给远端自行拉取。
//! - Base64 解码失败与文件读取失败直接中断本次上传。

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};

use super::service::Uploader;
use super::source::{UploadPayload, UploadSource};
use super::UploadError;

/// 无法推断类型时的兜底文件名与 MIME。
const FALLBACK_FILENAME: &str = "image.bin";
const FALLBACK_MIME: &str = "application/octet-stream";

impl Uploader {
    /// 把来源统一加载为 multipart 载荷。
    pub(crate) async fn load_payload(
        &self,
        source: UploadSource,
    ) -> Result<UploadPayload, UploadError> {
        match source {
            UploadSource::Url(url) => Ok(self.load_from_url(url).await),
            UploadSource::Base64(data) => load_from_base64(&data),
            UploadSource::FilePath(path) => load_from_file(&path),
            UploadSource::Bytes(bytes) => Ok(payload_from_bytes(bytes, None)),
        }
    }

    /// URL 来源：先尝试取回字节，失败则回退为引用。
    async fn load_from_url(&self, url: String) -> UploadPayload {
        match self.fetch_source_image(&url).await {
            Ok(bytes) => payload_from_bytes(bytes, filename_from_url(&url)),
            Err(err) => {
                log::warn!("源图片取回失败，改为转交 URL 由远端拉取: {err}");
                UploadPayload::Reference(url)
            }
        }
    }

    async fn fetch_source_image(&self, url: &str) -> Result<Vec<u8>, UploadError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| UploadError::Network(format!("请求源图片失败：{}", e)))?;

        if !response.status().is_success() {
            return Err(UploadError::Network(format!(
                "源图片响应 HTTP {}",
                response.status().as_u16()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UploadError::Network(format!("读取源图片失败：{}", e)))?;

        Ok(bytes.to_vec())
    }
}

/// Base64 来源：接受 `data:*;base64,` 前缀或纯 Base64。
fn load_from_base64(data: &str) -> Result<UploadPayload, UploadError> {
    let encoded = match data.split_once(";base64,") {
        Some((_, tail)) => tail,
        None => data,
    };

    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| UploadError::Decode(format!("Base64 解码失败：{}", e)))?;

    if bytes.is_empty() {
        return Err(UploadError::Decode("Base64 内容为空".to_string()));
    }

    Ok(payload_from_bytes(bytes, None))
}

/// 文件来源：读取失败即中断。
fn load_from_file(path: &str) -> Result<UploadPayload, UploadError> {
    if !Path::new(path).exists() {
        return Err(UploadError::FileSystem(format!("文件不存在：{}", path)));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| UploadError::FileSystem(format!("读取文件失败：{}", e)))?;

    let filename = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string());

    Ok(payload_from_bytes(bytes, filename))
}

/// 从字节构造二进制载荷，缺文件名时按内容嗅探推一个。
fn payload_from_bytes(bytes: Vec<u8>, filename: Option<String>) -> UploadPayload {
    let kind = infer::get(&bytes);
    let mime = kind
        .as_ref()
        .map(|k| k.mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());
    let filename = filename.unwrap_or_else(|| {
        kind.as_ref()
            .map(|k| format!("image.{}", k.extension()))
            .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
    });

    UploadPayload::Binary {
        bytes,
        filename,
        mime,
    }
}

/// 从 URL 路径末段提取文件名（带扩展名才算数）。
fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    if last.contains('.') {
        Some(last.to_string())
    } else {
        None
    }
}
