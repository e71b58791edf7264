//! # Cloudinary 上传接口模块
//!
//! ## 设计思路
//!
//! 封装对 `POST /v1_1/{cloud_name}/image/upload` 的一次性调用：
//! multipart 表单（`file` + `upload_preset` + 可选 `folder`），
//! 成功取 `secure_url`，失败优先取响应体的 `error.message`。
//!
//! ## 错误语义
//!
//! - 单次尝试，不做重试；传输层错误映射为 `Network`。
//! - 非成功状态码：能解析出 `error.message` 就用它，否则退回
//!   通用的 "Upload failed"。
//! - 成功状态码但缺 `secure_url`：`InvalidResponse`。

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::service::Uploader;
use super::source::UploadPayload;
use super::UploadError;
use crate::settings::AppSettings;

pub(crate) const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// 接口的错误消息兜底文案（与远端行为保持一致的英文原文）
const GENERIC_UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

impl Uploader {
    /// 执行一次上传调用，返回托管图片的 `secure_url`。
    pub(crate) async fn post_upload(
        &self,
        settings: &AppSettings,
        payload: UploadPayload,
    ) -> Result<String, UploadError> {
        let endpoint = format!(
            "{}/v1_1/{}/image/upload",
            self.api_base, settings.cloud_name
        );

        let file_part = match payload {
            UploadPayload::Binary {
                bytes,
                filename,
                mime,
            } => Part::bytes(bytes)
                .file_name(filename)
                .mime_str(&mime)
                .map_err(|e| UploadError::InvalidFormat(format!("无效的 MIME 类型：{}", e)))?,
            UploadPayload::Reference(url) => Part::text(url),
        };

        let mut form = Form::new()
            .part("file", file_part)
            .text("upload_preset", settings.upload_preset.clone());
        if !settings.folder.is_empty() {
            form = form.text("folder", settings.folder.clone());
        }

        let response = self
            .http
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(format!("上传请求失败：{}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .and_then(|detail| detail.message)
                .unwrap_or_else(|| GENERIC_UPLOAD_FAILED.to_string());
            return Err(UploadError::Api(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| UploadError::InvalidResponse(format!("解析响应失败：{}", e)))?;

        body.secure_url
            .ok_or_else(|| UploadError::InvalidResponse("响应缺少 secure_url 字段".to_string()))
    }
}
