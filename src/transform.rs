//! # URL 变换模块
//!
//! ## 设计思路
//!
//! Cloudinary 通过在路径的 `upload` 段之后插入一个逗号分隔的指令段
//! （如 `w_200,h_100`）来做 URL 级图片处理。本模块把
//! 「原始 URL + 变换配置 → 变换后 URL」实现为一个纯函数：
//! 不做网络请求、不读全局状态、对同一输入恒定输出。
//!
//! ## 实现思路
//!
//! - 用 [`RewriteTarget`] 显式表达「可改写 / 不适用」两种解析结果，
//!   不适用（解析失败、非 Cloudinary 域名、路径中没有 `upload` 段、
//!   没有任何已设置的变换字段）时原样返回输入。
//! - 指令段固定顺序：`w_` → `h_` → `c_` → `q_` → `f_`。
//! - `format` 非 `auto` 时同时替换末段文件扩展名。
//!
//! 注意：该函数不保证重复套用的幂等性 —— 对已变换过的 URL 再次调用
//! 会插入第二个指令段。调用方必须始终以历史中存储的原始 URL 为输入。

use serde::{Deserialize, Serialize};
use url::Url;

/// URL 变换配置
///
/// 由设置表单写入、核心只读。`enabled` 为总开关，关闭时变换为恒等函数。
/// 可选字段未设置（或为 0 / 空串）时不产生对应指令。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformConfig {
    pub enabled: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: Option<String>,
    pub format: Option<String>,
    pub crop: Option<String>,
}

impl TransformConfig {
    /// 规范化存储形态：空串与 0 统一收敛为「未设置」。
    pub(crate) fn normalized(mut self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        }
        self.width = self.width.filter(|w| *w > 0);
        self.height = self.height.filter(|h| *h > 0);
        self.quality = clean(self.quality);
        self.format = clean(self.format);
        self.crop = clean(self.crop);
        self
    }

    /// 按固定顺序（w → h → c → q → f）产出指令 token。
    fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        if let Some(width) = self.width.filter(|w| *w > 0) {
            tokens.push(format!("w_{width}"));
        }
        if let Some(height) = self.height.filter(|h| *h > 0) {
            tokens.push(format!("h_{height}"));
        }
        if let Some(crop) = self.crop.as_deref().filter(|s| !s.is_empty()) {
            tokens.push(format!("c_{crop}"));
        }
        if let Some(quality) = self.quality.as_deref().filter(|s| !s.is_empty()) {
            tokens.push(format!("q_{quality}"));
        }
        if let Some(format) = self.format.as_deref().filter(|s| !s.is_empty()) {
            tokens.push(format!("f_{format}"));
        }
        tokens
    }

    /// `format` 设置为非 `auto` 的具体格式时，才替换文件扩展名。
    fn extension_override(&self) -> Option<&str> {
        self.format
            .as_deref()
            .filter(|f| !f.is_empty() && *f != "auto")
    }
}

/// URL 的显式分类结果。
///
/// 失败开放（fail-open）语义由调用侧的显式分支承担，
/// 这里只负责判定，不吞异常。
enum RewriteTarget {
    /// 托管图片 URL，可以在 `upload` 段之后插入指令段。
    Applicable {
        url: Url,
        segments: Vec<String>,
        upload_index: usize,
    },
    /// 解析失败、域名不匹配或路径形状不符，原样返回。
    NotApplicable,
}

fn classify(raw: &str) -> RewriteTarget {
    let Ok(url) = Url::parse(raw) else {
        return RewriteTarget::NotApplicable;
    };
    let Some(host) = url.host_str() else {
        return RewriteTarget::NotApplicable;
    };
    if !host.contains("cloudinary") {
        return RewriteTarget::NotApplicable;
    }

    let segments: Vec<String> = url.path().split('/').map(str::to_string).collect();
    let Some(upload_index) = segments.iter().position(|s| s == "upload") else {
        return RewriteTarget::NotApplicable;
    };

    RewriteTarget::Applicable {
        url,
        segments,
        upload_index,
    }
}

/// 对上传得到的 URL 套用变换配置。
///
/// 配置关闭、URL 不适用或没有任何指令时返回输入本身；
/// 该函数不返回错误，也不 panic。
pub fn transform(raw: &str, config: &TransformConfig) -> String {
    if !config.enabled {
        return raw.to_string();
    }

    match classify(raw) {
        RewriteTarget::NotApplicable => raw.to_string(),
        RewriteTarget::Applicable {
            mut url,
            mut segments,
            upload_index,
        } => {
            let tokens = config.tokens();
            if tokens.is_empty() {
                return raw.to_string();
            }

            segments.insert(upload_index + 1, tokens.join(","));

            if let Some(format) = config.extension_override() {
                if let Some(last) = segments.last_mut() {
                    if let Some(dot) = last.rfind('.') {
                        *last = format!("{}.{}", &last[..dot], format);
                    }
                }
            }

            url.set_path(&segments.join("/"));
            url.to_string()
        }
    }
}
