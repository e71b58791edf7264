//! # 应用设置模块
//!
//! ## 设计思路
//!
//! 上传所需的全部配置（Cloud Name、Upload Preset、目标文件夹、
//! 历史容量上限、URL 变换配置）集中为一个类型化的 [`AppSettings`]，
//! 以 `settings.json` 形式持久化在应用数据目录。
//!
//! ## 实现思路
//!
//! - 读取走宽松路径：文件缺失或损坏时回退默认值并记录日志，
//!   不让一份坏配置卡死上传链路。
//! - 写入前统一规范化：裁剪空白、`history_limit` 夹取到 [10, 500]、
//!   空串/0 的变换字段收敛为未设置。
//! - 底层函数以路径为参数，便于在测试中脱离 `AppHandle` 使用。

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tauri::{AppHandle, Manager};

use crate::error::AppError;
use crate::transform::TransformConfig;

/// 历史容量默认值与可配置区间
pub const HISTORY_LIMIT_DEFAULT: u32 = 100;
pub const HISTORY_LIMIT_MIN: u32 = 10;
pub const HISTORY_LIMIT_MAX: u32 = 500;

/// 应用设置
///
/// 字段命名与前端表单保持 camelCase 对齐。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
    pub history_limit: u32,
    pub transformations: TransformConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            upload_preset: String::new(),
            folder: String::new(),
            history_limit: HISTORY_LIMIT_DEFAULT,
            transformations: TransformConfig::default(),
        }
    }
}

impl AppSettings {
    /// 上传前置条件：Cloud Name 与 Upload Preset 均已配置。
    pub fn is_upload_ready(&self) -> bool {
        !self.cloud_name.is_empty() && !self.upload_preset.is_empty()
    }

    /// 写入前的统一规范化。
    pub fn normalized(mut self) -> Self {
        self.cloud_name = self.cloud_name.trim().to_string();
        self.upload_preset = self.upload_preset.trim().to_string();
        self.folder = self.folder.trim().to_string();
        self.history_limit = self
            .history_limit
            .clamp(HISTORY_LIMIT_MIN, HISTORY_LIMIT_MAX);
        self.transformations = self.transformations.normalized();
        self
    }
}

fn settings_file_path(app: &AppHandle) -> Result<PathBuf, AppError> {
    let app_data_dir = app
        .path()
        .app_data_dir()
        .map_err(|e| AppError::Storage(format!("获取应用数据目录失败: {}", e)))?;

    fs::create_dir_all(&app_data_dir)
        .map_err(|e| AppError::Storage(format!("创建应用数据目录失败: {}", e)))?;

    Ok(app_data_dir.join("settings.json"))
}

fn load_settings_from_path(path: &Path) -> AppSettings {
    if !path.exists() {
        return AppSettings::default();
    }
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppSettings>(&content) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("设置文件解析失败，回退默认设置: {err}");
                AppSettings::default()
            }
        },
        Err(err) => {
            log::warn!("读取设置文件失败，回退默认设置: {err}");
            AppSettings::default()
        }
    }
}

fn save_settings_to_path(path: &Path, settings: AppSettings) -> Result<AppSettings, AppError> {
    let settings = settings.normalized();
    let content = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;
    fs::write(path, content)?;
    Ok(settings)
}

/// 读取当前设置，文件缺失或损坏时返回默认值。
pub fn load_settings(app: &AppHandle) -> Result<AppSettings, AppError> {
    let path = settings_file_path(app)?;
    Ok(load_settings_from_path(&path))
}

/// 规范化并持久化设置，返回实际落盘的值。
pub fn save_settings(app: &AppHandle, settings: AppSettings) -> Result<AppSettings, AppError> {
    let path = settings_file_path(app)?;
    save_settings_to_path(&path, settings)
}

#[tauri::command]
pub fn get_app_settings(app: AppHandle) -> Result<AppSettings, AppError> {
    load_settings(&app)
}

#[tauri::command]
pub fn set_app_settings(app: AppHandle, settings: AppSettings) -> Result<AppSettings, AppError> {
    save_settings(&app, settings)
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{
        load_settings_from_path, save_settings_to_path, AppSettings, HISTORY_LIMIT_MAX,
        HISTORY_LIMIT_MIN,
    };
    use crate::transform::TransformConfig;

    fn unique_temp_dir() -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock error")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("cloudinary-uploader-settings-test-{nanos}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = unique_temp_dir();
        let path = dir.join("settings.json");

        let saved = save_settings_to_path(
            &path,
            AppSettings {
                cloud_name: " demo ".to_string(),
                upload_preset: "unsigned".to_string(),
                folder: "shots".to_string(),
                history_limit: 42,
                transformations: TransformConfig {
                    enabled: true,
                    width: Some(200),
                    ..Default::default()
                },
            },
        )
        .expect("save settings");

        assert_eq!(saved.cloud_name, "demo");

        let loaded = load_settings_from_path(&path);
        assert_eq!(loaded, saved);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn history_limit_is_clamped_on_save() {
        let dir = unique_temp_dir();
        let path = dir.join("settings.json");

        let low = save_settings_to_path(
            &path,
            AppSettings {
                history_limit: 1,
                ..Default::default()
            },
        )
        .expect("save low");
        assert_eq!(low.history_limit, HISTORY_LIMIT_MIN);

        let high = save_settings_to_path(
            &path,
            AppSettings {
                history_limit: 9999,
                ..Default::default()
            },
        )
        .expect("save high");
        assert_eq!(high.history_limit, HISTORY_LIMIT_MAX);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn empty_transform_fields_are_normalized_away() {
        let dir = unique_temp_dir();
        let path = dir.join("settings.json");

        let saved = save_settings_to_path(
            &path,
            AppSettings {
                transformations: TransformConfig {
                    enabled: true,
                    width: Some(0),
                    quality: Some(String::new()),
                    format: Some(" webp ".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .expect("save settings");

        assert_eq!(saved.transformations.width, None);
        assert_eq!(saved.transformations.quality, None);
        assert_eq!(saved.transformations.format.as_deref(), Some("webp"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = unique_temp_dir();
        let missing = load_settings_from_path(&dir.join("nope.json"));
        assert_eq!(missing, AppSettings::default());

        let bad_path = dir.join("settings.json");
        std::fs::write(&bad_path, "not-json").expect("write invalid settings");
        let corrupt = load_settings_from_path(&bad_path);
        assert_eq!(corrupt, AppSettings::default());

        let _ = std::fs::remove_dir_all(dir);
    }
}
