//! # Cloudinary 图片上传工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  前端 (popup 页面)                        │
//! │                                                          │
//! │  拖放/粘贴/选择文件 ── 历史列表 ── 设置表单 ── 导出         │
//! │       │  (统一错误处理 + toast)                           │
//! └───────┼──────────────────────────────────────────────────┘
//!         ↕ Tauri IPC (Result<T, AppError>)
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ uploader ─── 取源 → multipart 上传 → 存历史 →         │
//! │  │               变换 → 写剪贴板 → 通知                   │
//! │  │                                                       │
//! │  ├─ db ───────── SQLite (rusqlite) 有界上传历史            │
//! │  ├─ transform ── Cloudinary URL 变换（纯函数）             │
//! │  ├─ view ─────── 列表分页视图状态（显式对象）              │
//! │  ├─ export ───── 历史导出 JSON 文档                       │
//! │  ├─ settings ─── settings.json 读写 + 规范化              │
//! │  ├─ clipboard ── 剪贴板写入 + 重试回退                    │
//! │  └─ notify ───── 系统通知（fire-and-forget）              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，所有 Tauri command 的返回类型 |
//! | [`db`] | 上传历史的追加、查询、删除、清空与容量裁剪 |
//! | [`uploader`] | 从 URL/Base64/文件/剪贴板上传到 Cloudinary 的完整流水线 |
//! | [`transform`] | 在托管图片 URL 中拼接 `w_/h_/c_/q_/f_` 变换段 |
//! | [`view`] | 历史列表的分页游标与渲染（按时间戳降序防御性重排） |
//! | [`export`] | 历史导出为 `{exported, count, uploads}` JSON 文档 |
//! | [`settings`] | Cloud Name / Upload Preset / 变换配置的持久化 |
//! | [`clipboard`] | 最终 URL 写入系统剪贴板，失败时有限重试 |
//! | [`notify`] | 上传成功/失败/缺少配置的系统通知 |

pub mod error;
pub mod clipboard;
pub mod db;
pub mod export;
pub mod notify;
pub mod settings;
pub mod transform;
pub mod uploader;
pub mod view;
