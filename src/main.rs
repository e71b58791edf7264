// 防止在 Windows 发布版本中显示额外的控制台窗口，不要删除！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! # Cloudinary 图片上传工具 — 应用入口
//!
//! 本文件仅负责应用初始化与插件/命令注册。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use cloudinary_uploader::{clipboard, db, export, settings, uploader, view};
use tauri::image::Image;
use tauri::menu::{Menu, MenuItem};
use tauri::tray::{
    MouseButton as TauriMouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent,
};
use tauri::Manager;
use tauri_plugin_global_shortcut::GlobalShortcutExt;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    tauri::Builder::default()
        // 插件初始化
        .plugin(tauri_plugin_shell::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_notification::init())
        // 应用设置
        .setup(|app| {
            log::info!("setup: begin");
            let app_icon = Image::from_bytes(include_bytes!("../icons/icon_128x128.png"))?;
            log::info!("setup: icon loaded");

            // 初始化数据库并注册为托管状态
            let handle = app.handle().clone();
            match db::init_db(&handle) {
                Ok(conn) => {
                    app.manage(db::DbState(std::sync::Mutex::new(conn)));
                    log::info!("setup: db state managed");
                }
                Err(err) => {
                    log::error!("setup: 数据库初始化失败，应用将以受限模式运行: {err}");
                }
            }

            match uploader::UploaderState::new() {
                Ok(uploader_state) => {
                    app.manage(uploader_state);
                    log::info!("setup: uploader state managed");
                }
                Err(err) => {
                    log::error!("setup: 上传服务初始化失败，应用将以受限模式运行: {err}");
                }
            }

            app.manage(view::ViewState::default());

            // 显式设置主窗口图标，避免平台默认图标与配置不一致
            if let Some(main_window) = app.get_webview_window("main") {
                let _ = main_window.set_icon(app_icon.clone());
            }
            log::info!("setup: main window icon set");

            // 创建托盘菜单
            let upload_i = MenuItem::with_id(
                app,
                "upload-clipboard",
                "上传剪贴板图片",
                true,
                None::<&str>,
            )?;
            let show_i = MenuItem::with_id(app, "show", "显示", true, None::<&str>)?;
            let quit_i = MenuItem::with_id(app, "quit", "退出", true, None::<&str>)?;
            let menu = Menu::with_items(app, &[&upload_i, &show_i, &quit_i])?;

            // 创建托盘图标（失败时回退显示主窗口，避免进程在后台无入口）
            let tray_result = TrayIconBuilder::new()
                .icon(app_icon.clone())
                .menu(&menu)
                .on_menu_event(|app, event| match event.id.as_ref() {
                    "upload-clipboard" => {
                        let handle = app.clone();
                        tauri::async_runtime::spawn(uploader::upload_clipboard_image(handle));
                    }
                    "show" => {
                        if let Some(w) = app.get_webview_window("main") {
                            if let Err(err) = w.unminimize() {
                                log::warn!("托盘菜单显示窗口失败（unminimize）: {err}");
                            }
                            if let Err(err) = w.show() {
                                log::warn!("托盘菜单显示窗口失败（show）: {err}");
                            }
                            if let Err(err) = w.set_focus() {
                                log::warn!("托盘菜单显示窗口失败（focus）: {err}");
                            }
                        }
                    }
                    "quit" => {
                        if let Err(err) = app.global_shortcut().unregister_all() {
                            log::warn!("退出前清理全局快捷键失败: {err}");
                        }
                        app.exit(0);
                    }
                    _ => {}
                })
                .on_tray_icon_event(|tray, event| {
                    if let TrayIconEvent::Click {
                        button: TauriMouseButton::Left,
                        button_state: MouseButtonState::Up,
                        ..
                    } = event
                    {
                        if let Some(w) = tray.app_handle().get_webview_window("main") {
                            if let Err(err) = w.unminimize() {
                                log::warn!("托盘点击显示窗口失败（unminimize）: {err}");
                            }
                            if let Err(err) = w.show() {
                                log::warn!("托盘点击显示窗口失败（show）: {err}");
                            }
                            if let Err(err) = w.set_focus() {
                                log::warn!("托盘点击显示窗口失败（focus）: {err}");
                            }
                        }
                    }
                })
                .build(app);

            if let Err(err) = tray_result {
                log::warn!("托盘图标创建失败，回退为显示主窗口: {err}");
                if let Some(w) = app.get_webview_window("main") {
                    if let Err(err) = w.unminimize() {
                        log::warn!("托盘失败回退显示窗口失败（unminimize）: {err}");
                    }
                    if let Err(err) = w.show() {
                        log::warn!("托盘失败回退显示窗口失败（show）: {err}");
                    }
                    if let Err(err) = w.set_focus() {
                        log::warn!("托盘失败回退显示窗口失败（focus）: {err}");
                    }
                }
            }

            log::info!("setup: complete");

            Ok(())
        })
        // 窗口关闭时隐藏而非退出
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::CloseRequested { api, .. } = event {
                if let Err(err) = window.hide() {
                    log::warn!("窗口关闭转隐藏失败: {err}");
                }
                api.prevent_close();
            }
        })
        // 注册所有 Tauri 命令
        .invoke_handler(tauri::generate_handler![
            // 上传
            uploader::commands::upload_image_from_url,
            uploader::commands::upload_image_base64,
            uploader::commands::upload_image_file,
            // 历史列表视图
            view::history_render,
            view::history_load_more,
            view::history_delete,
            view::history_clear,
            // 历史数据
            db::db_get_history,
            // 导出
            export::export_history,
            export::export_history_to_file,
            // 剪贴板
            clipboard::copy_text_to_clipboard,
            // 应用设置
            settings::get_app_settings,
            settings::set_app_settings,
        ])
        .run(tauri::generate_context!())
        .expect("运行 Tauri 应用时出错");
}
