#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe_image_editor::{EditorConfig, ImageEditorApp};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_override = EditorConfig::from_env();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Image Editor")
            .with_inner_size([1060.0, 600.0])
            .with_min_inner_size([1060.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Image Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(ImageEditorApp::new(cc, config_override)))),
    )
}
