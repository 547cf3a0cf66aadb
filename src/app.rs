use crate::buffer::Image;
use crate::command::Command;
use crate::config::EditorConfig;
use crate::display::CropDrag;
use crate::error::EditorError;
use crate::file_handler::{self, FileHandler};
use crate::panels::{central_panel, tools_panel};
use crate::state::EditorState;
use crate::texture_manager::TextureManager;

/// A message shown in a small window until dismissed
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: &'static str,
    pub message: String,
}

pub struct ImageEditorApp {
    /// Owns the settings too; they are what gets persisted on shutdown.
    /// Images are not persisted, every session starts empty.
    pub(crate) editor: EditorState,
    pub(crate) textures: TextureManager,
    file_handler: FileHandler,
    pub(crate) crop_drag: Option<CropDrag>,
    /// The selection at the slider's scale, redrawn whenever either changes
    pub(crate) preview: Option<Image>,
    notification: Option<Notification>,
}

impl Default for ImageEditorApp {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl ImageEditorApp {
    /// Called once before the first frame.
    ///
    /// Settings from the previous session are restored unless `config_override`
    /// is given.
    pub fn new(cc: &eframe::CreationContext<'_>, config_override: Option<EditorConfig>) -> Self {
        let config = config_override.or_else(|| {
            cc.storage
                .and_then(|storage| eframe::get_value::<EditorConfig>(storage, eframe::APP_KEY))
        });

        Self::with_config(config.unwrap_or_default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            editor: EditorState::new(config.sanitized()),
            textures: TextureManager::default(),
            file_handler: FileHandler::new(),
            crop_drag: None,
            preview: None,
            notification: None,
        }
    }

    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Run a command against the editor, reporting any failure
    pub fn execute_command(&mut self, command: Command) {
        let name = command.name();
        let replaces_everything = matches!(command, Command::Load(_));
        match self.editor.execute(command) {
            Ok(()) => {
                log::info!("{} done", name);
                if replaces_everything {
                    // None of the cached buffers can be shown again
                    self.textures.clear_cache();
                }
            }
            Err(err) => self.report_error(name, &err),
        }
        self.crop_drag = None;
        self.refresh_preview();
    }

    /// Recompute the resize preview from the current selection and slider
    pub fn refresh_preview(&mut self) {
        self.preview = self.editor.resize_preview(self.resize_percent()).ok();
    }

    pub fn resize_percent(&self) -> u32 {
        self.editor.config().resize_percent
    }

    pub fn set_resize_percent(&mut self, percent: u32) {
        self.editor.config_mut().resize_percent = percent;
        self.refresh_preview();
    }

    pub fn open_image(&mut self, path: &std::path::Path) {
        match file_handler::load_image(path) {
            Ok(image) => self.execute_command(Command::Load(image)),
            Err(err) => self.report_error("Load", &err),
        }
    }

    pub fn open_image_dialog(&mut self) {
        if let Some(path) = file_handler::pick_open_path() {
            self.open_image(&path);
        }
    }

    pub fn save_image(&mut self, path: std::path::PathBuf) {
        let display = path.display().to_string();
        match self.editor.execute(Command::Save(path)) {
            Ok(()) => {
                self.notification = Some(Notification {
                    title: "Success",
                    message: format!("Image saved successfully!\n{}", display),
                });
            }
            Err(err) => self.report_error("Save", &err),
        }
    }

    pub fn save_image_dialog(&mut self) {
        if self.editor.active_image().is_none() {
            self.report_error("Save", &EditorError::NoActiveBuffer);
            return;
        }
        if let Some(path) = file_handler::pick_save_path() {
            self.save_image(path);
        }
    }

    fn report_error(&mut self, action: &str, err: &EditorError) {
        log::warn!("{} failed: {}", action, err);
        self.notification = Some(Notification {
            title: "Error",
            message: format!("{} failed: {}", action, err),
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, Modifiers};

        let (open, save, undo) = ctx.input_mut(|i| {
            (
                i.consume_key(Modifiers::COMMAND, Key::O),
                i.consume_key(Modifiers::COMMAND, Key::S),
                i.consume_key(Modifiers::COMMAND, Key::Z),
            )
        });

        if open {
            self.open_image_dialog();
        }
        if save {
            self.save_image_dialog();
        }
        if undo {
            self.execute_command(Command::Undo);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        match self.file_handler.take_dropped_image() {
            Some(Ok(image)) => self.execute_command(Command::Load(image)),
            Some(Err(err)) => self.report_error("Load", &err),
            None => {}
        }
    }

    fn show_notification(&mut self, ctx: &egui::Context) {
        let Some(notification) = &self.notification else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(notification.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&notification.message);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notification = None;
        }
    }
}

impl eframe::App for ImageEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.editor.config());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();

        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        // The bottom panel has to be added before the central one
        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.show_notification(ctx);
        self.file_handler.preview_files_being_dropped(ctx);
    }
}
