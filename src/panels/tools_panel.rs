use crate::ImageEditorApp;
use crate::command::Command;
use crate::config::UndoPolicy;
use crate::filters::Filter;
use crate::state::{MAX_RESIZE_PERCENT, MIN_RESIZE_PERCENT, Phase};

pub fn tools_panel(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("tools_panel")
        .resizable(false)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let has_image = app.editor.active_image().is_some();
                let can_undo = app.editor.can_undo();

                if ui.button("Load Image").on_hover_text("Ctrl+O").clicked() {
                    app.open_image_dialog();
                }
                if ui.add_enabled(has_image, egui::Button::new("Save Image")).on_hover_text("Ctrl+S").clicked() {
                    app.save_image_dialog();
                }
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).on_hover_text("Ctrl+Z").clicked() {
                    app.execute_command(Command::Undo);
                }

                ui.separator();

                for filter in Filter::ALL {
                    if ui.add_enabled(has_image, egui::Button::new(filter.label())).clicked() {
                        app.execute_command(Command::ApplyFilter(filter));
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut percent = app.resize_percent();
                    let slider = egui::Slider::new(&mut percent, MIN_RESIZE_PERCENT..=MAX_RESIZE_PERCENT)
                        .text("Resize %");
                    if ui.add(slider).changed() {
                        app.set_resize_percent(percent);
                    }
                });
            });

            ui.separator();

            ui.horizontal(|ui| {
                let status = match app.editor.phase() {
                    Phase::Empty => "No image loaded".to_owned(),
                    Phase::Loaded | Phase::Selected => {
                        let mut status = String::new();
                        if let Some(source) = app.editor.source() {
                            status += &format!("Image {}x{}", source.width(), source.height());
                        }
                        if let Some(selection) = app.editor.selection() {
                            status += &format!(", crop {}x{}", selection.width(), selection.height());
                        }
                        status
                    }
                };
                ui.label(status);

                ui.separator();

                let history = app.editor.history();
                let recent: Vec<&str> = history.entries().iter().rev().take(5).map(|e| e.label()).collect();
                ui.label(format!("Undo stack size: {}", history.len()));
                if !recent.is_empty() {
                    ui.weak(recent.join(" ← "));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let policy = &mut app.editor.config_mut().undo_policy;
                    egui::ComboBox::from_label("Undo restores")
                        .selected_text(policy_label(*policy))
                        .show_ui(ui, |ui| {
                            for option in [UndoPolicy::RestoreTarget, UndoPolicy::RestoreSource] {
                                ui.selectable_value(policy, option, policy_label(option));
                            }
                        });
                });
            });
            ui.add_space(4.0);
        });
}

fn policy_label(policy: UndoPolicy) -> &'static str {
    match policy {
        UndoPolicy::RestoreTarget => "edited buffer",
        UndoPolicy::RestoreSource => "whole image",
    }
}
