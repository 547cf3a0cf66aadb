use egui::{Color32, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use crate::ImageEditorApp;
use crate::command::Command;
use crate::display::{CanvasMapping, CropDrag};

fn full_uv() -> Rect {
    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0))
}

pub fn central_panel(app: &mut ImageEditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_size = Vec2::from(app.editor.config().canvas_size);

        ui.horizontal_top(|ui| {
            source_canvas(app, ui, canvas_size);
            ui.add_space(10.0);
            preview_canvas(app, ui, canvas_size);
        });
    });
}

/// The whole image stretched over the canvas. Dragging on it crops.
fn source_canvas(app: &mut ImageEditorApp, ui: &mut egui::Ui, canvas_size: Vec2) {
    let (response, painter) = ui.allocate_painter(canvas_size, Sense::drag());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::GRAY);

    let Some(source) = app.editor.source() else {
        return;
    };
    let texture = app.textures.texture_for(source, ui.ctx());
    painter.image(texture, rect, full_uv(), Color32::WHITE);
    let mapping = CanvasMapping::new(canvas_size, source.dimensions());

    let pointer = response
        .interact_pointer_pos()
        .map(|pos| (pos - rect.min).to_pos2());

    if response.drag_started() {
        app.crop_drag = pointer.map(CropDrag::begin);
    } else if response.dragged() {
        if let (Some(drag), Some(pos)) = (app.crop_drag.as_mut(), pointer) {
            drag.update(pos);
        }
    }

    if let Some(drag) = &app.crop_drag {
        let r = drag.screen_rect(rect.min);
        let outline = [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom(), r.left_top()];
        painter.extend(Shape::dashed_line(&outline, Stroke::new(1.5, Color32::RED), 4.0, 2.0));
    }

    if response.drag_stopped() {
        if let Some(drag) = app.crop_drag.take() {
            app.execute_command(Command::Crop(drag.finish(&mapping)));
        }
    }
}

/// The resize preview of the selection. At 100% it fills the canvas.
fn preview_canvas(app: &mut ImageEditorApp, ui: &mut egui::Ui, canvas_size: Vec2) {
    let (response, painter) = ui.allocate_painter(canvas_size, Sense::hover());
    let rect = response.rect;
    painter.rect_filled(rect, 0.0, Color32::LIGHT_GRAY);

    let (Some(selection), Some(preview)) = (app.editor.selection(), app.preview.as_ref()) else {
        return;
    };

    // Scale from the full-size selection so the slider visibly shrinks it
    let fit = Vec2::new(
        canvas_size.x / selection.width() as f32,
        canvas_size.y / selection.height() as f32,
    );
    let size = Vec2::new(preview.width() as f32 * fit.x, preview.height() as f32 * fit.y);

    let texture = app.textures.texture_for(preview, ui.ctx());
    painter.image(texture, Rect::from_min_size(rect.min, size), full_uv(), Color32::WHITE);
}
