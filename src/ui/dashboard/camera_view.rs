use std::time::Instant;

use egui::{
    Align, Align2, Button, Color32, CornerRadius, FontId, Layout, Pos2, Rect, RichText, Sense,
    Stroke, StrokeKind, Ui, Vec2,
};

use crate::simulation::detection::{OVERLAY_HEIGHT, OVERLAY_WIDTH};
use crate::ui::{
    PALETTE_BORDER, PALETTE_MUTED, PALETTE_PRIMARY, PALETTE_SUCCESS, PALETTE_TEXT_MUTED,
    PALETTE_WARNING, badge, panel_frame, panel_title, status_dot,
};

use super::DashboardApp;

const LABEL_HEIGHT: f32 = 25.;
const LABEL_FONT_SIZE: f32 = 12.;

impl DashboardApp {
    pub(crate) fn camera_panel(&mut self, ui: &mut Ui) {
        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                panel_title(ui, "📷", "Live Camera Feed");
                status_dot(ui, PALETTE_SUCCESS, true);

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let enabled = self.detection.is_enabled();
                    let (text, fill) = if enabled {
                        ("👁 Detection ON", PALETTE_PRIMARY)
                    } else {
                        ("🚫 Detection OFF", Color32::TRANSPARENT)
                    };
                    if ui
                        .add(Button::new(RichText::new(text).color(Color32::WHITE)).fill(fill))
                        .clicked()
                    {
                        self.toggle_detection(Instant::now());
                    }
                    badge(
                        ui,
                        format!("🎯 {} Objects", self.detection.objects().len()),
                        PALETTE_TEXT_MUTED,
                        false,
                    );
                });
            });
            ui.add_space(12.);

            self.camera_feed(ui);

            if self.detection.is_enabled() && !self.detection.objects().is_empty() {
                ui.add_space(12.);
                ui.label(RichText::new("Detected Objects").color(PALETTE_TEXT_MUTED));
                ui.horizontal_wrapped(|ui| {
                    for object in self.detection.objects() {
                        badge(
                            ui,
                            format!("{} ({}%)", object.label, object.confidence_pct()),
                            PALETTE_PRIMARY,
                            false,
                        );
                    }
                });
            }
        });
    }

    /// Simulated feed with the bounding box overlay, kept at 16:9.
    fn camera_feed(&self, ui: &mut Ui) {
        let width = ui.available_width();
        let (rect, _) = ui.allocate_exact_size(
            Vec2::new(width, width * OVERLAY_HEIGHT / OVERLAY_WIDTH),
            Sense::hover(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, CornerRadius::same(8), PALETTE_MUTED);
        painter.rect_stroke(
            rect,
            CornerRadius::same(8),
            Stroke::new(1., PALETTE_PRIMARY.gamma_multiply(0.4)),
            StrokeKind::Inside,
        );

        // placeholder feed
        painter.text(
            rect.center() - Vec2::new(0., 24.),
            Align2::CENTER_CENTER,
            "📷",
            FontId::proportional(40.),
            PALETTE_TEXT_MUTED.gamma_multiply(0.5),
        );
        painter.text(
            rect.center() + Vec2::new(0., 12.),
            Align2::CENTER_CENTER,
            "Camera Feed Simulation",
            FontId::proportional(14.),
            PALETTE_TEXT_MUTED,
        );
        painter.text(
            rect.center() + Vec2::new(0., 30.),
            Align2::CENTER_CENTER,
            "Real camera integration required",
            FontId::proportional(11.),
            PALETTE_TEXT_MUTED,
        );

        if self.detection.is_enabled() {
            let scale = rect.width() / OVERLAY_WIDTH;
            let to_screen = |x: f32, y: f32| Pos2::new(rect.min.x + x * scale, rect.min.y + y * scale);

            for object in self.detection.objects() {
                let bbox = &object.bbox;
                let min = to_screen(bbox.x, bbox.y);
                let max = to_screen(bbox.x + bbox.width, bbox.y + bbox.height);
                painter.rect_stroke(
                    Rect::from_min_max(min, max),
                    CornerRadius::ZERO,
                    Stroke::new(2., PALETTE_PRIMARY),
                    StrokeKind::Middle,
                );
                painter.rect_filled(
                    Rect::from_min_max(to_screen(bbox.x, bbox.y - LABEL_HEIGHT), Pos2::new(max.x, min.y)),
                    CornerRadius::ZERO,
                    PALETTE_PRIMARY,
                );
                painter.text(
                    to_screen(bbox.x + 5., bbox.y - 8.),
                    Align2::LEFT_BOTTOM,
                    object.caption(),
                    FontId::proportional(LABEL_FONT_SIZE * scale.max(0.75)),
                    Color32::WHITE,
                );
            }

            overlay_chip(
                ui,
                Pos2::new(rect.min.x + 16., rect.min.y + 16.),
                Align2::LEFT_TOP,
                "YOLOv8 Active",
                PALETTE_SUCCESS,
                Color32::WHITE,
            );
        } else {
            overlay_chip(
                ui,
                Pos2::new(rect.max.x - 16., rect.min.y + 16.),
                Align2::RIGHT_TOP,
                "⚠ Detection Disabled",
                PALETTE_WARNING,
                PALETTE_WARNING,
            );
        }
    }
}

/// Rounded label floating over the feed with a colored dot.
fn overlay_chip(
    ui: &Ui,
    anchor: Pos2,
    align: Align2,
    text: &str,
    dot_color: Color32,
    text_color: Color32,
) {
    let painter = ui.painter();
    let galley = painter.layout_no_wrap(
        text.to_string(),
        FontId::proportional(11.),
        text_color,
    );
    let size = galley.size() + Vec2::new(32., 10.);
    let chip = align.anchor_size(anchor, size);
    painter.rect_filled(chip, CornerRadius::same(12), Color32::from_black_alpha(200));
    painter.rect_stroke(
        chip,
        CornerRadius::same(12),
        Stroke::new(1., PALETTE_BORDER),
        StrokeKind::Inside,
    );
    let dot_alpha = 0.55 + 0.45 * ((ui.input(|i| i.time) as f32) * 3.).sin().abs();
    painter.circle_filled(
        Pos2::new(chip.min.x + 12., chip.center().y),
        3.,
        dot_color.gamma_multiply(dot_alpha),
    );
    painter.galley(
        Pos2::new(chip.min.x + 22., chip.center().y - galley.size().y / 2.),
        galley,
        text_color,
    );
}
