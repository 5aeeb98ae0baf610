use std::time::Instant;

use egui::{
    Align, Align2, Button, Color32, CornerRadius, FontId, Frame, Layout, Margin, RichText, Sense,
    Stroke, Ui, Vec2,
};
use egui_extras::{Size, StripBuilder};

use crate::ui::{
    PALETTE_BACKGROUND, PALETTE_BORDER, PALETTE_DESTRUCTIVE, PALETTE_MUTED, PALETTE_PANEL,
    PALETTE_PRIMARY, PALETTE_PRIMARY_GLOW, PALETTE_SUCCESS, PALETTE_TEXT_MUTED, PALETTE_WARNING,
    status_dot,
};

use super::DashboardApp;

const HEADER_ROW_HEIGHT: f32 = 56.;
const CONTROLS_WIDTH: f32 = 360.;

fn chrome_frame() -> Frame {
    Frame::new()
        .fill(PALETTE_PANEL)
        .stroke(Stroke::new(1., PALETTE_BORDER))
        .inner_margin(Margin::same(16))
}

impl DashboardApp {
    pub(crate) fn header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(chrome_frame())
            .show(ctx, |ui| {
                let width = ui.available_width();
                ui.allocate_ui(Vec2::new(width, HEADER_ROW_HEIGHT), |ui| {
                    StripBuilder::new(ui)
                        .size(Size::exact(HEADER_ROW_HEIGHT))
                        .size(Size::remainder())
                        .size(Size::exact(CONTROLS_WIDTH))
                        .horizontal(|mut strip| {
                            strip.cell(logo);
                            strip.cell(|ui| {
                                ui.add_space(4.);
                                ui.label(
                                    RichText::new("Smart Assist")
                                        .size(28.)
                                        .strong()
                                        .color(PALETTE_PRIMARY),
                                );
                                ui.label(
                                    RichText::new("AI-Powered Navigation System")
                                        .color(PALETTE_TEXT_MUTED),
                                );
                            });
                            strip.cell(|ui| {
                                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                    self.header_controls(ui);
                                });
                            });
                        });
                });

                ui.add_space(12.);
                Frame::new()
                    .fill(PALETTE_MUTED.gamma_multiply(0.6))
                    .stroke(Stroke::new(1., PALETTE_BORDER))
                    .corner_radius(CornerRadius::same(8))
                    .inner_margin(Margin::same(12))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            for (i, feature) in [
                                "Real-time mapping",
                                "Obstacle detection",
                                "Voice-guided assistance",
                            ]
                            .iter()
                            .enumerate()
                            {
                                if i > 0 {
                                    ui.label(RichText::new("•").color(PALETTE_TEXT_MUTED));
                                }
                                ui.label(RichText::new(*feature).strong().color(PALETTE_PRIMARY));
                            }
                        });
                    });
            });
    }

    fn header_controls(&mut self, ui: &mut Ui) {
        let (stop_text, stop_fill) = if self.paused {
            ("▶ Resume", PALETTE_SUCCESS)
        } else {
            ("⚡ Emergency Stop", PALETTE_DESTRUCTIVE)
        };
        if ui
            .add(Button::new(RichText::new(stop_text).color(Color32::WHITE)).fill(stop_fill))
            .clicked()
        {
            self.toggle_pause(Instant::now());
        }
        if ui
            .add(Button::new("🧭 Calibrate").stroke(Stroke::new(1., PALETTE_BORDER)))
            .on_hover_text("Move the tracked position back to the map origin")
            .clicked()
        {
            self.calibrate();
        }

        let (activity, color) = if self.paused {
            ("Simulation Paused", PALETTE_WARNING)
        } else {
            ("System Active", PALETTE_SUCCESS)
        };
        ui.label(RichText::new(activity).color(PALETTE_TEXT_MUTED));
        ui.label(RichText::new("📈").color(color));
    }

    pub(crate) fn footer(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer")
            .frame(chrome_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Smart Assist Project")
                                .size(17.)
                                .strong()
                                .color(PALETTE_PRIMARY),
                        );
                        ui.label(
                            RichText::new(
                                "Advanced AI-powered navigation system integrating STELLA-VSLAM for real-time mapping, YOLOv8 for object detection, and intelligent voice assistance.",
                            )
                            .small()
                            .color(PALETTE_TEXT_MUTED),
                        );
                    });
                });
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("© 2024 Smart Assist Project  •  Built with Rust + egui")
                            .small()
                            .color(PALETTE_TEXT_MUTED),
                    );
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                                .small()
                                .color(PALETTE_TEXT_MUTED),
                        );
                        ui.label(RichText::new("•").small().color(PALETTE_TEXT_MUTED));
                        let (text, color) = if self.paused {
                            ("Simulation Paused", PALETTE_WARNING)
                        } else {
                            ("System Online", PALETTE_SUCCESS)
                        };
                        ui.label(RichText::new(text).small().color(PALETTE_TEXT_MUTED));
                        status_dot(ui, color, !self.paused);
                    });
                });
            });
    }
}

/// Painted stand-in for the project logo.
fn logo(ui: &mut Ui) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(48.), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, CornerRadius::same(10), PALETTE_PRIMARY);
    painter.rect_filled(
        rect.shrink(3.),
        CornerRadius::same(8),
        PALETTE_BACKGROUND,
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        "SA",
        FontId::proportional(20.),
        PALETTE_PRIMARY_GLOW,
    );
}
