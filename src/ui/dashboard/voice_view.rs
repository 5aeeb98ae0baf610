use std::time::Instant;

use egui::{
    Align, Button, Color32, CornerRadius, Frame, Grid, Layout, Margin, RichText, ScrollArea,
    Stroke, Ui,
};

use crate::simulation::voice::{EXAMPLE_COMMANDS, Role, VoiceMessage};
use crate::ui::{
    PALETTE_BORDER, PALETTE_DESTRUCTIVE, PALETTE_MUTED, PALETTE_PANEL, PALETTE_PRIMARY,
    PALETTE_SUCCESS, PALETTE_TEXT_MUTED, badge, panel_frame, panel_title, status_dot,
};

use super::DashboardApp;

const LOG_HEIGHT: f32 = 256.;
const MESSAGE_WIDTH_RATIO: f32 = 0.8;

impl DashboardApp {
    pub(crate) fn voice_panel(&mut self, ui: &mut Ui) {
        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                panel_title(ui, "🤖", "Voice Assistant");
                status_dot(ui, PALETTE_SUCCESS, false);
                ui.label(RichText::new("GPT + Whisper").small().color(PALETTE_TEXT_MUTED));

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let listening = self.voice.is_listening();
                    let speaking = self.voice.is_speaking();
                    let (text, fill) = if listening {
                        ("🔇 Stop", PALETTE_DESTRUCTIVE)
                    } else {
                        ("🎤 Listen", PALETTE_PRIMARY)
                    };
                    let button = Button::new(RichText::new(text).color(Color32::WHITE)).fill(fill);
                    if ui.add_enabled(!speaking, button).clicked() {
                        if listening {
                            self.stop_listening();
                        } else {
                            self.start_listening(Instant::now());
                        }
                    }
                    if speaking {
                        badge(ui, "🔊 Speaking", PALETTE_PRIMARY, false);
                    }
                });
            });
            ui.add_space(12.);

            if self.voice.is_listening() {
                Frame::new()
                    .fill(PALETTE_PRIMARY.gamma_multiply(0.1))
                    .stroke(Stroke::new(1., PALETTE_PRIMARY.gamma_multiply(0.3)))
                    .corner_radius(CornerRadius::same(8))
                    .inner_margin(Margin::same(10))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            status_dot(ui, PALETTE_PRIMARY, true);
                            ui.label(RichText::new("Listening...").strong().color(PALETTE_PRIMARY));
                        });
                        let command = match self.voice.current_command() {
                            "" => "Say your navigation command",
                            command => command,
                        };
                        ui.label(RichText::new(command).small().color(PALETTE_TEXT_MUTED));
                    });
                ui.add_space(12.);
            }

            Frame::new()
                .fill(PALETTE_MUTED.gamma_multiply(0.4))
                .stroke(Stroke::new(1., PALETTE_PRIMARY.gamma_multiply(0.3)))
                .corner_radius(CornerRadius::same(8))
                .inner_margin(Margin::same(12))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ScrollArea::vertical()
                        .id_salt("voice_log")
                        .max_height(LOG_HEIGHT)
                        .min_scrolled_height(LOG_HEIGHT)
                        .stick_to_bottom(true)
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            for message in self.voice.messages() {
                                message_bubble(ui, message);
                                ui.add_space(12.);
                            }
                        });
                });

            ui.add_space(12.);
            Frame::new()
                .fill(PALETTE_MUTED.gamma_multiply(0.6))
                .corner_radius(CornerRadius::same(8))
                .inner_margin(Margin::same(10))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(RichText::new("💬 Example Commands").color(PALETTE_TEXT_MUTED));
                    Grid::new("example_commands")
                        .num_columns(2)
                        .spacing([24., 6.])
                        .show(ui, |ui| {
                            for (i, command) in EXAMPLE_COMMANDS.iter().enumerate() {
                                ui.label(
                                    RichText::new(format!("\"{}\"", command))
                                        .small()
                                        .color(PALETTE_TEXT_MUTED),
                                );
                                if i % 2 == 1 {
                                    ui.end_row();
                                }
                            }
                        });
                });
        });
    }
}

fn message_bubble(ui: &mut Ui, message: &VoiceMessage) {
    let layout = match message.role {
        Role::User => Layout::right_to_left(Align::TOP),
        Role::Assistant => Layout::left_to_right(Align::TOP),
    };
    let max_width = ui.available_width() * MESSAGE_WIDTH_RATIO;

    ui.with_layout(layout, |ui| {
        let (fill, stroke, text_color) = match message.role {
            Role::User => (PALETTE_PRIMARY, Stroke::NONE, Color32::WHITE),
            Role::Assistant if message.is_processing() => {
                (PALETTE_MUTED, Stroke::NONE, PALETTE_TEXT_MUTED)
            }
            Role::Assistant => (PALETTE_PANEL, Stroke::new(1., PALETTE_BORDER), Color32::WHITE),
        };
        Frame::new()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::same(10))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.with_layout(Layout::top_down(Align::LEFT), |ui| {
                    ui.horizontal_wrapped(|ui| {
                        let icon = match message.role {
                            Role::User => "🎤",
                            Role::Assistant => "🤖",
                        };
                        ui.label(RichText::new(icon).color(text_color));
                        ui.label(RichText::new(&message.text).color(text_color));
                    });
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new(message.time_label())
                                .small()
                                .color(text_color.gamma_multiply(0.7)),
                        );
                        if message.is_processing() {
                            let dots = (ui.input(|i| i.time) * 3.) as usize % 3 + 1;
                            ui.label(RichText::new(".".repeat(dots)).strong().color(text_color));
                        }
                    });
                });
            });
    });
}
