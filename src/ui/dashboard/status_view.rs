use egui::{
    Align, Color32, CornerRadius, Frame, Layout, Margin, ProgressBar, RichText, Stroke, Ui, Vec2,
    Vec2b,
};
use egui_extras::{Size, StripBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use itertools::Itertools;

use crate::simulation::{
    NetworkStatus, TrackingStatus,
    status::{PerformanceHistory, battery_level},
};
use crate::ui::{
    PALETTE_BORDER, PALETTE_DESTRUCTIVE, PALETTE_MUTED, PALETTE_PRIMARY, PALETTE_PRIMARY_GLOW,
    PALETTE_SUCCESS, PALETTE_TEXT_MUTED, badge, battery_color, capitalize, network_color,
    panel_frame, panel_title, status_icon, stroke_shade, tracking_color,
};

use super::DashboardApp;

const METRIC_ROW_HEIGHT: f32 = 52.;
const CHART_HEIGHT: f32 = 128.;

impl DashboardApp {
    pub(crate) fn status_panel(&mut self, ui: &mut Ui) {
        let metrics = self.status.metrics().clone();

        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                panel_title(ui, "🖥", "System Status");
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    badge(ui, "Real-time Monitoring", PALETTE_TEXT_MUTED, false);
                });
            });
            ui.add_space(16.);

            let width = ui.available_width();
            ui.allocate_ui(Vec2::new(width, METRIC_ROW_HEIGHT), |ui| {
                StripBuilder::new(ui)
                    .sizes(Size::remainder(), 4)
                    .horizontal(|mut strip| {
                        strip.cell(|ui| {
                            let level = battery_level(metrics.battery);
                            let bar_color = stroke_shade(
                                PALETTE_DESTRUCTIVE,
                                PALETTE_SUCCESS,
                                metrics.battery / 100.,
                            );
                            metric_header(ui, "🔋", "Battery", |ui| {
                                badge(
                                    ui,
                                    format!("{:.0}%", metrics.battery),
                                    battery_color(level),
                                    true,
                                );
                            });
                            percent_bar(ui, metrics.battery, bar_color);
                        });
                        strip.cell(|ui| {
                            metric_header(ui, "🖥", "CPU", |ui| {
                                ui.label(
                                    RichText::new(format!("{:.0}%", metrics.cpu))
                                        .small()
                                        .color(PALETTE_TEXT_MUTED),
                                );
                            });
                            percent_bar(ui, metrics.cpu, PALETTE_PRIMARY);
                        });
                        strip.cell(|ui| {
                            metric_header(ui, "💾", "Memory", |ui| {
                                ui.label(
                                    RichText::new(format!("{:.0}%", metrics.memory))
                                        .small()
                                        .color(PALETTE_TEXT_MUTED),
                                );
                            });
                            percent_bar(ui, metrics.memory, PALETTE_PRIMARY);
                        });
                        strip.cell(|ui| {
                            let color = network_color(metrics.network_status);
                            metric_header(ui, "📶", "Network", |ui| {
                                ui.label(
                                    RichText::new(status_icon(
                                        metrics.network_status == NetworkStatus::Connected,
                                    ))
                                    .color(color),
                                );
                            });
                            ui.label(
                                RichText::new(capitalize(&metrics.network_status.to_string()))
                                    .small()
                                    .strong()
                                    .color(color),
                            );
                        });
                    });
            });
            ui.add_space(16.);

            ui.columns(2, |columns| {
                let slam_color = tracking_color(metrics.slam_status);
                indicator_row(&mut columns[0], "🎯", "STELLA-VSLAM", |ui| {
                    ui.label(
                        RichText::new(capitalize(&metrics.slam_status.to_string()))
                            .strong()
                            .color(slam_color),
                    );
                    ui.label(
                        RichText::new(status_icon(
                            metrics.slam_status == TrackingStatus::Tracking,
                        ))
                        .color(slam_color),
                    );
                });
                indicator_row(&mut columns[1], "⚠", "Obstacles Detected", |ui| {
                    badge(
                        ui,
                        format!("{} Objects", metrics.obstacle_count),
                        PALETTE_TEXT_MUTED,
                        false,
                    );
                });
            });
            ui.add_space(16.);

            ui.label(RichText::new("Performance Trends").color(PALETTE_TEXT_MUTED));
            performance_chart(ui, self.status.history());
        });
    }
}

fn metric_header(ui: &mut Ui, icon: &str, title: &str, value: impl FnOnce(&mut Ui)) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(icon).color(PALETTE_PRIMARY));
        ui.label(RichText::new(title).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            ui.add_space(8.);
            value(ui);
        });
    });
}

fn percent_bar(ui: &mut Ui, value: f32, color: Color32) {
    ui.add(
        ProgressBar::new((value / 100.).clamp(0., 1.))
            .desired_height(8.)
            .desired_width(ui.available_width() - 8.)
            .fill(color),
    );
}

fn indicator_row(ui: &mut Ui, icon: &str, title: &str, value: impl FnOnce(&mut Ui)) {
    Frame::new()
        .fill(PALETTE_MUTED.gamma_multiply(0.4))
        .stroke(Stroke::new(1., PALETTE_BORDER))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(Margin::same(10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).color(PALETTE_PRIMARY));
                ui.label(RichText::new(title).strong());
                ui.with_layout(Layout::right_to_left(Align::Center), value);
            });
        });
}

fn performance_chart(ui: &mut Ui, history: &PerformanceHistory) {
    let time_labels = history.iter().map(|s| s.time.clone()).collect_vec();
    let cpu_points = PlotPoints::new(
        history
            .iter()
            .enumerate()
            .map(|(i, s)| [i as f64, s.cpu as f64])
            .collect(),
    );
    let memory_points = PlotPoints::new(
        history
            .iter()
            .enumerate()
            .map(|(i, s)| [i as f64, s.memory as f64])
            .collect(),
    );

    Plot::new("performance_trends")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .include_x(0.)
        .include_x(history.capacity().saturating_sub(1) as f64)
        .include_y(0.)
        .include_y(100.)
        .auto_bounds(Vec2b::new(true, false))
        .x_axis_formatter(move |mark, _range| {
            let index = mark.value.round();
            if (mark.value - index).abs() > f64::EPSILON || index < 0. {
                return String::new();
            }
            time_labels.get(index as usize).cloned().unwrap_or_default()
        })
        .show_background(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new("CPU Usage", cpu_points)
                    .color(PALETTE_PRIMARY)
                    .width(2.),
            );
            plot_ui.line(
                Line::new("Memory Usage", memory_points)
                    .color(PALETTE_PRIMARY_GLOW)
                    .width(2.),
            );
        });
}
