use egui::{
    Align, Align2, Button, Color32, CornerRadius, FontId, Frame, Layout, Margin, Painter, Rect,
    RichText, Sense, Stroke, StrokeKind, Ui, Vec2, ViewportBuilder, ViewportCommand, ViewportId,
};
use uom::si::length::meter;

use crate::simulation::{Point3, mapping::point_color};
use crate::ui::{
    PALETTE_BACKGROUND, PALETTE_BORDER, PALETTE_PRIMARY, PALETTE_SUCCESS, PALETTE_TEXT_MUTED,
    badge, capitalize, panel_frame, panel_title, tracking_color,
};

use super::DashboardApp;

const GRID_HALF_SIZE: i32 = 10;
const GRID_FLOOR_Y: f32 = -1.;
const GRID_COLOR: Color32 = Color32::from_rgb(55, 65, 81);
const MAP_WINDOW_SIZE: [f32; 2] = [960., 640.];

impl DashboardApp {
    pub(crate) fn map_panel(&mut self, ui: &mut Ui) {
        panel_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                panel_title(ui, "🗺", "STELLA-VSLAM 3D Mapping");
                let status = self.mapping.tracking_status();
                badge(ui, capitalize(&status.to_string()), tracking_color(status), true);

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui
                        .add(Button::new("⛶").selected(self.show_map_window))
                        .on_hover_text("Open the map in its own window")
                        .clicked()
                    {
                        self.show_map_window = !self.show_map_window;
                    }
                    badge(
                        ui,
                        format!("{} Keyframes", self.mapping.keyframe_count()),
                        PALETTE_TEXT_MUTED,
                        false,
                    );
                });
            });
            ui.add_space(12.);

            let width = ui.available_width();
            self.map_canvas(ui, Vec2::new(width, width * 9. / 16.));
            ui.add_space(12.);

            ui.columns(3, |columns| {
                statistic(
                    &mut columns[0],
                    self.mapping.map_points().len().to_string(),
                    "Map Points",
                );
                statistic(
                    &mut columns[1],
                    self.mapping.keyframe_count().to_string(),
                    "Keyframes",
                );
                statistic(
                    &mut columns[2],
                    format!(
                        "{:.1}m",
                        self.mapping.distance_from_origin().get::<meter>()
                    ),
                    "Distance Traveled",
                );
            });
        });
    }

    /// Detached, larger map view.
    pub(crate) fn map_window(&mut self, ctx: &egui::Context) {
        ctx.show_viewport_immediate(
            ViewportId::from_hash_of("map"),
            ViewportBuilder::default()
                .with_title("Smart Assist - Map")
                .with_position(self.app_config.map_window_position.clone())
                .with_inner_size(MAP_WINDOW_SIZE),
            |ctx, class| {
                assert!(
                    class == egui::ViewportClass::Immediate,
                    "This egui backend doesn't support multiple viewports"
                );
                egui::CentralPanel::default()
                    .frame(Frame::new().fill(PALETTE_BACKGROUND).inner_margin(Margin::same(8)))
                    .show(ctx, |ui| {
                        let size = ui.available_size();
                        self.map_canvas(ui, size);
                    });

                if let Some(outer_rect) = ctx.input(|is| is.viewport().outer_rect) {
                    self.app_config.map_window_position = outer_rect.min.into();
                }
                if ctx.input(|is| is.viewport().close_requested()) {
                    self.show_map_window = false;
                    ctx.send_viewport_cmd(ViewportCommand::Close);
                }
            },
        );
    }

    /// Point cloud, keyframes and current position seen through the orbit camera.
    fn map_canvas(&mut self, ui: &mut Ui, size: Vec2) {
        let (response, painter) = ui.allocate_painter(size, Sense::drag());
        let rect = response.rect;

        if response.dragged() {
            self.map_camera.rotate(response.drag_delta());
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0. {
                self.map_camera.zoom(scroll);
            }
        }

        painter.rect_filled(rect, CornerRadius::same(8), PALETTE_BACKGROUND);
        painter.rect_stroke(
            rect,
            CornerRadius::same(8),
            Stroke::new(1., PALETTE_PRIMARY.gamma_multiply(0.4)),
            StrokeKind::Inside,
        );
        let painter = painter.with_clip_rect(rect);
        let camera = &self.map_camera;

        // floor grid
        for i in -GRID_HALF_SIZE..=GRID_HALF_SIZE {
            let offset = i as f32;
            let extent = GRID_HALF_SIZE as f32;
            let color = if i == 0 { PALETTE_PRIMARY } else { GRID_COLOR };
            for (from, to) in [
                (
                    Point3::new(offset, GRID_FLOOR_Y, -extent),
                    Point3::new(offset, GRID_FLOOR_Y, extent),
                ),
                (
                    Point3::new(-extent, GRID_FLOOR_Y, offset),
                    Point3::new(extent, GRID_FLOOR_Y, offset),
                ),
            ] {
                if let (Some(a), Some(b)) = (camera.project(from, rect), camera.project(to, rect)) {
                    painter.line_segment([a, b], Stroke::new(1., color));
                }
            }
        }

        for point in self.mapping.map_points() {
            if let Some(screen) = camera.project_cloud_point(*point, rect) {
                let [r, g, b] = point_color(point);
                painter.circle_filled(
                    screen,
                    1.5,
                    Color32::from_rgb((r * 255.) as u8, (g * 255.) as u8, (b * 255.) as u8),
                );
            }
        }

        for keyframe in self.mapping.keyframes() {
            if let Some(screen) = camera.project(*keyframe, rect) {
                painter.circle_filled(screen, 3., PALETTE_SUCCESS);
            }
        }

        let position = self.mapping.position();
        let marker = Point3::new(position.x, position.y + 0.1, position.z);
        if let Some(screen) = camera.project(marker, rect) {
            painter.circle_filled(screen, 6., PALETTE_PRIMARY);
            painter.circle_stroke(
                screen,
                9.,
                Stroke::new(1., PALETTE_PRIMARY.gamma_multiply(0.5)),
            );
            let label_anchor = Point3::new(position.x, position.y + 0.3, position.z);
            if let Some(label) = camera.project(label_anchor, rect) {
                painter.text(
                    label,
                    Align2::CENTER_BOTTOM,
                    "Current Position",
                    FontId::proportional(11.),
                    PALETTE_PRIMARY,
                );
            }
        }

        self.tracking_overlay(ui, &painter, rect, position);

        painter.text(
            rect.max - Vec2::new(12., 10.),
            Align2::RIGHT_BOTTOM,
            "⟳ Drag to rotate • Scroll to zoom",
            FontId::proportional(11.),
            PALETTE_TEXT_MUTED,
        );
    }

    fn tracking_overlay(&self, ui: &Ui, painter: &Painter, rect: Rect, position: Point3) {
        let status = self.mapping.tracking_status();
        let color = tracking_color(status);
        let overlay = Rect::from_min_size(rect.min + Vec2::splat(16.), Vec2::new(180., 46.));
        painter.rect_filled(overlay, CornerRadius::same(8), PALETTE_BACKGROUND.gamma_multiply(0.9));
        painter.rect_stroke(
            overlay,
            CornerRadius::same(8),
            Stroke::new(1., PALETTE_BORDER),
            StrokeKind::Inside,
        );

        let pulse = 0.55 + 0.45 * ((ui.input(|i| i.time) as f32) * 3.).sin().abs();
        let status_line = overlay.min + Vec2::new(10., 14.);
        painter.circle_filled(status_line, 4., color.gamma_multiply(pulse));
        painter.text(
            status_line + Vec2::new(10., 0.),
            Align2::LEFT_CENTER,
            capitalize(&status.to_string()),
            FontId::proportional(13.),
            color,
        );
        painter.text(
            overlay.min + Vec2::new(10., 33.),
            Align2::LEFT_CENTER,
            format!("Position: ({:.2}, {:.2})", position.x, position.z),
            FontId::proportional(11.),
            PALETTE_TEXT_MUTED,
        );
    }
}

fn statistic(ui: &mut Ui, value: String, caption: &str) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(value).size(18.).strong().color(PALETTE_PRIMARY));
        ui.label(RichText::new(caption).small().color(PALETTE_TEXT_MUTED));
    });
}
