use egui::{
    Color32, CornerRadius, Frame, Margin, Response, RichText, Sense, Stroke, Ui, Vec2,
};
use log::debug;

use crate::simulation::{NetworkStatus, TrackingStatus, status::BatteryLevel};

pub mod dashboard;

pub(crate) const PALETTE_BACKGROUND: Color32 = Color32::from_rgb(10, 14, 26);
pub(crate) const PALETTE_PANEL: Color32 = Color32::from_rgb(17, 24, 39);
pub(crate) const PALETTE_MUTED: Color32 = Color32::from_rgb(31, 41, 55);
pub(crate) const PALETTE_BORDER: Color32 = Color32::from_rgb(55, 65, 81);
pub(crate) const PALETTE_TEXT_MUTED: Color32 = Color32::from_rgb(148, 163, 184);
pub(crate) const PALETTE_PRIMARY: Color32 = Color32::from_rgb(79, 156, 249);
pub(crate) const PALETTE_PRIMARY_GLOW: Color32 = Color32::from_rgb(125, 211, 252);
pub(crate) const PALETTE_SUCCESS: Color32 = Color32::from_rgb(16, 185, 129);
pub(crate) const PALETTE_WARNING: Color32 = Color32::from_rgb(245, 158, 11);
pub(crate) const PALETTE_DESTRUCTIVE: Color32 = Color32::from_rgb(239, 68, 68);

const PANEL_CORNER_RADIUS: u8 = 10;
const BADGE_CORNER_RADIUS: u8 = 8;

/// Frame shared by every dashboard panel.
pub(crate) fn panel_frame() -> Frame {
    Frame::new()
        .fill(PALETTE_PANEL)
        .stroke(Stroke::new(1., PALETTE_BORDER))
        .corner_radius(CornerRadius::same(PANEL_CORNER_RADIUS))
        .inner_margin(Margin::same(16))
}

pub(crate) fn panel_title(ui: &mut Ui, icon: &str, title: &str) {
    ui.label(RichText::new(icon).size(18.).color(PALETTE_PRIMARY));
    ui.label(RichText::new(title).size(17.).strong().color(Color32::WHITE));
}

/// Small pill with colored text, outlined or filled.
pub(crate) fn badge(ui: &mut Ui, text: impl Into<String>, color: Color32, filled: bool) -> Response {
    let (fill, text_color) = if filled {
        (color, Color32::WHITE)
    } else {
        (Color32::TRANSPARENT, color)
    };
    Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1., color))
        .corner_radius(CornerRadius::same(BADGE_CORNER_RADIUS))
        .inner_margin(Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text.into()).small().color(text_color));
        })
        .response
}

/// Round indicator light. Pulses when `pulse` is set.
pub(crate) fn status_dot(ui: &mut Ui, color: Color32, pulse: bool) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(10.), Sense::hover());
    let alpha = if pulse {
        let t = ui.input(|i| i.time) as f32;
        0.55 + 0.45 * (t * 3.).sin().abs()
    } else {
        1.
    };
    ui.painter()
        .circle_filled(rect.center(), 4., color.gamma_multiply(alpha));
    response
}

pub(crate) fn tracking_color(status: TrackingStatus) -> Color32 {
    match status {
        TrackingStatus::Tracking => PALETTE_SUCCESS,
        TrackingStatus::Lost => PALETTE_DESTRUCTIVE,
        TrackingStatus::Relocalizing => PALETTE_WARNING,
    }
}

pub(crate) fn network_color(status: NetworkStatus) -> Color32 {
    match status {
        NetworkStatus::Connected => PALETTE_SUCCESS,
        NetworkStatus::Disconnected => PALETTE_DESTRUCTIVE,
        NetworkStatus::Weak => PALETTE_WARNING,
    }
}

pub(crate) fn battery_color(level: BatteryLevel) -> Color32 {
    match level {
        BatteryLevel::Good => PALETTE_SUCCESS,
        BatteryLevel::Low => PALETTE_WARNING,
        BatteryLevel::Critical => PALETTE_DESTRUCTIVE,
    }
}

pub(crate) fn status_icon(healthy: bool) -> &'static str {
    if healthy { "✔" } else { "⚠" }
}

/// Capitalizes the first letter of a status label.
pub(crate) fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Linear interpolation between two colors, `y` in [0,1].
pub(crate) fn stroke_shade(start: Color32, end: Color32, y: f32) -> Color32 {
    let channel = |from: u8, to: u8| -> u8 {
        let value = (from as f32 + y * (to as f32 - from as f32)).clamp(0., 255.) as u32;
        u8::try_from(value)
            .map_err(|e| debug!("Error interpolating colors: {}", e))
            .unwrap_or(to)
    };
    Color32::from_rgb(
        channel(start.r(), end.r()),
        channel(start.g(), end.g()),
        channel(start.b(), end.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_shade_endpoints() {
        assert_eq!(stroke_shade(Color32::BLACK, Color32::WHITE, 0.), Color32::BLACK);
        assert_eq!(stroke_shade(Color32::BLACK, Color32::WHITE, 1.), Color32::WHITE);
        assert_eq!(
            stroke_shade(Color32::BLACK, Color32::WHITE, 2.),
            Color32::WHITE
        );
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("re-localizing"), "Re-localizing");
        assert_eq!(capitalize(""), "");
    }
}
