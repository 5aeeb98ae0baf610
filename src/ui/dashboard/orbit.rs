use egui::{Pos2, Rect, Vec2};

use crate::simulation::Point3;

const FIELD_OF_VIEW_RAD: f32 = std::f32::consts::FRAC_PI_3;
const NEAR_PLANE: f32 = 0.1;
const MIN_DISTANCE: f32 = 2.;
const MAX_DISTANCE: f32 = 30.;
const MAX_PITCH: f32 = 1.5;
const DRAG_SENSITIVITY: f32 = 0.01;
const ZOOM_SENSITIVITY: f32 = 0.001;
/// Point cloud spin, radians per second.
const CLOUD_SPIN_RATE: f32 = 0.12;

/// Perspective camera orbiting the map origin.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    yaw: f32,
    pitch: f32,
    distance: f32,
    cloud_rotation: f32,
}

impl Default for OrbitCamera {
    /// Looks at the origin from (5, 5, 5).
    fn default() -> Self {
        Self {
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: (1. / 2f32.sqrt()).atan(),
            distance: 75f32.sqrt(),
            cloud_rotation: 0.,
        }
    }
}

impl OrbitCamera {
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn cloud_rotation(&self) -> f32 {
        self.cloud_rotation
    }

    pub fn rotate(&mut self, drag: Vec2) {
        self.yaw -= drag.x * DRAG_SENSITIVITY;
        self.pitch = (self.pitch + drag.y * DRAG_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.distance =
            (self.distance * (1. - scroll * ZOOM_SENSITIVITY)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn advance_spin(&mut self, dt: f32) {
        self.cloud_rotation = (self.cloud_rotation + CLOUD_SPIN_RATE * dt) % std::f32::consts::TAU;
    }

    /// Projects a world point into `rect`. `None` when behind the camera.
    pub fn project(&self, point: Point3, rect: Rect) -> Option<Pos2> {
        // yaw around the vertical axis, then pitch around the camera's horizontal axis
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let x = point.x * cos_yaw - point.z * sin_yaw;
        let z = point.x * sin_yaw + point.z * cos_yaw;

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let y = point.y * cos_pitch - z * sin_pitch;
        let z = point.y * sin_pitch + z * cos_pitch;

        let depth = self.distance - z;
        if depth < NEAR_PLANE {
            return None;
        }
        let focal = rect.height() / (2. * (FIELD_OF_VIEW_RAD / 2.).tan());
        Some(Pos2::new(
            rect.center().x + x / depth * focal,
            rect.center().y - y / depth * focal,
        ))
    }

    /// Projects a cloud point, applying the cloud's own spin first.
    pub fn project_cloud_point(&self, point: Point3, rect: Rect) -> Option<Pos2> {
        let (sin, cos) = self.cloud_rotation.sin_cos();
        self.project(
            Point3::new(
                point.x * cos + point.z * sin,
                point.y,
                -point.x * sin + point.z * cos,
            ),
            rect,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_size(Pos2::ZERO, Vec2::new(640., 360.))
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = OrbitCamera::default();
        let projected = camera.project(Point3::ORIGIN, viewport()).unwrap();
        assert!((projected.x - 320.).abs() < 1e-3);
        assert!((projected.y - 180.).abs() < 1e-3);
    }

    #[test]
    fn test_points_above_origin_project_higher() {
        let camera = OrbitCamera::default();
        let up = camera.project(Point3::new(0., 1., 0.), viewport()).unwrap();
        assert!(up.y < 180.);
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        let camera = OrbitCamera::default();
        // the camera sits at (5, 5, 5)
        assert!(camera.project(Point3::new(6., 6., 6.), viewport()).is_none());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.zoom(100_000.);
        assert_eq!(camera.distance(), MIN_DISTANCE);
        camera.zoom(-100_000.);
        assert_eq!(camera.distance(), MAX_DISTANCE);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(Vec2::new(0., 10_000.));
        let top = camera.clone();
        camera.rotate(Vec2::new(0., 10.));
        assert_eq!(camera, top);
    }

    #[test]
    fn test_spin_wraps() {
        let mut camera = OrbitCamera::default();
        camera.advance_spin(1_000.);
        assert!(camera.cloud_rotation() >= 0. && camera.cloud_rotation() < std::f32::consts::TAU);
    }
}
