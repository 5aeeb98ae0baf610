use std::time::{Duration, Instant};

use log::{debug, info};
use rand::{Rng, RngCore};
use uom::si::{f32::Length, length::meter};

use super::{Point3, Simulation, Ticker, TrackingStatus};

pub const DEFAULT_MAP_POINTS: usize = 500;
pub const DEFAULT_KEYFRAMES: usize = 20;

/// Half extents of the generated point cloud on each axis.
const CLOUD_HALF_EXTENT: Point3 = Point3 {
    x: 5.,
    y: 1.5,
    z: 5.,
};
const KEYFRAME_HALF_EXTENT: f32 = 4.;
/// Maximum position change per axis per tick.
pub const MAX_POSITION_STEP: f32 = 0.05;

/// Simulated visual SLAM state.
///
/// The point cloud and keyframes are generated once. Each tick moves the
/// current position on the floor plane and re-rolls the tracking status.
pub struct MappingModel {
    map_points: Vec<Point3>,
    keyframes: Vec<Point3>,
    position: Point3,
    tracking_status: TrackingStatus,
    ticker: Ticker,
}

impl MappingModel {
    pub fn generate(
        rng: &mut dyn RngCore,
        point_count: usize,
        keyframe_count: usize,
        refresh: Duration,
        now: Instant,
    ) -> Self {
        let map_points = (0..point_count)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-CLOUD_HALF_EXTENT.x..CLOUD_HALF_EXTENT.x),
                    rng.gen_range(-CLOUD_HALF_EXTENT.y..CLOUD_HALF_EXTENT.y),
                    rng.gen_range(-CLOUD_HALF_EXTENT.z..CLOUD_HALF_EXTENT.z),
                )
            })
            .collect();
        let keyframes = (0..keyframe_count)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-KEYFRAME_HALF_EXTENT..KEYFRAME_HALF_EXTENT),
                    0.,
                    rng.gen_range(-KEYFRAME_HALF_EXTENT..KEYFRAME_HALF_EXTENT),
                )
            })
            .collect();
        debug!(
            "Generated map with {} points and {} keyframes",
            point_count, keyframe_count
        );

        Self {
            map_points,
            keyframes,
            position: Point3::ORIGIN,
            tracking_status: TrackingStatus::Tracking,
            ticker: Ticker::new(refresh, now),
        }
    }

    pub fn map_points(&self) -> &[Point3] {
        &self.map_points
    }

    pub fn keyframes(&self) -> &[Point3] {
        &self.keyframes
    }

    pub fn keyframe_count(&self) -> usize {
        self.keyframes.len()
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    pub fn tracking_status(&self) -> TrackingStatus {
        self.tracking_status
    }

    pub fn tick(&mut self, rng: &mut dyn RngCore) {
        self.position = Point3::new(
            self.position.x + rng.gen_range(-MAX_POSITION_STEP..MAX_POSITION_STEP),
            0.,
            self.position.z + rng.gen_range(-MAX_POSITION_STEP..MAX_POSITION_STEP),
        );
        self.tracking_status = TrackingStatus::roll(rng);
        debug!(
            "Position ({:.2}, {:.2}) status {}",
            self.position.x, self.position.z, self.tracking_status
        );
    }

    /// Planar distance of the current position from the map origin.
    pub fn distance_from_origin(&self) -> Length {
        Length::new::<meter>(self.position.x.hypot(self.position.z))
    }

    /// Moves the current position back to the map origin.
    pub fn recenter(&mut self) {
        info!("Recentering map position");
        self.position = Point3::ORIGIN;
    }
}

impl Simulation for MappingModel {
    fn poll(&mut self, now: Instant, rng: &mut dyn RngCore) -> bool {
        if !self.ticker.poll(now) {
            return false;
        }
        self.tick(rng);
        true
    }

    fn next_deadline(&self) -> Option<Instant> {
        Some(self.ticker.deadline())
    }

    fn resume(&mut self, now: Instant) {
        self.ticker.reset(now);
    }
}

/// Color of a cloud point, brighter the further it is from the origin.
pub fn point_color(point: &Point3) -> [f32; 3] {
    let distance = point.length();
    [
        (0.3 + distance * 0.1).clamp(0., 1.),
        (0.6 + distance * 0.1).clamp(0., 1.),
        1.,
    ]
}
