pub mod detection;
pub mod mapping;
pub mod status;
pub mod timer;
pub mod voice;

use std::{fmt, time::Instant};

use rand::{RngCore, seq::SliceRandom};
use serde::{Deserialize, Serialize};

pub use detection::{BoundingBox, DetectedObject, DetectionModel};
pub use mapping::MappingModel;
pub use status::{MetricLimits, PerformanceHistory, PerformanceSample, StatusModel, SystemMetrics};
pub use timer::{Delay, Ticker};
pub use voice::{VoiceAssistant, VoiceMessage};

/// A panel model driven by its own timer(s).
///
/// The dashboard polls every simulation once per frame. Simulations never
/// look at each other's state.
pub trait Simulation {
    /// Runs whatever ticks are due at `now`. Returns true if the state changed.
    fn poll(&mut self, now: Instant, rng: &mut dyn RngCore) -> bool;

    /// The earliest instant at which `poll` could change state, if any timer is armed.
    fn next_deadline(&self) -> Option<Instant>;

    /// Re-arms the timers from `now` after the simulation was paused.
    fn resume(&mut self, now: Instant);
}

/// A coordinate in map space, meters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 {
        x: 0.,
        y: 0.,
        z: 0.,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackingStatus {
    #[default]
    Tracking,
    Lost,
    Relocalizing,
}

impl TrackingStatus {
    /// Tracking is three times as likely as either failure state.
    const WEIGHTED: [TrackingStatus; 5] = [
        TrackingStatus::Tracking,
        TrackingStatus::Tracking,
        TrackingStatus::Tracking,
        TrackingStatus::Lost,
        TrackingStatus::Relocalizing,
    ];

    pub fn roll(rng: &mut dyn RngCore) -> Self {
        *Self::WEIGHTED.choose(rng).unwrap_or(&TrackingStatus::Tracking)
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Tracking => write!(f, "tracking"),
            TrackingStatus::Lost => write!(f, "lost"),
            TrackingStatus::Relocalizing => write!(f, "re-localizing"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkStatus {
    #[default]
    Connected,
    Weak,
    Disconnected,
}

impl NetworkStatus {
    // disconnected can be displayed but is never drawn
    const WEIGHTED: [NetworkStatus; 3] = [
        NetworkStatus::Connected,
        NetworkStatus::Connected,
        NetworkStatus::Weak,
    ];

    pub fn roll(rng: &mut dyn RngCore) -> Self {
        *Self::WEIGHTED.choose(rng).unwrap_or(&NetworkStatus::Connected)
    }
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkStatus::Connected => write!(f, "connected"),
            NetworkStatus::Weak => write!(f, "weak"),
            NetworkStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}
