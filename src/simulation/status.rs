use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

use chrono::Local;
use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use super::{NetworkStatus, Simulation, Ticker, TrackingStatus};

pub const DEFAULT_HISTORY_SAMPLES: usize = 6;

/// Bounds and step sizes of the simulated telemetry random walks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricLimits {
    pub battery_floor: f32,
    /// Battery percentage lost per tick
    pub battery_drain: f32,
    pub cpu_min: f32,
    pub cpu_max: f32,
    /// Full width of the uniform cpu step, centered on zero
    pub cpu_step: f32,
    pub memory_min: f32,
    pub memory_max: f32,
    /// Full width of the uniform memory step, centered on zero
    pub memory_step: f32,
    pub max_obstacles: u32,
}

impl Default for MetricLimits {
    fn default() -> Self {
        Self {
            battery_floor: 20.,
            battery_drain: 0.1,
            cpu_min: 10.,
            cpu_max: 90.,
            cpu_step: 10.,
            memory_min: 20.,
            memory_max: 85.,
            memory_step: 8.,
            max_obstacles: 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemMetrics {
    /// Battery charge, percent
    pub battery: f32,
    /// CPU usage, percent
    pub cpu: f32,
    /// Memory usage, percent
    pub memory: f32,
    pub slam_status: TrackingStatus,
    pub obstacle_count: u32,
    pub network_status: NetworkStatus,
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self {
            battery: 87.,
            cpu: 34.,
            memory: 56.,
            slam_status: TrackingStatus::Tracking,
            obstacle_count: 3,
            network_status: NetworkStatus::Connected,
        }
    }
}

impl SystemMetrics {
    pub fn tick(&mut self, rng: &mut dyn RngCore, limits: &MetricLimits) {
        // a battery already under the floor never gets charged up to it
        self.battery = (self.battery - limits.battery_drain)
            .max(limits.battery_floor)
            .min(self.battery);
        self.cpu = random_walk(rng, self.cpu, limits.cpu_step, limits.cpu_min, limits.cpu_max);
        self.memory = random_walk(
            rng,
            self.memory,
            limits.memory_step,
            limits.memory_min,
            limits.memory_max,
        );
        self.obstacle_count = rng.gen_range(0..=limits.max_obstacles);
        self.slam_status = TrackingStatus::roll(rng);
        self.network_status = NetworkStatus::roll(rng);
    }

    /// Pulls cpu and memory inside the configured ranges.
    pub fn clamp_to(&mut self, limits: &MetricLimits) {
        self.cpu = bound(self.cpu, limits.cpu_min, limits.cpu_max);
        self.memory = bound(self.memory, limits.memory_min, limits.memory_max);
    }
}

fn random_walk(rng: &mut dyn RngCore, value: f32, step: f32, min: f32, max: f32) -> f32 {
    let delta = (rng.r#gen::<f32>() - 0.5) * step;
    bound(value + delta, min, max)
}

/// Like `f32::clamp` without the panic on an inverted range, `max` wins.
fn bound(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Battery charge bands used to color the battery readout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatteryLevel {
    Good,
    Low,
    Critical,
}

pub fn battery_level(battery: f32) -> BatteryLevel {
    if battery > 60. {
        BatteryLevel::Good
    } else if battery > 30. {
        BatteryLevel::Low
    } else {
        BatteryLevel::Critical
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    /// Wall clock label, `HH:MM`
    pub time: String,
    pub cpu: f32,
    pub memory: f32,
}

impl PerformanceSample {
    pub fn new(time: impl Into<String>, cpu: f32, memory: f32) -> Self {
        Self {
            time: time.into(),
            cpu,
            memory,
        }
    }

    pub fn now(metrics: &SystemMetrics) -> Self {
        Self::new(
            Local::now().format("%H:%M").to_string(),
            metrics.cpu,
            metrics.memory,
        )
    }
}

/// Rolling window of the most recent cpu/memory samples.
#[derive(Clone, Debug)]
pub struct PerformanceHistory {
    capacity: usize,
    samples: VecDeque<PerformanceSample>,
}

impl PerformanceHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            // grows as samples arrive
            samples: VecDeque::new(),
        }
    }

    /// History pre-filled with the readings shown before the first tick.
    pub fn seeded(capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        let seed = [
            ("10:00", 25., 45.),
            ("10:01", 30., 48.),
            ("10:02", 28., 52.),
            ("10:03", 35., 49.),
            ("10:04", 32., 55.),
            ("10:05", 34., 56.),
        ];
        for (time, cpu, memory) in seed {
            history.push(PerformanceSample::new(time, cpu, memory));
        }
        history
    }

    pub fn push(&mut self, sample: PerformanceSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerformanceSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&PerformanceSample> {
        self.samples.back()
    }
}

pub struct StatusModel {
    metrics: SystemMetrics,
    limits: MetricLimits,
    history: PerformanceHistory,
    ticker: Ticker,
}

impl StatusModel {
    pub fn new(limits: MetricLimits, history_size: usize, refresh: Duration, now: Instant) -> Self {
        let mut metrics = SystemMetrics::default();
        metrics.clamp_to(&limits);
        Self {
            metrics,
            limits,
            history: PerformanceHistory::seeded(history_size),
            ticker: Ticker::new(refresh, now),
        }
    }

    pub fn metrics(&self) -> &SystemMetrics {
        &self.metrics
    }

    pub fn limits(&self) -> &MetricLimits {
        &self.limits
    }

    pub fn history(&self) -> &PerformanceHistory {
        &self.history
    }

    /// Advances the metrics and records the resulting cpu/memory sample.
    pub fn tick(&mut self, rng: &mut dyn RngCore) {
        self.metrics.tick(rng, &self.limits);
        self.history.push(PerformanceSample::now(&self.metrics));
        debug!(
            "Metrics battery {:.1} cpu {:.1} memory {:.1} obstacles {} network {}",
            self.metrics.battery,
            self.metrics.cpu,
            self.metrics.memory,
            self.metrics.obstacle_count,
            self.metrics.network_status
        );
    }
}

impl Simulation for StatusModel {
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
