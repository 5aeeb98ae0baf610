use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::{Simulation, Ticker};

/// Size of the surface the bounding boxes are expressed in.
pub const OVERLAY_WIDTH: f32 = 640.;
pub const OVERLAY_HEIGHT: f32 = 360.;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    pub id: String,
    pub label: String,
    /// 0=no confidence to 1=certain
    pub confidence: f32,
    pub bbox: BoundingBox,
}

impl DetectedObject {
    fn new(id: &str, label: &str, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            confidence,
            bbox,
        }
    }

    /// Confidence as a whole percentage, as printed on the overlay.
    pub fn confidence_pct(&self) -> u32 {
        (self.confidence * 100.).round() as u32
    }

    pub fn caption(&self) -> String {
        format!("{} {}%", self.label, self.confidence_pct())
    }
}

/// The fixed detection result published on every refresh.
pub fn mock_detections() -> Vec<DetectedObject> {
    vec![
        DetectedObject::new(
            "1",
            "Chair",
            0.87,
            BoundingBox {
                x: 150.,
                y: 200.,
                width: 120.,
                height: 80.,
            },
        ),
        DetectedObject::new(
            "2",
            "Table",
            0.92,
            BoundingBox {
                x: 300.,
                y: 180.,
                width: 150.,
                height: 100.,
            },
        ),
        DetectedObject::new(
            "3",
            "Person",
            0.95,
            BoundingBox {
                x: 50.,
                y: 100.,
                width: 80.,
                height: 160.,
            },
        ),
    ]
}

pub struct DetectionModel {
    enabled: bool,
    objects: Vec<DetectedObject>,
    ticker: Ticker,
}

impl DetectionModel {
    pub fn new(enabled: bool, refresh: Duration, now: Instant) -> Self {
        Self {
            enabled,
            objects: Vec::new(),
            ticker: Ticker::new(refresh, now),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn objects(&self) -> &[DetectedObject] {
        &self.objects
    }

    /// Replaces the whole object list. No-op while detection is off.
    pub fn tick(&mut self) {
        if !self.enabled {
            return;
        }
        self.objects = mock_detections();
        debug!(
            "Detection refreshed: [{}]",
            self.objects.iter().map(DetectedObject::caption).join(", ")
        );
    }

    pub fn set_enabled(&mut self, enabled: bool, now: Instant) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.ticker.reset(now);
        } else {
            self.objects.clear();
        }
        info!("Object detection {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn toggle(&mut self, now: Instant) {
        self.set_enabled(!self.enabled, now);
    }
}

impl Simulation for DetectionModel {
    fn poll(&mut self, now: Instant, _rng: &mut dyn RngCore) -> bool {
        if !self.enabled || !self.ticker.poll(now) {
            return false;
        }
        self.tick();
        true
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.enabled.then(|| self.ticker.deadline())
    }

    fn resume(&mut self, now: Instant) {
        self.ticker.reset(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    const REFRESH: Duration = Duration::from_millis(2000);

    #[test]
    fn test_starts_empty_and_fills_on_first_tick() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut model = DetectionModel::new(true, REFRESH, start);
        assert!(model.objects().is_empty());

        assert!(!model.poll(start + Duration::from_millis(1000), &mut rng));
        assert!(model.objects().is_empty());

        assert!(model.poll(start + REFRESH, &mut rng));
        let labels: Vec<&str> = model.objects().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Chair", "Table", "Person"]);
    }

    #[test]
    fn test_disable_clears_and_stops_updates() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut model = DetectionModel::new(true, REFRESH, start);
        model.poll(start + REFRESH, &mut rng);
        assert_eq!(model.objects().len(), 3);

        model.toggle(start + REFRESH);
        assert!(!model.is_enabled());
        assert!(model.objects().is_empty());
        assert_eq!(model.next_deadline(), None);

        for i in 1..10 {
            assert!(!model.poll(start + REFRESH * i * 2, &mut rng));
            assert!(model.objects().is_empty());
        }

        // direct ticks are ignored as well
        model.tick();
        assert!(model.objects().is_empty());
    }

    #[test]
    fn test_reenable_waits_one_period() {
        let start = Instant::now();
        let mut rng = StdRng::seed_from_u64(1);
        let mut model = DetectionModel::new(false, REFRESH, start);

        let enabled_at = start + Duration::from_secs(60);
        model.set_enabled(true, enabled_at);
        assert!(!model.poll(enabled_at, &mut rng));
        assert!(model.poll(enabled_at + REFRESH, &mut rng));
        assert_eq!(model.objects().len(), 3);
    }

    #[test]
    fn test_caption() {
        let objects = mock_detections();
        assert_eq!(objects[0].caption(), "Chair 87%");
        assert_eq!(objects[2].confidence_pct(), 95);
        for object in &objects {
            assert!(object.confidence >= 0. && object.confidence <= 1.);
            assert!(object.bbox.x + object.bbox.width <= OVERLAY_WIDTH);
            assert!(object.bbox.y + object.bbox.height <= OVERLAY_HEIGHT);
        }
    }
}
