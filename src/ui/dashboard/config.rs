use std::{
    fs::File,
    path::{Path, PathBuf},
    time::Duration,
};

use egui::{Pos2, Vec2};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::SmartAssistError;
use crate::simulation::{
    MetricLimits,
    mapping::{DEFAULT_KEYFRAMES, DEFAULT_MAP_POINTS},
    status::DEFAULT_HISTORY_SAMPLES,
};

const CONFIG_DIR_NAME: &str = "smart-assist";
const CONFIG_FILE_NAME: &str = "config.json";

pub const DETECTION_REFRESH_MS: u64 = 2000;
pub const MAPPING_REFRESH_MS: u64 = 3000;
pub const STATUS_REFRESH_MS: u64 = 2000;
pub const LISTEN_DELAY_MS: u64 = 3000;
pub const RESPONSE_DELAY_MS: u64 = 2000;

pub const MAX_PERFORMANCE_HISTORY: usize = 3_600;
pub const MAX_MAP_POINTS: usize = 100_000;
pub const MAX_KEYFRAMES: usize = 10_000;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindowPosition {
    pub x: f32,
    pub y: f32,
}

impl Default for WindowPosition {
    fn default() -> Self {
        Self { x: 0., y: 0. }
    }
}

impl From<WindowPosition> for Pos2 {
    fn from(value: WindowPosition) -> Self {
        Pos2::new(value.x, value.y)
    }
}

impl From<Pos2> for WindowPosition {
    fn from(value: Pos2) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1400.,
            height: 960.,
        }
    }
}

impl From<WindowSize> for Vec2 {
    fn from(value: WindowSize) -> Self {
        Vec2::new(value.width, value.height)
    }
}

impl From<Vec2> for WindowSize {
    fn from(value: Vec2) -> Self {
        Self {
            width: value.x,
            height: value.y,
        }
    }
}

/// Command line options that apply to a single run and are never saved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub seed: Option<u64>,
    pub detection_off: bool,
    pub history: Option<usize>,
    /// Run on defaults and leave the saved config file untouched
    pub ignore_saved: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub detection_refresh_ms: u64,
    pub mapping_refresh_ms: u64,
    pub status_refresh_ms: u64,
    pub listen_delay_ms: u64,
    pub response_delay_ms: u64,
    pub performance_history: usize,
    pub map_points: usize,
    pub keyframes: usize,
    pub limits: MetricLimits,
    pub detection_enabled: bool,
    /// Fixed seed for a reproducible simulation, random when unset
    pub seed: Option<u64>,
    pub window_position: Option<WindowPosition>,
    pub window_size: WindowSize,
    pub map_window_position: WindowPosition,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            detection_refresh_ms: DETECTION_REFRESH_MS,
            mapping_refresh_ms: MAPPING_REFRESH_MS,
            status_refresh_ms: STATUS_REFRESH_MS,
            listen_delay_ms: LISTEN_DELAY_MS,
            response_delay_ms: RESPONSE_DELAY_MS,
            performance_history: DEFAULT_HISTORY_SAMPLES,
            map_points: DEFAULT_MAP_POINTS,
            keyframes: DEFAULT_KEYFRAMES,
            limits: MetricLimits::default(),
            detection_enabled: true,
            seed: None,
            window_position: None,
            window_size: WindowSize::default(),
            map_window_position: WindowPosition::default(),
        }
    }
}

fn invalid(field: &str, reason: &str) -> SmartAssistError {
    SmartAssistError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, SmartAssistError> {
        Ok(dirs::config_dir()
            .ok_or(SmartAssistError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    /// Loads the config from the user's config directory, `None` when no file exists yet.
    pub fn from_local_file() -> Result<Option<Self>, SmartAssistError> {
        let config_path = Self::default_path()?;
        if config_path.exists() {
            Self::from_file(&config_path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, SmartAssistError> {
        let file = File::open(path).map_err(|e| SmartAssistError::ConfigIOError { source: e })?;
        let config: AppConfig = serde_json::from_reader(file)
            .map_err(|e| SmartAssistError::ConfigParseError { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the local config, falling back to defaults when it is missing or broken.
    pub fn load_or_default() -> Self {
        match Self::from_local_file() {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), SmartAssistError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), SmartAssistError> {
        if let Some(parent) = config_path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| SmartAssistError::ConfigIOError { source: e })?;
        }

        let file = File::create(config_path)
            .map_err(|e| SmartAssistError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| SmartAssistError::ConfigSerializeError { source: e })
    }

    pub fn validate(&self) -> Result<(), SmartAssistError> {
        for (field, value) in [
            ("detection_refresh_ms", self.detection_refresh_ms),
            ("mapping_refresh_ms", self.mapping_refresh_ms),
            ("status_refresh_ms", self.status_refresh_ms),
            ("listen_delay_ms", self.listen_delay_ms),
            ("response_delay_ms", self.response_delay_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be greater than zero"));
            }
        }
        if self.performance_history == 0 {
            return Err(invalid("performance_history", "must keep at least one sample"));
        }
        for (field, value, max) in [
            (
                "performance_history",
                self.performance_history,
                MAX_PERFORMANCE_HISTORY,
            ),
            ("map_points", self.map_points, MAX_MAP_POINTS),
            ("keyframes", self.keyframes, MAX_KEYFRAMES),
        ] {
            if value > max {
                return Err(invalid(field, &format!("must not exceed {}", max)));
            }
        }

        let limits = &self.limits;
        if limits.cpu_min > limits.cpu_max {
            return Err(invalid("limits.cpu_min", "must not exceed cpu_max"));
        }
        if limits.memory_min > limits.memory_max {
            return Err(invalid("limits.memory_min", "must not exceed memory_max"));
        }
        for (field, value) in [
            ("limits.battery_floor", limits.battery_floor),
            ("limits.battery_drain", limits.battery_drain),
            ("limits.cpu_step", limits.cpu_step),
            ("limits.memory_step", limits.memory_step),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }

    /// Settings for this run only. The receiver stays as loaded so it can be
    /// saved back without the overrides.
    pub fn with_overrides(&self, overrides: &RunOverrides) -> Self {
        let mut config = self.clone();
        if overrides.seed.is_some() {
            config.seed = overrides.seed;
        }
        if overrides.detection_off {
            config.detection_enabled = false;
        }
        if let Some(history) = overrides.history {
            config.performance_history = history;
        }
        config
    }

    pub fn detection_refresh(&self) -> Duration {
        Duration::from_millis(self.detection_refresh_ms)
    }

    pub fn mapping_refresh(&self) -> Duration {
        Duration::from_millis(self.mapping_refresh_ms)
    }

    pub fn status_refresh(&self) -> Duration {
        Duration::from_millis(self.status_refresh_ms)
    }

    pub fn listen_delay(&self) -> Duration {
        Duration::from_millis(self.listen_delay_ms)
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = AppConfig {
            seed: Some(42),
            detection_enabled: false,
            performance_history: 12,
            window_position: Some(WindowPosition { x: 10., y: 20. }),
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{"seed": 7, "limits": {{"battery_floor": 5.0}}}}"#).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.limits.battery_floor, 5.);
        assert_eq!(loaded.limits.cpu_max, 90.);
        assert_eq!(loaded.detection_refresh_ms, DETECTION_REFRESH_MS);
        assert!(loaded.detection_enabled);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = AppConfig {
            status_refresh_ms: 0,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SmartAssistError::InvalidConfig { ref field, .. }) if field == "status_refresh_ms"
        ));

        let mut config = AppConfig::default();
        config.limits.cpu_min = 95.;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.limits.battery_drain = -1.;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let config = AppConfig {
            performance_history: usize::MAX,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SmartAssistError::InvalidConfig { ref field, .. }) if field == "performance_history"
        ));

        let config = AppConfig {
            map_points: MAX_MAP_POINTS + 1,
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SmartAssistError::InvalidConfig { ref field, .. }) if field == "map_points"
        ));

        let config = AppConfig {
            keyframes: usize::MAX,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            performance_history: MAX_PERFORMANCE_HISTORY,
            map_points: MAX_MAP_POINTS,
            keyframes: MAX_KEYFRAMES,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_file_value_is_rejected_on_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, format!(r#"{{"performance_history": {}}}"#, usize::MAX)).unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(SmartAssistError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_overrides_do_not_touch_saved_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let saved = AppConfig::default();
        saved.save_to(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        let overrides = RunOverrides {
            seed: Some(5),
            detection_off: true,
            history: Some(12),
            ..RunOverrides::default()
        };
        let effective = loaded.with_overrides(&overrides);
        assert_eq!(effective.seed, Some(5));
        assert!(!effective.detection_enabled);
        assert_eq!(effective.performance_history, 12);

        loaded.save_to(&path).unwrap();
        let reloaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(reloaded.seed, None);
        assert!(reloaded.detection_enabled);
        assert_eq!(reloaded.performance_history, DEFAULT_HISTORY_SAMPLES);
    }

    #[test]
    fn test_garbage_file_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            AppConfig::from_file(&path),
            Err(SmartAssistError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            AppConfig::from_file(&dir.path().join("absent.json")),
            Err(SmartAssistError::ConfigIOError { .. })
        ));
    }
}
