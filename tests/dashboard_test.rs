// Integration tests for the dashboard simulations
//
// These drive `DashboardApp` headlessly with a fixed seed and synthetic
// clock values, the same way the frame loop does on every repaint.

use std::time::{Duration, Instant};

use smart_assist::simulation::voice::{PROCESSING_TEXT, Role, canned_response};
use smart_assist::simulation::{Point3, mapping::MAX_POSITION_STEP};
use smart_assist::{AppConfig, DashboardApp, RunOverrides};
use tempfile::tempdir;

fn seeded_config() -> AppConfig {
    AppConfig {
        seed: Some(1234),
        ..AppConfig::default()
    }
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[test]
fn test_panels_update_on_their_own_schedule() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);
    let initial_cpu = app.status().metrics().cpu;
    let initial_battery = app.status().metrics().battery;
    assert!(app.detection().objects().is_empty());
    assert_eq!(app.mapping().position(), Point3::ORIGIN);

    // nothing is due before the first period
    app.poll_simulations(start + ms(1000));
    assert_eq!(app.status().metrics().battery, initial_battery);
    assert_eq!(app.mapping().position(), Point3::ORIGIN);

    // status runs every 2s, mapping every 3s
    app.poll_simulations(start + ms(2000));
    assert!(app.status().metrics().battery < initial_battery);
    assert_eq!(app.detection().objects().len(), 3);
    assert_eq!(app.mapping().position(), Point3::ORIGIN);

    app.poll_simulations(start + ms(3000));
    let position = app.mapping().position();
    assert!(position.x.abs() <= MAX_POSITION_STEP);
    assert!(position.z.abs() <= MAX_POSITION_STEP);
    assert_eq!(position.y, 0.);

    let latest = app.status().history().latest().unwrap();
    assert_eq!(latest.cpu, app.status().metrics().cpu);
    assert_eq!(app.status().history().len(), 6);
    println!(
        "cpu went from {:.1} to {:.1}",
        initial_cpu,
        app.status().metrics().cpu
    );
}

#[test]
fn test_next_deadline_is_earliest_timer() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);

    let deadline = app.poll_simulations(start).unwrap();
    assert_eq!(deadline, start + ms(2000));

    app.start_listening(start + ms(500));
    let deadline = app.poll_simulations(start + ms(600)).unwrap();
    assert_eq!(deadline, start + ms(2000));
}

#[test]
fn test_emergency_stop_freezes_everything() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);
    app.start_listening(start);

    app.toggle_pause(start + ms(100));
    assert!(app.is_paused());
    assert_eq!(app.poll_simulations(start + ms(60_000)), None);
    assert_eq!(app.status().metrics().battery, 87.);
    assert_eq!(app.mapping().position(), Point3::ORIGIN);
    assert!(app.voice().is_listening());
    assert_eq!(app.voice().messages().len(), 1);
}

#[test]
fn test_resume_does_not_replay_missed_ticks() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);

    app.toggle_pause(start + ms(100));
    let resumed_at = start + ms(60_000);
    app.toggle_pause(resumed_at);
    assert!(!app.is_paused());

    // timers restart from the resume instant
    let deadline = app.poll_simulations(resumed_at).unwrap();
    assert_eq!(deadline, resumed_at + ms(2000));
    assert_eq!(app.status().metrics().battery, 87.);

    app.poll_simulations(resumed_at + ms(2000));
    assert!((app.status().metrics().battery - 86.9).abs() < 1e-4);
}

#[test]
fn test_detection_toggle() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);

    app.toggle_detection(start);
    assert!(!app.detection().is_enabled());
    assert!(app.detection().objects().is_empty());

    // disabled detection stays empty no matter how much time passes
    app.poll_simulations(start + ms(10_000));
    assert!(app.detection().objects().is_empty());

    let enabled_at = start + ms(10_000);
    app.toggle_detection(enabled_at);
    assert!(app.detection().is_enabled());
    app.poll_simulations(enabled_at + ms(2000));
    let labels: Vec<&str> = app
        .detection()
        .objects()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Chair", "Table", "Person"]);
}

#[test]
fn test_voice_command_gets_exactly_one_answer() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);
    assert!(app.start_listening(start));

    app.poll_simulations(start + ms(3000));
    let messages = app.voice().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[2].text, PROCESSING_TEXT);
    let command = messages[1].text.clone();
    assert!(app.voice().is_speaking());
    assert!(!app.start_listening(start + ms(3500)));

    app.poll_simulations(start + ms(5000));
    app.poll_simulations(start + ms(9000));
    let messages = app.voice().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].text, canned_response(&command));
    assert!(!app.voice().is_speaking());
    assert!(!app.voice().is_listening());
}

#[test]
fn test_stop_listening_cancels_recognition() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);
    app.start_listening(start);
    app.stop_listening();

    app.poll_simulations(start + ms(10_000));
    assert_eq!(app.voice().messages().len(), 1);
    assert_eq!(app.voice().current_command(), "");
}

#[test]
fn test_calibrate_recenters_position() {
    let start = Instant::now();
    let mut app = DashboardApp::with_config(seeded_config(), start);
    for step in 1..=5 {
        app.poll_simulations(start + ms(3000 * step));
    }

    app.calibrate();
    assert_eq!(app.mapping().position(), Point3::ORIGIN);
    assert_eq!(app.mapping().distance_from_origin().value, 0.);
}

#[test]
fn test_same_seed_same_map() {
    let start = Instant::now();
    let first = DashboardApp::with_config(seeded_config(), start);
    let second = DashboardApp::with_config(seeded_config(), start);
    assert_eq!(first.mapping().map_points(), second.mapping().map_points());
    assert_eq!(first.mapping().keyframes(), second.mapping().keyframes());
}

#[test]
fn test_config_controls_the_simulation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = AppConfig {
        map_points: 50,
        keyframes: 4,
        performance_history: 10,
        detection_enabled: false,
        ..seeded_config()
    };
    config.save_to(&path).unwrap();

    let loaded = AppConfig::from_file(&path).unwrap();
    let app = DashboardApp::with_config(loaded, Instant::now());
    assert_eq!(app.mapping().map_points().len(), 50);
    assert_eq!(app.mapping().keyframe_count(), 4);
    assert_eq!(app.status().history().capacity(), 10);
    assert!(!app.detection().is_enabled());
    assert!(app.detection().objects().is_empty());
}

#[test]
fn test_run_overrides_are_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    AppConfig::default().save_to(&path).unwrap();

    let overrides = RunOverrides {
        seed: Some(1234),
        detection_off: true,
        history: Some(3),
        ..RunOverrides::default()
    };
    let start = Instant::now();
    let loaded = AppConfig::from_file(&path).unwrap();
    let app = DashboardApp::with_overrides(loaded, &overrides, start);

    // the run itself uses the overrides
    let seeded = DashboardApp::with_config(seeded_config(), start);
    assert_eq!(app.mapping().map_points(), seeded.mapping().map_points());
    assert!(!app.detection().is_enabled());
    assert_eq!(app.status().history().capacity(), 3);
    assert!(app.persists_config());

    // what gets written back on exit does not
    app.app_config().save_to(&path).unwrap();
    let reloaded = AppConfig::from_file(&path).unwrap();
    assert_eq!(reloaded.seed, None);
    assert!(reloaded.detection_enabled);
    assert_eq!(reloaded.performance_history, AppConfig::default().performance_history);
}

#[test]
fn test_default_run_keeps_saved_config() {
    let overrides = RunOverrides {
        ignore_saved: true,
        ..RunOverrides::default()
    };
    let app = DashboardApp::with_overrides(AppConfig::default(), &overrides, Instant::now());
    assert!(!app.persists_config());

    let app = DashboardApp::with_config(AppConfig::default(), Instant::now());
    assert!(app.persists_config());
}
