mod camera_view;
mod chrome;
pub mod config;
mod map_view;
pub mod orbit;
mod status_view;
mod voice_view;

use std::time::{Duration, Instant};

use config::{AppConfig, RunOverrides};
use egui::{Color32, ScrollArea, Visuals, style::Widgets};
use log::{error, info};
use rand::{SeedableRng, rngs::StdRng};

use crate::simulation::{DetectionModel, MappingModel, Simulation, StatusModel, VoiceAssistant};
use crate::ui::{
    PALETTE_BACKGROUND, PALETTE_MUTED, PALETTE_PANEL, PALETTE_PRIMARY, PALETTE_PRIMARY_GLOW,
};

use orbit::OrbitCamera;

/// Upper bound between repaints so animations keep moving.
const FRAME_INTERVAL_MS: u64 = 33;
const PANEL_SPACING: f32 = 24.;

/// `DashboardApp` renders the Smart Assist dashboard and drives its simulations.
///
/// # Fields
///
/// * `app_config` - Settings as loaded plus window placement, saved on exit.
///   Run overrides are applied to a copy and never land here.
/// * `rng` - The single random source lent to whichever simulation is ticking.
/// * `detection`, `mapping`, `voice`, `status` - One model per panel.
/// * `map_camera` - Orbit camera shared by the inline and detached map views.
/// * `paused` - Set by the emergency stop; no simulation is polled while set.
/// * `persist_config` - Cleared when the run ignores the saved config.
///
/// # Methods
///
/// * `new` - Creates the app and installs the dashboard visuals.
/// * `poll_simulations` - Runs due ticks and reports the next deadline.
/// * `update` - Polls the simulations and renders the UI.
pub struct DashboardApp {
    app_config: AppConfig,
    rng: StdRng,
    detection: DetectionModel,
    mapping: MappingModel,
    voice: VoiceAssistant,
    status: StatusModel,
    map_camera: OrbitCamera,
    paused: bool,
    show_map_window: bool,
    persist_config: bool,
}

impl DashboardApp {
    pub fn new(
        app_config: AppConfig,
        overrides: &RunOverrides,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let default_visuals = Visuals {
            dark_mode: true,
            hyperlink_color: PALETTE_PRIMARY_GLOW,
            faint_bg_color: PALETTE_MUTED,
            extreme_bg_color: PALETTE_BACKGROUND,
            panel_fill: PALETTE_BACKGROUND,
            window_fill: PALETTE_PANEL,
            button_frame: true,
            widgets: Widgets::dark(),
            striped: false,
            selection: egui::style::Selection {
                bg_fill: PALETTE_PRIMARY,
                stroke: egui::Stroke::new(1., Color32::WHITE),
            },
            ..Default::default()
        };
        cc.egui_ctx.set_visuals(default_visuals);

        Self::with_overrides(app_config, overrides, Instant::now())
    }

    /// Builds the dashboard state without a window.
    pub fn with_config(app_config: AppConfig, now: Instant) -> Self {
        Self::with_overrides(app_config, &RunOverrides::default(), now)
    }

    pub fn with_overrides(app_config: AppConfig, overrides: &RunOverrides, now: Instant) -> Self {
        let run_config = app_config.with_overrides(overrides);
        let mut rng = match run_config.seed {
            Some(seed) => {
                info!("Running simulation with seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        let detection = DetectionModel::new(
            run_config.detection_enabled,
            run_config.detection_refresh(),
            now,
        );
        let mapping = MappingModel::generate(
            &mut rng,
            run_config.map_points,
            run_config.keyframes,
            run_config.mapping_refresh(),
            now,
        );
        let voice = VoiceAssistant::new(run_config.listen_delay(), run_config.response_delay());
        let status = StatusModel::new(
            run_config.limits.clone(),
            run_config.performance_history,
            run_config.status_refresh(),
            now,
        );

        Self {
            app_config,
            rng,
            detection,
            mapping,
            voice,
            status,
            map_camera: OrbitCamera::default(),
            paused: false,
            show_map_window: false,
            persist_config: !overrides.ignore_saved,
        }
    }

    /// Settings that are written back on exit.
    pub fn app_config(&self) -> &AppConfig {
        &self.app_config
    }

    pub fn persists_config(&self) -> bool {
        self.persist_config
    }

    pub fn detection(&self) -> &DetectionModel {
        &self.detection
    }

    pub fn mapping(&self) -> &MappingModel {
        &self.mapping
    }

    pub fn voice(&self) -> &VoiceAssistant {
        &self.voice
    }

    pub fn status(&self) -> &StatusModel {
        &self.status
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Runs every tick that is due and returns the earliest pending deadline.
    pub fn poll_simulations(&mut self, now: Instant) -> Option<Instant> {
        if self.paused {
            return None;
        }
        let simulations: [&mut dyn Simulation; 4] = [
            &mut self.detection,
            &mut self.mapping,
            &mut self.voice,
            &mut self.status,
        ];
        let mut next_deadline: Option<Instant> = None;
        for simulation in simulations {
            simulation.poll(now, &mut self.rng);
            next_deadline = match (next_deadline, simulation.next_deadline()) {
                (Some(current), Some(candidate)) => Some(current.min(candidate)),
                (current, candidate) => current.or(candidate),
            };
        }
        next_deadline
    }

    /// Emergency stop: freezes every panel, pressing again resumes.
    pub fn toggle_pause(&mut self, now: Instant) {
        self.paused = !self.paused;
        if self.paused {
            info!("Emergency stop: simulation paused");
        } else {
            info!("Simulation resumed");
            self.detection.resume(now);
            self.mapping.resume(now);
            self.voice.resume(now);
            self.status.resume(now);
        }
    }

    pub fn toggle_detection(&mut self, now: Instant) {
        self.detection.toggle(now);
        self.app_config.detection_enabled = self.detection.is_enabled();
    }

    pub fn start_listening(&mut self, now: Instant) -> bool {
        self.voice.start_listening(now)
    }

    pub fn stop_listening(&mut self) {
        self.voice.stop_listening();
    }

    /// Calibrate: resets the mapped position to the origin.
    pub fn calibrate(&mut self) {
        self.mapping.recenter();
    }
}

impl eframe::App for DashboardApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if !self.persist_config {
            info!("Running on defaults, leaving the saved config untouched");
            return;
        }
        if let Err(e) = self.app_config.save() {
            error!("Error while saving config file: {}", e);
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let next_deadline = self.poll_simulations(now);
        if !self.paused {
            self.map_camera.advance_spin(ctx.input(|i| i.stable_dt));
        }

        if let Some(outer_rect) = ctx.input(|is| is.viewport().outer_rect) {
            self.app_config.window_position = Some(outer_rect.min.into());
        }
        if let Some(inner_rect) = ctx.input(|is| is.viewport().inner_rect) {
            self.app_config.window_size = inner_rect.size().into();
        }

        self.header(ctx);
        self.footer(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                ui.columns(2, |columns| {
                    let (left, right) = columns.split_at_mut(1);
                    let left = &mut left[0];
                    self.camera_panel(left);
                    left.add_space(PANEL_SPACING);
                    self.voice_panel(left);

                    let right = &mut right[0];
                    self.map_panel(right);
                    right.add_space(PANEL_SPACING);
                    self.status_panel(right);
                });
            });
        });

        // detached map viewport
        if self.show_map_window {
            self.map_window(ctx);
        }

        // repaint for animations, sooner if a timer is about to fire
        let mut repaint_after = Duration::from_millis(FRAME_INTERVAL_MS);
        if let Some(deadline) = next_deadline {
            repaint_after = repaint_after.min(deadline.saturating_duration_since(Instant::now()));
        }
        ctx.request_repaint_after(repaint_after);
    }
}
