use clap::Parser;
use egui::Vec2;
use log::{error, info};

use smart_assist::{AppConfig, DashboardApp, RunOverrides, SmartAssistError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for a reproducible simulation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start with object detection switched off
    #[arg(long)]
    detection_off: bool,

    /// Number of samples kept in the performance chart
    #[arg(long)]
    history: Option<usize>,

    /// Run on defaults, ignoring and keeping the saved config file
    #[arg(long)]
    reset_config: bool,
}

impl Args {
    /// Flags that only shape this run, kept apart from the saved config.
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            seed: self.seed,
            detection_off: self.detection_off,
            history: self.history,
            ignore_saved: self.reset_config,
        }
    }
}

fn run(args: Args) -> Result<(), SmartAssistError> {
    let overrides = args.overrides();
    let app_config = if overrides.ignore_saved {
        info!("Starting from the default configuration");
        AppConfig::default()
    } else {
        AppConfig::load_or_default()
    };
    app_config.with_overrides(&overrides).validate()?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("Smart Assist")
        .with_min_inner_size(Vec2::new(960., 640.))
        .with_inner_size(Vec2::from(app_config.window_size.clone()));
    if let Some(position) = app_config.window_position.clone() {
        native_options.viewport = native_options.viewport.with_position(position);
    }

    eframe::run_native(
        "Smart Assist",
        native_options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(app_config, &overrides, cc)))),
    )
    .map_err(|e| SmartAssistError::WindowStartError {
        description: e.to_string(),
    })
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    let args = Args::parse();
    if let Err(e) = ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    }) {
        error!("Could not set Ctrl-C handler: {}", e);
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
