mod app;
mod categories;
mod config;
mod error;
mod interaction;
mod notify;
mod sequencer;
mod upload;
mod utils;
mod voice;

use app::IntakeUploader;
use config::Config;
use eframe::CreationContext;
use tracing::error;
use tracing_subscriber::EnvFilter;
use upload::HttpUploadEndpoint;

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

fn main() {
    let loaded = Config::load();
    let filter = loaded
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.to_string());
    init_tracing(&filter);

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let endpoint = match HttpUploadEndpoint::new(config.endpoint.clone(), config.request_timeout())
    {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("{}", error::ConfigError::from(e));
            std::process::exit(1);
        }
    };

    let uploader = move |cc: &CreationContext| -> Box<dyn eframe::App> {
        match IntakeUploader::new(cc, &config, endpoint) {
            Ok(app) => Box::new(app),
            Err(e) => {
                error!("Failed to start uploader: {}", e);
                std::process::exit(1);
            }
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([600.0, 720.0])
            .with_min_inner_size([420.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native("Document Upload", options, Box::new(uploader)) {
        error!("Window closed with error: {}", e);
        std::process::exit(1);
    }
}
