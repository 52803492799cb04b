use std::sync::Arc;

use anyhow::Result;

use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::view::ViewConfig;
use tessera_engine::window::Runtime;

use tessera_studio::app::{input_window, StudioApp};
use tessera_studio::config::StudioConfig;
use tessera_studio::triangulate::{EarclipModule, NativeTriangulator, ServiceTriangulator};

fn main() -> Result<()> {
    let config = StudioConfig::from_env()?;

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..LoggingConfig::default()
    });

    let service = ServiceTriangulator::new(&config.service_url, config.service_timeout)?;
    log::info!(
        "triangulation service at {} (timeout {:?})",
        service.endpoint(),
        config.service_timeout
    );
    log::info!("native triangulation: rgeometry ear clipping");

    let app = StudioApp::new(
        ViewConfig {
            zoom_limits: config.zoom_limits,
            ..ViewConfig::default()
        },
        Arc::new(service),
        Box::new(NativeTriangulator::new(EarclipModule)),
        config.startup_file,
    );

    Runtime::run(
        input_window(),
        GpuInit {
            prefer_srgb: false,
            ..GpuInit::default()
        },
        app,
    )
}
