use std::fs::{create_dir_all, File};
use std::sync::{Arc, Mutex};

use irrigate_dashboard::{
    api::HttpControllerApi,
    app::App,
    config::{DashboardConfig, CONFIG_PATH_ENV},
    event::EventHandler,
    log_info,
    util::log::{DEBUG_ENABLED, LOG_DIR},
};
use ratatui::crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    let config = DashboardConfig::load()?;

    let log_dir = config.log_dir.0.clone();
    create_dir_all(&log_dir)?;
    let _ = LOG_DIR.set(log_dir.clone());
    let _ = DEBUG_ENABLED.set(std::env::var("DEBUG").unwrap_or_default() == "true");

    // The terminal belongs to the dashboard; tracing goes to a file.
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(Mutex::new(File::create(log_dir.join("trace.log"))?))
        .init();
    color_eyre::install()?;

    log_info!(
        "Starting dashboard against {} (config from ${} or dashboard.yml)",
        config.api.base_url,
        CONFIG_PATH_ENV
    );

    let api = HttpControllerApi::new(&config.api.base_url, config.api.request_timeout())?;

    let terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;
    let result = App::new(config, Arc::new(api), EventHandler::new())
        .run(terminal)
        .await;
    execute!(std::io::stdout(), DisableMouseCapture)?;
    ratatui::restore();
    result
}
