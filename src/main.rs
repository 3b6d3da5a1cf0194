use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use gamewatch::config::ConfigStore;
use gamewatch::monitor::MonitorController;
use gamewatch::reminders::{ReminderNotifier, ReminderSink};
use gamewatch::sampler::HardwareSampler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("gamewatch starting up...");

    let config_dir = dirs::config_dir()
        .context("no config directory available on this platform")?
        .join("gamewatch");
    let store = ConfigStore::new(config_dir.join("config.json"))?;
    let config = store.get();
    info!("loaded settings from {}", store.path().display());

    let detector_config = config
        .detector_config()
        .context("settings contain an invalid detector configuration")?;

    let sink: Arc<dyn ReminderSink> = Arc::new(ReminderNotifier::new(
        config.reminders.clone(),
        config.sound_enabled,
    ));

    let mut controller = MonitorController::new(detector_config);
    controller.start(HardwareSampler::new(), sink)?;
    info!("monitoring started; press ctrl-c to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    info!("shutting down");
    controller.stop().await?;
    Ok(())
}
