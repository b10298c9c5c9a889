use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Duration;
use tentbox::config::Config;
use tentbox::driver::SimulatedDriver;
use tentbox::error::Result;
use tentbox::relays::{Relay, RelayBank};
use tentbox::sensors::{SensorHandle, SensorManager};
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "tentbox", about = "Grow-tent sensor and relay controller")]
struct Args {
    /// Print an example configuration file and exit
    #[arg(long)]
    show_config_example: bool,

    /// Path to the JSON configuration file
    #[arg(long, env = "TENTBOX_CONFIG", default_value = "tentbox.json")]
    config: String,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    if args.show_config_example {
        println!("{}", Config::example_json()?);
        return Ok(());
    }

    let config = Config::load(&args.config)?;
    info!("Starting tentbox");
    info!("  Config: {}", args.config);
    info!("  Sensors: {}", config.dht22.len());
    info!("  Relays: {}", config.relay.len());
    info!("  Poll interval: {}s", config.poll_interval_secs);

    let manager = SensorManager::new(Arc::new(SimulatedDriver));
    for sensor in &config.dht22 {
        manager.register(SensorHandle::new(sensor.pin, &sensor.name, &sensor.location))?;
    }

    let relays = RelayBank::new();
    for relay in &config.relay {
        relays.add(Relay::new(&relay.name, &relay.location, relay.default))?;
    }

    manager.start(Duration::from_secs(config.poll_interval_secs))?;
    info!("Tentbox is running, press Ctrl+C to exit");

    match signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
    }

    manager.stop().await?;
    info!(
        "Final readings: {}",
        serde_json::to_string(&manager.snapshot())?
    );
    info!("Tentbox stopped");
    Ok(())
}
