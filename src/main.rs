//! G19 special-key daemon CLI

use anyhow::{anyhow, Result};
use clap::Parser;
use hidapi::HidApi;
use tracing::info;

use g19_driver::config::DriverConfig;
use g19_driver::daemon;
use g19_keyboard::{decoder, Channel, G19};

mod cli;
use cli::{Cli, Commands};

fn list_devices() -> Result<()> {
    let api = HidApi::new()?;
    let interfaces = g19_transport::list_interfaces(&api);
    if interfaces.is_empty() {
        println!("No G19 found");
        return Ok(());
    }
    for i in interfaces {
        println!(
            "{:04x}:{:04x} if{} {:<10} {} {}",
            i.vid,
            i.pid,
            i.interface_number,
            i.channel.map(|c| c.name()).unwrap_or("-"),
            i.product_name.as_deref().unwrap_or("Unknown"),
            i.path
        );
    }
    Ok(())
}

fn decode_packet(channel: &str, bytes: &[String]) -> Result<()> {
    let channel: Channel = channel.parse().map_err(|e: String| anyhow!(e))?;
    let packet = decoder::parse_hex_packet(&bytes.join(" ")).map_err(|e| anyhow!(e))?;
    let decoded = decoder::decode(&G19, channel, &packet)?;
    let names: Vec<&str> = decoded.keys.iter().map(|k| k.name()).collect();
    println!(
        "{} {:02X?} -> {:?} [{}]",
        channel,
        packet,
        decoded.domain,
        names.join(", ")
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    let mut config = DriverConfig::load(&config_path)?;
    if cli.no_mm_keys {
        config.enable_mm_keys = false;
    }

    match cli.command {
        None | Some(Commands::Run) => {
            info!("Loaded config from {:?}", config_path);
            daemon::run(config).await
        }
        Some(Commands::List) => list_devices(),
        Some(Commands::Decode { channel, bytes }) => decode_packet(&channel, &bytes),
        Some(Commands::Config { save }) => {
            print!("{}", toml::to_string_pretty(&config)?);
            if save {
                config.save(&config_path)?;
                info!("Saved config to {:?}", config_path);
            }
            Ok(())
        }
    }
}
