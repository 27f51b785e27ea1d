//! relay-monitor - Inspect the sensor relay link
//!
//! Listens for relay frames and logs the latest value of every channel once
//! per period. With `--simulate` it plays the relay robot instead, publishing
//! readings from an arena simulator (one obstacle two squares ahead) to the
//! configured peer.
//!
//! Usage:
//! - `relay-monitor [[-c] config.toml]`
//! - `relay-monitor --simulate [[-c] config.toml]`

use clap::Parser;
use rescue_io::devices::sim::{RangeKind, SimArena};
use rescue_io::relay::{RelayChannel, RelayPublisher, RelayReceiver, RelaySources};
use rescue_io::{Error, RelayConfig, RelaySlots, Result, SensorRelay, ZoneColor};
use std::net::UdpSocket;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "relay-monitor", version, about = "Inspect the sensor relay link")]
struct Args {
    /// Play the relay robot and publish simulated readings to the peer
    #[arg(short, long)]
    simulate: bool,

    /// Relay configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Relay configuration file (positional form of --config)
    #[arg(value_name = "CONFIG", conflicts_with = "config")]
    config_path: Option<PathBuf>,
}

impl Args {
    fn config_file(&self) -> Option<&PathBuf> {
        self.config.as_ref().or(self.config_path.as_ref())
    }
}

fn format_channel(relay: &RelaySlots, channel: RelayChannel) -> String {
    match (channel, relay.read(channel)) {
        (_, None) => "-".to_string(),
        (RelayChannel::ZoneColor, Some(code)) => format!("{:?}", ZoneColor::from_code(code as u8)),
        (_, Some(mm)) => format!("{:.0}mm", mm),
    }
}

fn monitor(config: &RelayConfig, running: Arc<AtomicBool>) -> Result<()> {
    let socket = UdpSocket::bind(&config.bind_address)?;
    let slots = Arc::new(RelaySlots::default());

    let receiver = RelayReceiver::new(socket, Arc::clone(&slots), Arc::clone(&running));
    let handle = receiver.spawn()?;

    while running.load(Ordering::Relaxed) {
        std::thread::sleep(config.period());
        log::info!(
            "obstacle={} overhead={} zone={}",
            format_channel(&slots, RelayChannel::ObstacleDistance),
            format_channel(&slots, RelayChannel::OverheadDistance),
            format_channel(&slots, RelayChannel::ZoneColor),
        );
    }

    handle
        .join()
        .map_err(|_| Error::Other("relay receiver thread panicked".to_string()))
}

fn simulate(config: &RelayConfig, running: Arc<AtomicBool>) -> Result<()> {
    let arena = SimArena::with_defaults();
    arena.place_in_cell(2, 4, 0.0);
    arena.add_obstacle(2, 2);
    arena.set_overhead(Some(180.0));

    let sources = RelaySources {
        obstacle: Box::new(arena.range_sensor(RangeKind::Obstacle)),
        overhead: Box::new(arena.range_sensor(RangeKind::Overhead)),
        zone: Box::new(arena.zone_sensor()),
    };

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    let mut publisher = RelayPublisher::new(socket, config.peer()?, sources, config.period(), running);
    publisher.run()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = match args.config_file() {
        Some(path) => {
            log::info!("Using config: {}", path.display());
            RelayConfig::from_file(path)?
        }
        None => RelayConfig::default(),
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    if args.simulate {
        simulate(&config, running)
    } else {
        monitor(&config, running)
    }
}
