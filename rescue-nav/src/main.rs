//! rescue-nav - Planner and simulator front end
//!
//! - `rescue-nav plan --from 0,0 --to 1,1 [--obstacle 1,2]...` prints the
//!   reduced waypoint sequence
//! - `rescue-nav simulate --to 1,1,right [--obstacle 1,2]...` drives the
//!   simulated robot from the reference corner with the full navigation loop

use clap::{Parser, Subcommand};
use rescue_io::devices::sim::{RangeKind, SensorSide, SimArena, SimConfig};
use rescue_nav::planning::{GridPlanner, ObstacleSet};
use rescue_nav::{
    Cell, Drive, DriveDevices, Motion, NavConfig, NavError, Navigator, Position, Result, Side,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "rescue-nav", version, about = "Rescue robot grid navigation")]
struct Cli {
    /// Configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the waypoints the planner would use
    Plan {
        /// Start cell as x,y
        #[arg(long, value_parser = parse_cell, default_value = "0,0")]
        from: Cell,
        /// Goal cell as x,y
        #[arg(long, value_parser = parse_cell)]
        to: Cell,
        /// Extra obstacle cell (repeatable)
        #[arg(long = "obstacle", value_parser = parse_cell)]
        obstacles: Vec<Cell>,
    },
    /// Navigate the simulated robot from the reference corner
    Simulate {
        /// Target pose as x,y,side
        #[arg(long, value_parser = parse_position)]
        to: Position,
        /// Obstacle present in the arena but unknown to the planner (repeatable)
        #[arg(long = "obstacle", value_parser = parse_cell)]
        obstacles: Vec<Cell>,
    },
}

fn parse_cell(s: &str) -> std::result::Result<Cell, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [x, y] => {
            let x = x.parse().map_err(|e| format!("bad x {:?}: {}", x, e))?;
            let y = y.parse().map_err(|e| format!("bad y {:?}: {}", y, e))?;
            Ok(Cell::new(x, y))
        }
        _ => Err(format!("expected x,y but got {:?}", s)),
    }
}

fn parse_side(s: &str) -> std::result::Result<Side, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "front" | "f" => Ok(Side::Front),
        "right" | "r" => Ok(Side::Right),
        "back" | "b" => Ok(Side::Back),
        "left" | "l" => Ok(Side::Left),
        other => Err(format!("unknown side {:?}", other)),
    }
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (cell, side) = s
        .rsplit_once(',')
        .ok_or_else(|| format!("expected x,y,side but got {:?}", s))?;
    let cell = parse_cell(cell)?;
    Ok(Position {
        cell,
        heading: parse_side(side)?,
    })
}

fn plan(config: &NavConfig, from: Cell, to: Cell, extra: &[Cell]) -> Result<()> {
    for cell in [from, to].iter().chain(extra) {
        if !cell.in_bounds(config.arena.size) {
            return Err(NavError::InvalidCell(cell.x, cell.y));
        }
    }

    let planner = GridPlanner::from_config(&config.arena);
    let obstacles = ObstacleSet::from_cells(
        config
            .arena
            .static_obstacles
            .iter()
            .chain(extra)
            .copied(),
    );

    match planner.plan(from, to, &obstacles) {
        Some(path) => {
            let legs: Vec<String> = path.iter().map(|c| c.to_string()).collect();
            println!("{} -> {}", from, legs.join(" -> "));
        }
        None => println!("{} is unreachable from {}", to, from),
    }
    Ok(())
}

fn simulate(config: &NavConfig, target: Position, hidden: &[Cell]) -> Result<()> {
    let mut config = config.clone();
    config.motion.realtime = false;

    let arena = SimArena::new(SimConfig {
        square_mm: config.arena.square_mm,
        ..SimConfig::default()
    });
    for cell in config.arena.static_obstacles.iter().chain(hidden) {
        arena.add_obstacle(cell.x, cell.y);
    }
    arena.place_in_cell(0, 0, Side::Left.degrees());

    let devices = DriveDevices {
        heading: Box::new(arena.heading_sensor()),
        drivetrain: Box::new(arena.drivetrain()),
        left_color: Box::new(arena.color_sensor(SensorSide::Left)),
        right_color: Box::new(arena.color_sensor(SensorSide::Right)),
        underside: Box::new(arena.range_sensor(RangeKind::Underside)),
    };
    let mut drive = Drive::new(devices, Arc::new(arena.relay()), &config);
    drive.reset_heading(Side::Left.degrees())?;

    let mut navigator = Navigator::new(drive, &config);
    let arrival = navigator.go_to_position(target)?;

    let pose = arena.pose();
    println!("{:?} at {}", arrival, navigator.position());
    println!(
        "simulated pose: x={:.0}mm y={:.0}mm heading={:.1}° after {} steps",
        pose.x,
        pose.y,
        pose.theta,
        arena.steps()
    );
    let known: Vec<String> = navigator.obstacles().iter().map(|c| c.to_string()).collect();
    println!("obstacles: {}", known.join(" "));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rescue_nav=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            NavConfig::load(path)?
        }
        None => NavConfig::default(),
    };

    match cli.command {
        Command::Plan { from, to, obstacles } => plan(&config, from, to, &obstacles),
        Command::Simulate { to, obstacles } => simulate(&config, to, &obstacles),
    }
}
