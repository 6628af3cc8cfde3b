//! Binary entrypoint for the waygate CLI.
//!
//! Commands:
//! - `init` - create a starter `config.toml` and `data/destinations.json`
//! - `list` - show the destination catalog with visited markers
//! - `travel <destination>` - run a full travel transaction against the
//!   built-in simulation world and persist the visit on arrival
//!
//! See the library crate docs for module-level details: `waygate::`.
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use waygate::config::Config;
use waygate::sim::SimWorld;
use waygate::travel::{
    load_destinations_from_json, sample_destinations, write_destinations_to_json, Anchor,
    DestinationCatalog, Point, TravelService, VisitedStoreBuilder,
};

#[derive(Parser)]
#[command(name = "waygate")]
#[command(about = "A safe-teleport placement and travel transaction engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a starter configuration and destination seed file
    Init,
    /// List destinations with prices and visited markers
    List,
    /// Travel to a destination in the simulation world
    Travel {
        /// Destination id (case-insensitive)
        destination: String,

        /// Coordinate hint "x,y,z"; overrides anchor resolution
        #[arg(long)]
        hint: Option<String>,

        /// Starting wallet balance for the simulation
        #[arg(long, default_value_t = 500)]
        balance: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        // Init runs before any config exists; default logging is fine.
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .init();
        return init_workspace(&cli.config).await;
    }

    let config = match Config::load(&cli.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} (run `waygate init` first?); using defaults", e);
            Config::default()
        }
    };
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::List => list_destinations(&config),
        Commands::Travel {
            destination,
            hint,
            balance,
        } => {
            let hint = hint.as_deref().map(parse_hint).transpose()?;
            run_travel(&config, &destination, hint, balance).await
        }
    }
}

fn init_logging(config: &Config, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    let level = match verbosity {
        0 => config
            .logging
            .level
            .parse()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);
    if let Some(path) = &config.logging.file {
        match std::fs::OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Could not open log file {}: {}; logging to stderr", path, e),
        }
    }
    builder.init();
}

async fn init_workspace(config_path: &str) -> Result<()> {
    if std::path::Path::new(config_path).exists() {
        info!("{} already exists; leaving it untouched", config_path);
    } else {
        Config::create_default(config_path).await?;
        info!("wrote {}", config_path);
    }

    let config = Config::load(config_path).await?;
    std::fs::create_dir_all("data")?;
    std::fs::create_dir_all(&config.catalog.visited_path)?;

    let seeds_path = &config.catalog.destinations_path;
    if std::path::Path::new(seeds_path).exists() {
        info!("{} already exists; leaving it untouched", seeds_path);
    } else {
        write_destinations_to_json(seeds_path, sample_destinations())?;
        info!("wrote {} with the sample world", seeds_path);
    }
    Ok(())
}

fn load_catalog(config: &Config) -> DestinationCatalog {
    let seeds = match load_destinations_from_json(&config.catalog.destinations_path) {
        Ok(seeds) => seeds,
        Err(e) => {
            warn!("{}; using the sample world", e);
            sample_destinations()
        }
    };
    DestinationCatalog::from_seeds(seeds, config.catalog.default_price)
}

fn list_destinations(config: &Config) -> Result<()> {
    let catalog = load_catalog(config);
    let store = VisitedStoreBuilder::new(&config.catalog.visited_path).open()?;
    let visited = store.load_visited_set()?;

    for destination in catalog.iter() {
        let marker = if visited.contains(&destination.id) {
            "*"
        } else {
            " "
        };
        let lock = if destination.unlocked { "" } else { " (locked)" };
        println!(
            "{} {:<16} {:<20} fare {}{}",
            marker,
            destination.id,
            destination.name,
            catalog.effective_price(destination),
            lock
        );
    }
    println!("\n* = visited   fares default to {}", catalog.default_price());
    Ok(())
}

async fn run_travel(
    config: &Config,
    destination_id: &str,
    hint: Option<Point>,
    balance: i64,
) -> Result<()> {
    let catalog = load_catalog(config);
    let store = VisitedStoreBuilder::new(&config.catalog.visited_path).open()?;
    let mut visited = store.load_visited_set()?;

    let sim = build_demo_world(&catalog, balance);
    let service = TravelService::new(sim.clone(), sim.clone(), sim.clone(), config.clone());

    let outcome = service
        .travel(&catalog, &mut visited, destination_id, hint)
        .await;

    if outcome.is_arrival() {
        store.record_visit(destination_id)?;
        if let Some(position) = sim.actor_pos() {
            println!("Arrived at {}", position);
        }
    }
    println!("{}", outcome);
    if let Some(balance) = service.ledger().balance() {
        println!("Balance: {}", balance);
    }
    Ok(())
}

/// Flat demo world: every destination's area exists, named anchors are
/// placed on a deterministic grid, and the ground sits at height zero.
fn build_demo_world(catalog: &DestinationCatalog, balance: i64) -> Arc<SimWorld> {
    let sim = Arc::new(SimWorld::new().with_flat_ground(0.0));
    sim.set_balance(balance);
    for (index, destination) in catalog.iter().enumerate() {
        if let Some(area_id) = &destination.area_id {
            sim.add_area(area_id);
            if let Anchor::NamedObject { name } = &destination.anchor {
                let spacing = 25.0 * (index as f32 + 1.0);
                sim.add_object(area_id, name, Point::new(spacing, 0.0, spacing));
            }
        }
    }
    sim
}

fn parse_hint(raw: &str) -> Result<Point> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(anyhow!("hint must be \"x,y,z\", got '{}'", raw));
    }
    let mut values = [0f32; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| anyhow!("invalid hint component '{}': {}", part, e))?;
    }
    Ok(Point::new(values[0], values[1], values[2]))
}
