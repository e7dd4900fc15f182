//! # Undercroft Demo Entry Point
//!
//! Generates a floor, lets the player auto-explore it while hostiles give
//! chase, and prints the fogged map at the end.

use clap::Parser;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::path::PathBuf;
use undercroft::{
    AutoexploreState, FloorContext, GenerationConfig, Position, StepOutcome, StopReason,
    TextDisplay, UndercroftResult,
};

/// Hostiles never spawn closer than this to the player.
const HOSTILE_SPAWN_DISTANCE: u32 = 8;

/// Command line arguments for the Undercroft demo.
#[derive(Parser, Debug)]
#[command(name = "undercroft")]
#[command(about = "Explores a generated floor under fog of war")]
#[command(version)]
struct Args {
    /// Random seed for floor generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON generation config; overrides the seed's defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Player sight radius (defaults to the config's)
    #[arg(short, long)]
    radius: Option<u32>,

    /// Maximum number of turns to simulate
    #[arg(short, long, default_value_t = 400)]
    turns: u32,

    /// Number of hostiles to spawn
    #[arg(long, default_value_t = 3)]
    hostiles: usize,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also print the autotile index of every remembered cell
    #[arg(long)]
    show_tiles: bool,
}

fn main() -> UndercroftResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Undercroft v{}", undercroft::VERSION);

    let mut config = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::new(args.seed.unwrap_or_else(rand::random)),
    };
    if let (Some(seed), Some(_)) = (args.seed, &args.config) {
        config.seed = seed;
    }
    info!("Generating floor with seed {}", config.seed);

    run_simulation(&args, &config)
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> UndercroftResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .try_init()
            .map_err(|e| undercroft::UndercroftError::InvalidState(e.to_string()))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .try_init()
            .map_err(|e| undercroft::UndercroftError::InvalidState(e.to_string()))?;
    }

    Ok(())
}

/// Runs the turn loop until the floor is explored or the turn limit is hit.
fn run_simulation(args: &Args, config: &GenerationConfig) -> UndercroftResult<()> {
    let mut floor = FloorContext::generate(config)?;
    let radius = args.radius.unwrap_or(config.sight_radius);
    let mut player = floor.player_start();
    let mut hostiles = spawn_hostiles(&floor, player, args.hostiles, config.seed);

    let mut display = TextDisplay::new();
    let mut autoexplore = AutoexploreState::new();
    autoexplore.toggle();

    let mut spotted = false;
    let mut turns_taken = 0;
    for turn in 0..args.turns {
        turns_taken = turn + 1;
        floor.reveal_visibility(player, radius, &[]);

        let occupied: HashSet<Position> = hostiles.iter().copied().collect();
        let step = match autoexplore.next_step(&floor, player, &hostiles)? {
            Some(direction) => Some(direction),
            None => match autoexplore.last_stop {
                Some(StopReason::HostileInSight) => {
                    if !spotted {
                        display.add_message(StopReason::HostileInSight.to_string());
                        spotted = true;
                    }
                    // Nothing to fight with, so keep moving
                    autoexplore.toggle();
                    floor.explore_step(player, &occupied)
                }
                Some(reason) => {
                    display.add_message(reason.to_string());
                    break;
                }
                None => break,
            },
        };

        if let Some(direction) = step {
            match floor.attempt_step(player, direction, &occupied) {
                StepOutcome::Moved(to) => {
                    player = to;
                    if floor.claim_secret_reward(player) {
                        display.add_message("You find a cache hidden in the dark.");
                    }
                }
                StepOutcome::OpenedSecret(at) => {
                    display.add_message(format!("The wall at {} gives way!", at));
                }
                StepOutcome::Blocked => debug!("player blocked moving {:?}", direction),
            }
        }

        move_hostiles(&mut floor, player, &mut hostiles);
        if hostiles.iter().any(|h| h.chebyshev_distance(player) <= 1) {
            debug!("turn {}: player is cornered", turn);
        }
    }

    floor.reveal_visibility(player, radius, &[]);
    info!(
        "Finished after {} turns, explored {:.0}% of the floor",
        turns_taken,
        floor.visibility().explored_ground_fraction(floor.grid()) * 100.0
    );
    if floor.secret().exists() && !floor.secret().is_discovered() {
        info!("The secret room was never found");
    }

    let mut entities: Vec<(Position, char)> = hostiles.iter().map(|&h| (h, 'g')).collect();
    entities.push((floor.stairs(), '>'));
    entities.insert(0, (player, '@'));
    println!("{}", display.render(&floor, &entities));

    if args.show_tiles {
        println!();
        for row in display.render_tile_indices(&floor) {
            println!("{}", row);
        }
    }

    Ok(())
}

/// Picks distinct ground tiles well away from the player.
fn spawn_hostiles(floor: &FloorContext, player: Position, count: usize, seed: u64) -> Vec<Position> {
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let candidates = floor.spawn_sites(player, HOSTILE_SPAWN_DISTANCE);
    if candidates.len() < count {
        warn!(
            "only {} spawn sites for {} hostiles",
            candidates.len(),
            count
        );
    }
    candidates
        .choose_multiple(&mut rng, count)
        .copied()
        .collect()
}

/// Moves each hostile one step toward the player, in spawn order.
fn move_hostiles(floor: &mut FloorContext, player: Position, hostiles: &mut [Position]) {
    for i in 0..hostiles.len() {
        let origin = hostiles[i];
        let mut occupied: HashSet<Position> = hostiles
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &pos)| pos)
            .collect();
        let Some(direction) = floor.chase_step(origin, player, &occupied) else {
            continue;
        };
        occupied.insert(player);
        if let StepOutcome::Moved(to) = floor.attempt_step(origin, direction, &occupied) {
            hostiles[i] = to;
        }
    }
}
