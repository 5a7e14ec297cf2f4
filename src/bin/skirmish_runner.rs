//! Headless skirmish runner
//!
//! Parses a map file, runs the combat simulation (or the calibration
//! search with --calibrate) and prints the result as JSON or text.

use std::path::PathBuf;

use cavern_skirmish::battle::{find_minimum_power, CombatMap, CombatState};
use cavern_skirmish::core::config::SimConfig;
use cavern_skirmish::core::error::Result;
use cavern_skirmish::core::types::Faction;
use clap::Parser;
use serde::Serialize;

/// Headless runner for the cavern skirmish simulator
#[derive(Parser, Debug)]
#[command(name = "skirmish-runner")]
#[command(about = "Run a deterministic grid combat simulation on a map file")]
struct Args {
    /// Path to the map file (#, ., E, G)
    map: PathBuf,

    /// Search for the minimum elf attack power with zero elf losses
    #[arg(long)]
    calibrate: bool,

    /// First candidate attack power for --calibrate
    #[arg(long, default_value_t = 4)]
    power_floor: i32,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the board at every round boundary
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct RunResult {
    completed_rounds: u32,
    remaining_hit_points: i32,
    product: i64,
    /// Present only for --calibrate
    #[serde(skip_serializing_if = "Option::is_none")]
    attack_power: Option<i32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cavern_skirmish=info".into()),
        )
        .init();

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.map)?;
    let (map, spawns) = CombatMap::parse(&text)?;

    let result = if args.calibrate {
        let config = SimConfig {
            calibration_floor: args.power_floor,
            ..SimConfig::default()
        };
        let (power, outcome) = find_minimum_power(&map, &spawns, &config, Faction::Elf);
        RunResult {
            completed_rounds: outcome.completed_rounds,
            remaining_hit_points: outcome.remaining_hit_points,
            product: outcome.product(),
            attack_power: Some(power),
        }
    } else {
        let mut state = CombatState::new(map, &spawns, &SimConfig::default());
        let outcome = if args.verbose {
            state.run_with_observer(|s| {
                eprintln!("After round {}:", s.completed_rounds);
                eprint!("{}", s.map.render(&s.roster));
                eprintln!();
            })
        } else {
            state.run_to_end()
        };
        RunResult {
            completed_rounds: outcome.completed_rounds,
            remaining_hit_points: outcome.remaining_hit_points,
            product: outcome.product(),
            attack_power: None,
        }
    };

    match args.format.as_str() {
        "text" => {
            if let Some(power) = result.attack_power {
                println!("Minimum attack power: {}", power);
            }
            println!("Completed rounds: {}", result.completed_rounds);
            println!("Remaining hit points: {}", result.remaining_hit_points);
            println!("Outcome: {}", result.product);
        }
        _ => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
