//! campaignsim CLI
//!
//! Simulates a campaign scenario against the built-in sample directory and
//! prints a text report (or the raw result as JSON).

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use campaignsim::report;
use campaignsim::{
    sample_directory, CampaignGoal, CampaignSession, PostType, SimulationRuntime, SimulatorConfig,
};

/// Command line arguments
struct Args {
    /// Scenario JSON file
    scenario: PathBuf,
    /// Optional TOML config file
    config: Option<PathBuf>,
    /// Print the result as JSON instead of the text report
    json: bool,
}

/// A scenario file: a goal plus the placements to book.
#[derive(Debug, Deserialize)]
struct Scenario {
    goal: CampaignGoal,
    #[serde(default)]
    picks: Vec<Pick>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pick {
    creator: String,
    platform: String,
    #[serde(default)]
    post_type: PostType,
    #[serde(default = "default_post_count")]
    post_count: u32,
}

const fn default_post_count() -> u32 {
    1
}

fn print_help() {
    println!("campaignsim - creator campaign performance simulator");
    println!();
    println!("USAGE:");
    println!("    campaignsim <SCENARIO> [OPTIONS]");
    println!();
    println!("ARGS:");
    println!("    <SCENARIO>                Scenario JSON file with a goal and picks");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>       TOML config file");
    println!("        --json                Print the result as JSON");
    println!("    -h, --help                Print help information");
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut scenario = None;
    let mut config = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("error: --config requires a value");
                    std::process::exit(1);
                }
            }
            "--json" => {
                json = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
            arg => {
                if scenario.is_some() {
                    eprintln!("error: unexpected extra argument: {arg}");
                    std::process::exit(1);
                }
                scenario = Some(PathBuf::from(arg));
                i += 1;
            }
        }
    }

    let Some(scenario) = scenario else {
        eprintln!("error: missing scenario file (see --help)");
        std::process::exit(1);
    };

    Args {
        scenario,
        config,
        json,
    }
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulatorConfig::load(args.config.as_deref())?;
    init_tracing(&config.logging.level);

    let raw = std::fs::read_to_string(&args.scenario)
        .map_err(|e| format!("failed to read {}: {e}", args.scenario.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", args.scenario.display()))?;

    let mut session = CampaignSession::new(Arc::new(sample_directory()?));
    let goal = scenario.goal;
    session.set_goal(goal.clone())?;
    for pick in &scenario.picks {
        session.book(&pick.creator, &pick.platform, pick.post_type, pick.post_count)?;
    }

    let runtime = SimulationRuntime::new(config.runtime_config())?;
    let result = session.simulate_on(&runtime)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", report::render(result, &goal));
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = parse_args();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
