// Batch simulator for the snake agents
//
// Usage:
//   cargo run --release -- [options]
//
// Options:
//   --agent <greedy|planning|rollout>  Strategy to play (default: from Agent.toml)
//   --games <n>                        Number of games (default: from Agent.toml)
//   --seed <n>                         Base seed; game i uses seed + i
//   --max-ticks <n>                    Tick limit per game
//   --log <path>                       Write a JSONL decision log
//   --config <path>                    Path to Agent.toml (default: Agent.toml)

use log::info;
use rayon::prelude::*;
use std::env;
use std::process;

use snake_agents::agents::AgentKind;
use snake_agents::config::Config;
use snake_agents::debug_logger::DecisionLogger;
use snake_agents::game::{play_game, GameSummary};

fn print_usage() {
    eprintln!("Snake Agent Simulator");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  snake-agents [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --agent <name>          greedy, planning or rollout");
    eprintln!("  --games <n>             Number of games to play");
    eprintln!("  --seed <n>              Base seed (game i uses seed + i)");
    eprintln!("  --max-ticks <n>         Tick limit per game");
    eprintln!("  --log <path>            Write a JSONL decision log");
    eprintln!("  --config <path>         Path to Agent.toml (default: Agent.toml)");
    eprintln!("  --help                  Show this help message");
}

fn option_value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T
where
    T::Err: std::fmt::Display,
{
    value.parse::<T>().unwrap_or_else(|e| {
        eprintln!("Error: invalid value '{}' for {}: {}", value, flag, e);
        process::exit(1);
    })
}

fn print_summary(kind: AgentKind, summaries: &[GameSummary]) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("                 SIMULATION REPORT ({})", kind);
    println!("═══════════════════════════════════════════════════════════");
    println!("{:>6} {:>12} {:>8} {:>8} {:>8} {:>6}", "game", "seed", "score", "ticks", "length", "died");
    for s in summaries {
        println!(
            "{:>6} {:>12} {:>8} {:>8} {:>8} {:>6}",
            s.game, s.seed, s.score, s.ticks, s.length, s.died
        );
    }
    println!("═══════════════════════════════════════════════════════════");

    if summaries.is_empty() {
        return;
    }

    let n = summaries.len() as f64;
    let avg_score = summaries.iter().map(|s| s.score as f64).sum::<f64>() / n;
    let avg_ticks = summaries.iter().map(|s| s.ticks as f64).sum::<f64>() / n;
    let deaths = summaries.iter().filter(|s| s.died).count();
    let best = summaries.iter().map(|s| s.score).max().unwrap_or(0);

    println!("Average Score:   {:.2}", avg_score);
    println!("Best Score:      {}", best);
    println!("Average Ticks:   {:.1}", avg_ticks);
    println!("Deaths:          {} / {}", deaths, summaries.len());
    println!("═══════════════════════════════════════════════════════════\n");
}

fn main() {
    // Default to 'info' logging unless RUST_LOG says otherwise
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut config_path = "Agent.toml".to_string();
    let mut agent = None;
    let mut games = None;
    let mut seed = None;
    let mut max_ticks = None;
    let mut log_path = None;

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--agent" => {
                let value = option_value(&args, i, flag);
                agent = Some(value.parse::<AgentKind>().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }));
                i += 1;
            }
            "--games" => {
                games = Some(parse_number::<usize>(option_value(&args, i, flag), flag));
                i += 1;
            }
            "--seed" => {
                seed = Some(parse_number::<u64>(option_value(&args, i, flag), flag));
                i += 1;
            }
            "--max-ticks" => {
                max_ticks = Some(parse_number::<u32>(option_value(&args, i, flag), flag));
                i += 1;
            }
            "--log" => {
                log_path = Some(option_value(&args, i, flag).to_string());
                i += 1;
            }
            "--config" => {
                config_path = option_value(&args, i, flag).to_string();
                i += 1;
            }
            _ => {
                eprintln!("Error: Unknown option '{}'", flag);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    if let Some(ticks) = max_ticks {
        config.simulation.max_ticks = ticks;
    }
    let kind = agent.unwrap_or(config.simulation.agent);
    let games = games.unwrap_or(config.simulation.games);
    let base_seed = seed
        .or(config.simulation.seed)
        .unwrap_or_else(rand::random::<u64>);

    let logger = match log_path {
        Some(path) => DecisionLogger::new(true, path),
        None => DecisionLogger::new(config.debug.enabled, &config.debug.log_file_path),
    };

    info!(
        "Playing {} game(s) with the {} agent (base seed {})",
        games, kind, base_seed
    );

    let summaries: Vec<GameSummary> = (0..games)
        .into_par_iter()
        .map(|game| {
            play_game(
                kind,
                &config,
                base_seed.wrapping_add(game as u64),
                game,
                &logger,
            )
        })
        .collect();

    print_summary(kind, &summaries);
}
