// Standalone replay tool for analyzing decision logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all ticks
//   --ticks <t1,t2>        Replay specific ticks (comma-separated)
//   --validate             Run validation mode with expected actions
//   --agent <name>         Agent to re-decide with (default: the logged one)
//   --verbose              Show detailed output for each tick
//   --config <path>        Path to Agent.toml (default: Agent.toml)

use std::env;
use std::process;

use snake_agents::agents::AgentKind;
use snake_agents::config::Config;
use snake_agents::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Snake Agent Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all ticks in the log");
    eprintln!("  --ticks <T1,T2,...>     Replay specific ticks (comma-separated)");
    eprintln!("  --validate <T:A,...>    Validate expected actions (format: tick:action,...)");
    eprintln!("  --agent <name>          greedy, planning or rollout (default: as logged)");
    eprintln!("  --verbose               Show detailed output for each tick");
    eprintln!("  --config <path>         Path to Agent.toml (default: Agent.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all ticks");
    eprintln!("  replay snake_decisions.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific ticks with the greedy agent");
    eprintln!("  replay snake_decisions.jsonl --ticks 5,10,15 --agent greedy");
    eprintln!();
    eprintln!("  # Validate expected actions (alternatives separated by '|')");
    eprintln!("  replay snake_decisions.jsonl --validate 5:up,10:right|down");
}

fn parse_ticks(s: &str) -> Result<Vec<u32>, String> {
    s.split(',')
        .map(|t| {
            t.trim()
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", t, e))
        })
        .collect()
}

fn parse_expected_actions(s: &str) -> Result<Vec<(u32, Vec<String>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'tick:action'", pair));
            }

            let tick = parts[0]
                .parse::<u32>()
                .map_err(|e| format!("Invalid tick number '{}': {}", parts[0], e))?;

            // Support multiple acceptable actions separated by '|'
            let actions = parts[1]
                .split('|')
                .map(|a| a.trim().to_lowercase())
                .collect();

            Ok((tick, actions))
        })
        .collect()
}

enum Mode {
    All,
    Ticks(String),
    Validate(String),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Agent.toml".to_string();
    let mut verbose = false;
    let mut agent: Option<AgentKind> = None;
    let mut mode = None;

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        let needs_value = matches!(flag, "--ticks" | "--validate" | "--config" | "--agent");
        if needs_value && i + 1 >= args.len() {
            eprintln!("Error: {} requires an argument", flag);
            process::exit(1);
        }

        match flag {
            "--all" => mode = Some(Mode::All),
            "--ticks" => mode = Some(Mode::Ticks(args[i + 1].clone())),
            "--validate" => mode = Some(Mode::Validate(args[i + 1].clone())),
            "--config" => config_path = args[i + 1].clone(),
            "--agent" => match args[i + 1].parse::<AgentKind>() {
                Ok(kind) => agent = Some(kind),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            },
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", flag);
                print_usage();
                process::exit(1);
            }
        }
        i += if needs_value { 2 } else { 1 };
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --ticks, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    // Loading does not depend on the agent; the replaying engine is built below
    let loader = ReplayEngine::new(config.clone(), config.simulation.agent, verbose);
    let entries = match loader.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error loading log file: {}", e);
            process::exit(1);
        }
    };

    if entries.is_empty() {
        eprintln!("Error: Log file is empty");
        process::exit(1);
    }

    println!("Loaded {} log entries\n", entries.len());

    let kind = agent.unwrap_or(entries[0].agent);
    let engine = ReplayEngine::new(config, kind, verbose);

    match mode {
        Mode::All => {
            println!("Replaying all {} ticks with the {} agent...\n", entries.len(), kind);
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
        }
        Mode::Ticks(arg) => {
            let ticks = match parse_ticks(&arg) {
                Ok(t) => t,
                Err(e) => {
                    eprintln!("Error parsing ticks: {}", e);
                    process::exit(1);
                }
            };

            println!("Replaying {} specific tick(s)...\n", ticks.len());
            match engine.replay_ticks(&entries, &ticks) {
                Ok(results) => engine.print_report(&results),
                Err(e) => {
                    eprintln!("Error during replay: {}", e);
                    process::exit(1);
                }
            }
        }
        Mode::Validate(arg) => {
            let expected = match parse_expected_actions(&arg) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Error parsing expected actions: {}", e);
                    process::exit(1);
                }
            };

            println!("Validating {} expected action(s)...\n", expected.len());
            match engine.validate_expected_actions(&entries, &expected) {
                Ok(()) => println!("✓ All expected actions validated successfully!"),
                Err(e) => {
                    eprintln!("✗ Validation failed: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}
