// Replay module for analyzing decision logs and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run an agent on each logged snapshot
// 3. Compare logged vs replayed actions
// 4. Generate a summary report

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::agents::{Agent, AgentKind};
use crate::chooser::RandomChooser;
use crate::config::Config;
use crate::debug_logger::LogEntry;
use crate::types::ActionMap;

/// Result of replaying a single tick
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub game: usize,
    pub tick: u32,
    pub original_action: Option<String>,
    pub replayed_action: Option<String>,
    pub matches: bool,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_ticks: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    config: Config,
    kind: AgentKind,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine that re-decides with `kind`
    pub fn new(config: Config, kind: AgentKind, verbose: bool) -> Self {
        ReplayEngine {
            config,
            kind,
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Builds a fresh agent for one replayed tick
    ///
    /// Rollouts reuse the chooser seed logged with the decision. Older logs
    /// without one fall back to the configured seed plus the tick, which is
    /// repeatable but will not match the live game.
    fn build_agent(&self, entry: &LogEntry) -> Box<dyn Agent> {
        let seed = entry.chooser_seed.unwrap_or_else(|| {
            self.config
                .simulation
                .seed
                .unwrap_or(0)
                .wrapping_add(entry.tick as u64)
        });
        self.kind.build(
            ActionMap::cardinal(entry.state.bounds.step),
            &self.config,
            Box::new(RandomChooser::seeded(seed)),
        )
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> ReplayResult {
        if self.verbose {
            info!("Replaying game {} tick {}...", entry.game, entry.tick);
        }

        let mut agent = self.build_agent(entry);
        let start_time = Instant::now();
        let replayed_action = agent.best_action(&entry.state);
        let computation_time = start_time.elapsed().as_millis();

        let matches = replayed_action == entry.chosen_action;

        if self.verbose {
            if matches {
                info!(
                    "Tick {}: ✓ MATCH - {} (time: {}ms)",
                    entry.tick,
                    action_label(&replayed_action),
                    computation_time
                );
            } else {
                warn!(
                    "Tick {}: ✗ MISMATCH - Original: {}, Replayed: {} (time: {}ms)",
                    entry.tick,
                    action_label(&entry.chosen_action),
                    action_label(&replayed_action),
                    computation_time
                );
            }
        }

        ReplayResult {
            game: entry.game,
            tick: entry.tick,
            original_action: entry.chosen_action.clone(),
            replayed_action,
            matches,
            computation_time_ms: computation_time,
        }
    }

    /// Replays all entries
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        entries.iter().map(|entry| self.replay_entry(entry)).collect()
    }

    /// Replays specific ticks; every game's entry for that tick is included
    pub fn replay_ticks(
        &self,
        entries: &[LogEntry],
        ticks: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for tick in ticks {
            let matching: Vec<&LogEntry> = entries.iter().filter(|e| e.tick == *tick).collect();
            if matching.is_empty() {
                return Err(format!("Tick {} not found in log file", tick));
            }
            results.extend(matching.into_iter().map(|entry| self.replay_entry(entry)));
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_ticks = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_ticks - matches;
        let match_rate = if total_ticks > 0 {
            (matches as f64 / total_ticks as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_ticks,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT ({})", self.kind);
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Ticks:    {}", stats.total_ticks);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Game {} tick {}: {} → {} (time: {}ms)",
                    result.game,
                    result.tick,
                    action_label(&result.original_action),
                    action_label(&result.replayed_action),
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected actions were logged
    pub fn validate_expected_actions(
        &self,
        entries: &[LogEntry],
        expected: &[(u32, Vec<String>)], // (tick, acceptable_actions)
    ) -> Result<(), String> {
        for (tick, acceptable) in expected {
            let entry = entries
                .iter()
                .find(|e| e.tick == *tick)
                .ok_or_else(|| format!("Tick {} not found in log", tick))?;

            let actual = entry.chosen_action.as_deref().unwrap_or("none");
            if !acceptable.iter().any(|a| a.eq_ignore_ascii_case(actual)) {
                return Err(format!(
                    "Tick {}: Expected one of {:?}, but got {}",
                    tick, acceptable, actual
                ));
            }
        }

        Ok(())
    }
}

fn action_label(action: &Option<String>) -> &str {
    action.as_deref().unwrap_or("none")
}
