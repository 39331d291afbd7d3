// Configuration module for reading Agent.toml
// This module provides OOP-style configuration management for the snake agents

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::agents::AgentKind;
use crate::types::Bounds;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub grid: GridConfig,
    pub planning: PlanningConfig,
    pub rollout: RolloutConfig,
    pub simulation: SimulationConfig,
    pub debug: DebugConfig,
}

/// Playable area and starting snake
#[derive(Debug, Deserialize, Clone)]
pub struct GridConfig {
    pub width: i32,
    pub height: i32,
    pub step: i32,
    pub initial_length: usize,
}

impl GridConfig {
    /// Bounds of the playable area in grid units
    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.width,
            height: self.height,
            step: self.step,
        }
    }
}

/// Best-first planner constants
#[derive(Debug, Deserialize, Clone)]
pub struct PlanningConfig {
    pub max_expansions: usize,
    pub depth: usize,
    pub verbose_expansion_threshold: usize,
}

/// Monte-Carlo rollout constants
#[derive(Debug, Deserialize, Clone)]
pub struct RolloutConfig {
    pub trials: usize,
    pub max_steps: usize,
    pub death_score: i64,
    pub food_score: i64,
    pub distance_base: i64,
}

/// Batch simulation constants
#[derive(Debug, Deserialize, Clone)]
pub struct SimulationConfig {
    pub agent: AgentKind,
    pub games: usize,
    pub max_ticks: u32,
    pub seed: Option<u64>,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Agent.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Agent.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Agent.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Agent.toml
    pub fn default_hardcoded() -> Self {
        Config {
            grid: GridConfig {
                width: 300,
                height: 300,
                step: 10,
                initial_length: 3,
            },
            planning: PlanningConfig {
                max_expansions: 1000,
                depth: 5,
                verbose_expansion_threshold: 200,
            },
            rollout: RolloutConfig {
                trials: 200,
                max_steps: 20,
                death_score: -100,
                food_score: 10000,
                distance_base: 1000,
            },
            simulation: SimulationConfig {
                agent: AgentKind::Planning,
                games: 16,
                max_ticks: 2000,
                seed: None,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "snake_decisions.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!(
                "Could not load Agent.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_grid() {
        let config = Config::default_hardcoded();
        let bounds = config.grid.bounds();
        assert_eq!(bounds.width, 300);
        assert_eq!(bounds.height, 300);
        assert_eq!(bounds.step, 10);
    }

    #[test]
    fn test_agent_toml_can_be_parsed() {
        let result = Config::from_file("Agent.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Agent.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Agent.toml").expect("Agent.toml should be parseable");
        let hardcoded = Config::default_hardcoded();

        assert_eq!(file_config.grid.width, hardcoded.grid.width);
        assert_eq!(file_config.grid.height, hardcoded.grid.height);
        assert_eq!(file_config.grid.step, hardcoded.grid.step);
        assert_eq!(file_config.grid.initial_length, hardcoded.grid.initial_length);

        assert_eq!(
            file_config.planning.max_expansions,
            hardcoded.planning.max_expansions
        );
        assert_eq!(file_config.planning.depth, hardcoded.planning.depth);

        assert_eq!(file_config.rollout.trials, hardcoded.rollout.trials);
        assert_eq!(file_config.rollout.max_steps, hardcoded.rollout.max_steps);
        assert_eq!(file_config.rollout.death_score, hardcoded.rollout.death_score);
        assert_eq!(file_config.rollout.food_score, hardcoded.rollout.food_score);
        assert_eq!(
            file_config.rollout.distance_base,
            hardcoded.rollout.distance_base
        );

        assert_eq!(file_config.simulation.agent, hardcoded.simulation.agent);
        assert_eq!(file_config.simulation.seed, hardcoded.simulation.seed);
        assert_eq!(file_config.debug.enabled, hardcoded.debug.enabled);
    }

    #[test]
    fn test_agent_kind_parses_lowercase() {
        let toml_src = r#"
            [grid]
            width = 100
            height = 80
            step = 10
            initial_length = 2

            [planning]
            max_expansions = 50
            depth = 3
            verbose_expansion_threshold = 10

            [rollout]
            trials = 5
            max_steps = 4
            death_score = -1
            food_score = 10
            distance_base = 100

            [simulation]
            agent = "rollout"
            games = 1
            max_ticks = 10
            seed = 7

            [debug]
            enabled = true
            log_file_path = "out.jsonl"
        "#;
        let config: Config = toml::from_str(toml_src).expect("inline config should parse");
        assert_eq!(config.simulation.agent, AgentKind::Rollout);
        assert_eq!(config.simulation.seed, Some(7));
        assert_eq!(config.grid.bounds().height, 80);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
