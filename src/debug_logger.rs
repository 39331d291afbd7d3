// Decision logging module
//
// Writes one JSON line per tick: the snapshot an agent saw and the action it
// pushed back. The replay engine reads these files. Write failures are logged
// and swallowed so a bad disk never stops a game.

use log::error;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::agents::AgentKind;
use crate::types::StateSnapshot;

/// Represents a single decision log entry
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub game: usize,
    pub tick: u32,
    pub agent: AgentKind,
    pub chosen_action: Option<String>,
    /// Seed the rollout chooser had for this decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chooser_seed: Option<u64>,
    pub state: StateSnapshot,
    pub timestamp: String,
}

/// Shared decision logger
/// Uses Arc<Mutex<File>> so games running on several threads can share one file
#[derive(Clone)]
pub struct DecisionLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DecisionLogger {
    /// Creates a new decision logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new<P: AsRef<Path>>(enabled: bool, log_file_path: P) -> Self {
        if !enabled {
            return DecisionLogger::disabled();
        }

        let path = log_file_path.as_ref();
        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
        {
            Ok(file) => {
                log::info!("Decision logging enabled: {}", path.display());
                DecisionLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!(
                    "Failed to create decision log file '{}': {}",
                    path.display(),
                    e
                );
                DecisionLogger::disabled()
            }
        }
    }

    /// Creates a disabled logger (no-op)
    pub fn disabled() -> Self {
        DecisionLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends one decision
    pub fn log_decision(
        &self,
        game: usize,
        tick: u32,
        agent: AgentKind,
        chosen_action: Option<&str>,
        chooser_seed: Option<u64>,
        state: &StateSnapshot,
    ) {
        if !self.enabled {
            return;
        }

        let entry = LogEntry {
            game,
            tick,
            agent,
            chosen_action: chosen_action.map(str::to_string),
            chooser_seed,
            state: state.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let json_line = match serde_json::to_string(&entry) {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to serialize decision log entry: {}", e);
                return;
            }
        };

        let mut file_guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(file) = file_guard.as_mut() {
            if let Err(e) = writeln!(file, "{}", json_line) {
                error!("Failed to write decision log entry: {}", e);
            } else if let Err(e) = file.flush() {
                error!("Failed to flush decision log: {}", e);
            }
        }
    }
}
