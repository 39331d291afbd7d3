// Library exports for the snake agents
// The simulator and replay binaries, and the integration tests, build on these

pub mod agents;
pub mod chooser;
pub mod config;
pub mod debug_logger;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod priority_queue;
pub mod replay;
pub mod types;
