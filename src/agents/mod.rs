// Decision strategies and the per-tick controller that drives them
//
// Every strategy implements `Agent::best_action`, a pure function of the
// snapshot (plus injected randomness for rollouts). `Controller` adds the
// sense/act contract on top: pull a snapshot, decide, push one action.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::chooser::Chooser;
use crate::config::Config;
use crate::types::{ActionMap, StateSnapshot};

mod greedy;
mod planning;
mod rollout;

pub use greedy::GreedyAgent;
pub use planning::{Plan, PlanStats, PlanningAgent};
pub use rollout::{run_trial, RolloutAgent, TrialOutcome};

/// Returns the current snapshot by value
pub type StateSource = Box<dyn FnMut() -> StateSnapshot>;

/// Receives the chosen action name, or `None` when nothing could be chosen
pub type ActionSink = Box<dyn FnMut(Option<&str>)>;

/// A decision strategy
pub trait Agent {
    /// Short lowercase name used in logs
    fn name(&self) -> &'static str;

    /// Chooses an action for `state`, or `None` if there is nothing to choose
    fn best_action(&mut self, state: &StateSnapshot) -> Option<String>;
}

/// Which strategy to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Greedy,
    Planning,
    Rollout,
}

impl AgentKind {
    /// Returns all strategies
    pub fn all() -> [AgentKind; 3] {
        [AgentKind::Greedy, AgentKind::Planning, AgentKind::Rollout]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Greedy => "greedy",
            AgentKind::Planning => "planning",
            AgentKind::Rollout => "rollout",
        }
    }

    /// Builds the strategy; `chooser` is only consumed by rollouts
    pub fn build(
        &self,
        actions: ActionMap,
        config: &Config,
        chooser: Box<dyn Chooser>,
    ) -> Box<dyn Agent> {
        match self {
            AgentKind::Greedy => Box::new(GreedyAgent::new(actions)),
            AgentKind::Planning => {
                Box::new(PlanningAgent::new(actions, config.planning.clone()))
            }
            AgentKind::Rollout => Box::new(RolloutAgent::new(
                actions,
                config.rollout.clone(),
                chooser,
            )),
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(AgentKind::Greedy),
            "planning" => Ok(AgentKind::Planning),
            "rollout" => Ok(AgentKind::Rollout),
            _ => Err(format!("Invalid agent: {}", s)),
        }
    }
}

/// Binds a strategy to the caller's state source and action sink
pub struct Controller {
    agent: Box<dyn Agent>,
    get_state: StateSource,
    set_action: ActionSink,
}

impl Controller {
    pub fn new(agent: Box<dyn Agent>, get_state: StateSource, set_action: ActionSink) -> Self {
        Controller {
            agent,
            get_state,
            set_action,
        }
    }

    pub fn agent_name(&self) -> &'static str {
        self.agent.name()
    }

    /// Runs one tick: exactly one `set_action` call
    pub fn sense_and_act(&mut self) {
        let state = (self.get_state)();
        let action = self.agent.best_action(&state);

        match action.as_deref() {
            Some(name) => debug!("{} chose {}", self.agent.name(), name),
            None => warn!("{} has no action for head {:?}", self.agent.name(), state.head()),
        }

        (self.set_action)(action.as_deref());
    }
}
