// Monte-Carlo rollout evaluation
//
// Every legal first move is scored by many short random continuations. A
// continuation ends on death, on reaching the food, or after `max_steps`
// random moves. Totals are compared across first moves and the highest wins;
// ties go to the earlier move in canonical order.

use log::debug;

use crate::agents::Agent;
use crate::chooser::{choose, Chooser};
use crate::config::RolloutConfig;
use crate::evaluation::{distance_to_food, is_dead, legal_actions};
use crate::types::{ActionMap, StateSnapshot, Vector};

/// How a single continuation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Died,
    ReachedFood,
    Ended { distance: i32 },
}

/// Rollout-based agent
pub struct RolloutAgent {
    actions: ActionMap,
    config: RolloutConfig,
    chooser: Box<dyn Chooser>,
    last_scores: Vec<(String, i64)>,
}

impl RolloutAgent {
    pub fn new(actions: ActionMap, config: RolloutConfig, chooser: Box<dyn Chooser>) -> Self {
        RolloutAgent {
            actions,
            config,
            chooser,
            last_scores: Vec::new(),
        }
    }

    /// Score table from the most recent `best_action` call, in legal-action order
    pub fn last_scores(&self) -> &[(String, i64)] {
        &self.last_scores
    }

    /// Accumulated score for every legal first action, in legal-action order
    pub fn score_actions(&mut self, state: &StateSnapshot) -> Vec<(String, i64)> {
        let first_moves: Vec<(&str, Vector)> = legal_actions(&self.actions, state)
            .into_iter()
            .filter_map(|name| self.actions.get(name).map(|v| (name, v)))
            .collect();

        let mut totals = vec![0i64; first_moves.len()];

        // Trials run round-robin across first moves so a shared random source
        // is consumed in the same order every time.
        for _ in 0..self.config.trials {
            for (i, (_, vector)) in first_moves.iter().enumerate() {
                let outcome = run_trial(
                    &self.actions,
                    self.chooser.as_mut(),
                    state,
                    *vector,
                    self.config.max_steps,
                );
                totals[i] += self.score(outcome);
            }
        }

        first_moves
            .iter()
            .zip(totals)
            .map(|((name, _), total)| (name.to_string(), total))
            .collect()
    }

    fn score(&self, outcome: TrialOutcome) -> i64 {
        match outcome {
            TrialOutcome::Died => self.config.death_score,
            TrialOutcome::ReachedFood => self.config.food_score,
            TrialOutcome::Ended { distance } => self.config.distance_base - distance as i64,
        }
    }
}

/// Plays `first`, then up to `max_steps` random legal moves
///
/// Only the random steps are checked for death. Reaching the food with
/// `first` ends the trial straight away.
pub fn run_trial(
    actions: &ActionMap,
    chooser: &mut dyn Chooser,
    start: &StateSnapshot,
    first: Vector,
    max_steps: usize,
) -> TrialOutcome {
    let mut state = start.advance(first);
    let mut distance = distance_to_food(&state);
    let mut died = false;
    let mut steps = 0;

    while !(died || distance == 0) && steps < max_steps {
        let options = legal_actions(actions, &state);
        let vector = match choose(chooser, &options).and_then(|name| actions.get(name)) {
            Some(v) => v,
            None => break,
        };

        state = state.advance(vector);
        distance = distance_to_food(&state);
        died = is_dead(&state);
        steps += 1;
    }

    if died {
        TrialOutcome::Died
    } else if distance == 0 {
        TrialOutcome::ReachedFood
    } else {
        TrialOutcome::Ended { distance }
    }
}

impl Agent for RolloutAgent {
    fn name(&self) -> &'static str {
        "rollout"
    }

    fn best_action(&mut self, state: &StateSnapshot) -> Option<String> {
        let scores = self.score_actions(state);
        debug!("Rollout scores: {:?}", scores);

        let mut best: Option<&(String, i64)> = None;
        for entry in &scores {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        let chosen = best.map(|(name, _)| name.clone());

        self.last_scores = scores;
        chosen
    }
}
