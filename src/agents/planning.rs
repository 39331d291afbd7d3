// Best-first search over hypothetical future states
//
// Nodes are valued by distance-to-food per step of depth, so shallow nodes
// close to the food are expanded first. The search ends when a node sits on
// the food or the expansion cap is exceeded; either way the first action of
// that node's path is played.
//
// Deduplication is keyed on the head cell only. Two states with the same head
// and different trailing bodies are treated as one, which prunes some valid
// alternate paths; this approximation keeps the visited set small.

use log::{debug, error, warn};
use std::collections::HashSet;

use crate::agents::Agent;
use crate::config::PlanningConfig;
use crate::error::AgentError;
use crate::evaluation::{distance_to_food, is_dead, legal_actions};
use crate::priority_queue::PriorityQueue;
use crate::types::{ActionMap, Cell, StateSnapshot};

/// Snapshot plus the actions that led to it from the root
#[derive(Debug, Clone)]
struct SearchNode<'a> {
    state: StateSnapshot,
    path: Vec<&'a str>,
    distance: i32,
}

impl<'a> SearchNode<'a> {
    /// Higher is better: negated distance per step of depth
    fn priority(&self) -> f64 {
        -(self.distance as f64 / (self.path.len() + 1) as f64)
    }
}

/// Counters from one planning call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanStats {
    pub expansions: usize,
    pub frontier_peak: usize,
    pub visited: usize,
    pub path_len: usize,
    pub reached_food: bool,
    pub exhausted: bool,
}

/// Result of one planning call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// First action of the chosen path; `None` if the path is empty
    pub first_action: Option<String>,
    pub stats: PlanStats,
}

/// Best-first planner
pub struct PlanningAgent {
    actions: ActionMap,
    config: PlanningConfig,
    last_stats: Option<PlanStats>,
}

impl PlanningAgent {
    pub fn new(actions: ActionMap, config: PlanningConfig) -> Self {
        PlanningAgent {
            actions,
            config,
            last_stats: None,
        }
    }

    /// Counters from the most recent `best_action` call
    pub fn last_stats(&self) -> Option<&PlanStats> {
        self.last_stats.as_ref()
    }

    /// Runs the search from `state`
    ///
    /// `depth` is a lookahead hint only; the expansion cap is what bounds the
    /// search.
    pub fn plan(&self, state: &StateSnapshot, depth: usize) -> Result<Plan, AgentError> {
        debug!(
            "Planning from head {:?} to food {:?} (depth hint {}, expansion cap {})",
            state.head(),
            state.food,
            depth,
            self.config.max_expansions
        );

        let root = SearchNode {
            state: state.clone(),
            path: Vec::new(),
            distance: distance_to_food(state),
        };

        let mut frontier = PriorityQueue::new();
        let mut seen: HashSet<Cell> = HashSet::new();
        let mut stats = PlanStats::default();
        let mut last_node: Option<SearchNode> = None;

        let root_priority = root.priority();
        frontier.insert(root, root_priority);
        stats.frontier_peak = 1;

        while frontier.heap_size() > 0 {
            let node = frontier.remove()?.value;
            seen.insert(node.state.head());
            stats.expansions += 1;

            if node.distance == 0 || stats.expansions > self.config.max_expansions {
                stats.reached_food = node.distance == 0;
                stats.visited = seen.len();
                stats.path_len = node.path.len();
                debug!(
                    "Search finished after {} expansions (path length {}, reached food: {})",
                    stats.expansions, stats.path_len, stats.reached_food
                );
                if stats.expansions > self.config.verbose_expansion_threshold {
                    debug!("Visited heads: {:?}", seen);
                }
                return Ok(Plan {
                    first_action: node.path.first().map(|a| a.to_string()),
                    stats,
                });
            }

            for name in legal_actions(&self.actions, &node.state) {
                let vector = self
                    .actions
                    .get(name)
                    .ok_or_else(|| AgentError::UnknownAction(name.to_string()))?;
                let next = node.state.advance(vector);

                if is_dead(&next) || seen.contains(&next.head()) {
                    continue;
                }

                // Marked on generation so the same head is never queued twice
                seen.insert(next.head());

                let mut path = node.path.clone();
                path.push(name);
                let child = SearchNode {
                    distance: distance_to_food(&next),
                    state: next,
                    path,
                };
                let priority = child.priority();
                frontier.insert(child, priority);
            }

            stats.frontier_peak = stats.frontier_peak.max(frontier.heap_size());
            last_node = Some(node);
        }

        stats.exhausted = true;
        stats.visited = seen.len();
        stats.path_len = last_node.as_ref().map_or(0, |n| n.path.len());
        debug!(
            "Frontier exhausted after {} expansions, falling back to last expanded node",
            stats.expansions
        );

        Ok(Plan {
            first_action: last_node
                .and_then(|n| n.path.first().map(|a| a.to_string())),
            stats,
        })
    }

    /// Action continuing the current heading, if one exists
    fn hold_heading(&self, state: &StateSnapshot) -> Option<String> {
        self.actions
            .name_of(state.heading())
            .map(|name| name.to_string())
    }
}

impl Agent for PlanningAgent {
    fn name(&self) -> &'static str {
        "planning"
    }

    fn best_action(&mut self, state: &StateSnapshot) -> Option<String> {
        match self.plan(state, self.config.depth) {
            Ok(plan) => {
                self.last_stats = Some(plan.stats);
                plan.first_action.or_else(|| {
                    let held = self.hold_heading(state);
                    warn!("Search produced an empty path, holding heading ({:?})", held);
                    held
                })
            }
            Err(e) => {
                error!("Planning failed: {}", e);
                self.last_stats = None;
                None
            }
        }
    }
}
