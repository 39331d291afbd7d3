use crate::agents::Agent;
use crate::evaluation::legal_actions;
use crate::types::{ActionMap, StateSnapshot};

/// One-step lookahead toward the food
///
/// Picks the legal action whose next head cell is closest to the food. On a
/// tie, continuing straight beats turning; otherwise the earlier action in
/// canonical order is kept. Does not check for death.
pub struct GreedyAgent {
    actions: ActionMap,
}

impl GreedyAgent {
    pub fn new(actions: ActionMap) -> Self {
        GreedyAgent { actions }
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn best_action(&mut self, state: &StateSnapshot) -> Option<String> {
        let head = state.head();
        let heading = state.heading();

        let mut best: Option<(&str, i32)> = None;
        for name in legal_actions(&self.actions, state) {
            let vector = match self.actions.get(name) {
                Some(v) => v,
                None => continue,
            };
            let distance = head.offset(vector).manhattan(&state.food);

            best = match best {
                Some((_, best_distance)) if distance < best_distance => Some((name, distance)),
                // Don't turn away from a straight line that is just as good
                Some((_, best_distance)) if distance == best_distance && vector == heading => {
                    Some((name, distance))
                }
                Some(current) => Some(current),
                None => Some((name, distance)),
            };
        }

        best.map(|(name, _)| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bounds, Cell};

    fn state(head: (i32, i32), food: (i32, i32), dx: i32, dy: i32) -> StateSnapshot {
        StateSnapshot {
            snake: vec![Cell { x: head.0, y: head.1 }],
            food: Cell { x: food.0, y: food.1 },
            dx,
            dy,
            bounds: Bounds {
                width: 300,
                height: 300,
                step: 10,
            },
        }
    }

    #[test]
    fn test_continues_straight_toward_food() {
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((0, 0), (20, 0), 10, 0);
        assert_eq!(agent.best_action(&s).as_deref(), Some("right"));
    }

    #[test]
    fn test_tie_prefers_current_heading() {
        // down and right both land 10 away; heading is right
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((50, 50), (60, 60), 10, 0);
        assert_eq!(agent.best_action(&s).as_deref(), Some("right"));
    }

    #[test]
    fn test_tie_keeps_first_unless_later_matches_heading() {
        // heading down: down and right tie, down comes first and matches heading
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((50, 50), (60, 60), 0, 10);
        assert_eq!(agent.best_action(&s).as_deref(), Some("down"));

        // heading up: right is found first, up ties it later and matches heading
        let s = state((50, 50), (60, 40), 0, -10);
        assert_eq!(agent.best_action(&s).as_deref(), Some("up"));

        // heading left toward a food diagonally below-right: down and right
        // are not both legal (right reverses), down wins outright
        let s = state((50, 50), (60, 60), -10, 0);
        assert_eq!(agent.best_action(&s).as_deref(), Some("down"));
    }

    #[test]
    fn test_strictly_closer_beats_heading() {
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((50, 50), (50, 100), 10, 0);
        assert_eq!(agent.best_action(&s).as_deref(), Some("down"));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((120, 70), (30, 200), 0, 10);
        let first = agent.best_action(&s);
        for _ in 0..10 {
            assert_eq!(agent.best_action(&s), first);
        }
    }

    #[test]
    fn test_may_choose_a_fatal_move() {
        // Food beyond the wall: greedy walks into it
        let mut agent = GreedyAgent::new(ActionMap::cardinal(10));
        let s = state((290, 50), (400, 50), 10, 0);
        assert_eq!(agent.best_action(&s).as_deref(), Some("right"));
    }
}
