// State evaluation helpers shared by every agent

use crate::types::{ActionMap, StateSnapshot};

/// True if the head sits on any other segment or outside the bounds
pub fn is_dead(state: &StateSnapshot) -> bool {
    let head = state.head();
    if state.snake[1..].contains(&head) {
        return true;
    }
    state.bounds.is_out_of_bounds(&head)
}

/// Manhattan distance from the head to the food
pub fn distance_to_food(state: &StateSnapshot) -> i32 {
    state.head().manhattan(&state.food)
}

/// Every configured action except the exact reversal of the current heading
///
/// Names come back in lexicographic order so that callers taking the first
/// match break ties the same way every time.
pub fn legal_actions<'a>(actions: &'a ActionMap, state: &StateSnapshot) -> Vec<&'a str> {
    let heading = state.heading();
    actions
        .iter()
        .filter(|(_, v)| !v.is_reverse_of(&heading))
        .map(|(name, _)| name)
        .collect()
}
