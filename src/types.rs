// Grid and state types shared by every agent
// Coordinates are in grid units; one move advances by `Bounds::step`

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of travel, one grid step per tick
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Vector {
    pub dx: i32,
    pub dy: i32,
}

impl Vector {
    /// True if `other` points exactly the opposite way
    pub fn is_reverse_of(&self, other: &Vector) -> bool {
        self.dx == -other.dx && self.dy == -other.dy
    }
}

/// 2D cell on the grid
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    /// Cell reached by moving along `v`
    pub fn offset(&self, v: Vector) -> Cell {
        Cell {
            x: self.x + v.dx,
            y: self.y + v.dy,
        }
    }

    /// Manhattan distance between two cells
    pub fn manhattan(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Playable area; valid cells lie in [0, width - step] x [0, height - step]
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
    pub step: i32,
}

impl Bounds {
    /// Checks if a cell is outside the playable area
    pub fn is_out_of_bounds(&self, cell: &Cell) -> bool {
        cell.x < 0 || cell.x > self.width - self.step || cell.y < 0 || cell.y > self.height - self.step
    }
}

/// Mapping from action name to direction vector
///
/// Backed by a `BTreeMap` so iteration is always in lexicographic name order,
/// which is what makes "first satisfying action" tie-breaks reproducible.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Default)]
pub struct ActionMap(BTreeMap<String, Vector>);

impl ActionMap {
    /// Creates an empty map
    pub fn new() -> Self {
        ActionMap(BTreeMap::new())
    }

    /// The four cardinal moves in screen coordinates (y grows downward)
    pub fn cardinal(step: i32) -> Self {
        ActionMap::new()
            .with("up", Vector { dx: 0, dy: -step })
            .with("down", Vector { dx: 0, dy: step })
            .with("left", Vector { dx: -step, dy: 0 })
            .with("right", Vector { dx: step, dy: 0 })
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, vector: Vector) -> Self {
        self.0.insert(name.to_string(), vector);
        self
    }

    pub fn get(&self, name: &str) -> Option<Vector> {
        self.0.get(name).copied()
    }

    /// Name of the action whose vector equals `v`, if any
    pub fn name_of(&self, v: Vector) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, vector)| **vector == v)
            .map(|(name, _)| name.as_str())
    }

    /// Iterates actions in canonical (lexicographic) order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Vector)> {
        self.0.iter().map(|(name, v)| (name.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything an agent sees in one tick
///
/// `snake[0]` is the head; the snake is never empty.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
pub struct StateSnapshot {
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub dx: i32,
    pub dy: i32,
    pub bounds: Bounds,
}

impl StateSnapshot {
    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    /// Current heading as a vector
    pub fn heading(&self) -> Vector {
        Vector {
            dx: self.dx,
            dy: self.dy,
        }
    }

    /// Returns an independent successor with the snake shifted along `v`
    ///
    /// The new head is prepended and the tail dropped, so length is held
    /// constant: hypothetical futures never eat.
    pub fn advance(&self, v: Vector) -> StateSnapshot {
        let mut snake = Vec::with_capacity(self.snake.len());
        snake.push(self.head().offset(v));
        snake.extend_from_slice(&self.snake[..self.snake.len() - 1]);

        StateSnapshot {
            snake,
            food: self.food,
            dx: v.dx,
            dy: v.dy,
            bounds: self.bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds {
            width: 300,
            height: 300,
            step: 10,
        }
    }

    #[test]
    fn test_cardinal_iterates_in_lexicographic_order() {
        let actions = ActionMap::cardinal(10);
        let names: Vec<&str> = actions.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["down", "left", "right", "up"]);
    }

    #[test]
    fn test_name_of_finds_matching_vector() {
        let actions = ActionMap::cardinal(10);
        assert_eq!(actions.name_of(Vector { dx: 10, dy: 0 }), Some("right"));
        assert_eq!(actions.name_of(Vector { dx: 5, dy: 5 }), None);
    }

    #[test]
    fn test_out_of_bounds_uses_step_margin() {
        let b = bounds();
        assert!(!b.is_out_of_bounds(&Cell { x: 290, y: 290 }));
        assert!(b.is_out_of_bounds(&Cell { x: 300, y: 0 }));
        assert!(b.is_out_of_bounds(&Cell { x: 0, y: 300 }));
        assert!(b.is_out_of_bounds(&Cell { x: -10, y: 0 }));
    }

    #[test]
    fn test_advance_keeps_length_and_leaves_parent_untouched() {
        let state = StateSnapshot {
            snake: vec![
                Cell { x: 20, y: 0 },
                Cell { x: 10, y: 0 },
                Cell { x: 0, y: 0 },
            ],
            food: Cell { x: 100, y: 100 },
            dx: 10,
            dy: 0,
            bounds: bounds(),
        };

        let next = state.advance(Vector { dx: 0, dy: 10 });

        assert_eq!(
            next.snake,
            vec![
                Cell { x: 20, y: 10 },
                Cell { x: 20, y: 0 },
                Cell { x: 10, y: 0 },
            ]
        );
        assert_eq!(next.heading(), Vector { dx: 0, dy: 10 });
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.head(), Cell { x: 20, y: 0 });
    }
}
