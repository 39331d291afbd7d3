//! Agent Scenario Tests
//!
//! End-to-end decisions on hand-built snapshots, driven through the same
//! get_state / set_action contract the game harness uses.

use snake_agents::agents::{Agent, AgentKind, Controller, GreedyAgent, PlanningAgent, RolloutAgent};
use snake_agents::chooser::{FirstChoice, RandomChooser};
use snake_agents::config::Config;
use snake_agents::evaluation::{is_dead, legal_actions};
use snake_agents::types::{ActionMap, Bounds, Cell, StateSnapshot, Vector};
use std::cell::RefCell;
use std::rc::Rc;

const STEP: i32 = 10;

/// Builds a snapshot from grid coordinates in step units
fn snapshot(snake: &[(i32, i32)], food: (i32, i32), heading: (i32, i32)) -> StateSnapshot {
    StateSnapshot {
        snake: snake
            .iter()
            .map(|&(x, y)| Cell {
                x: x * STEP,
                y: y * STEP,
            })
            .collect(),
        food: Cell {
            x: food.0 * STEP,
            y: food.1 * STEP,
        },
        dx: heading.0 * STEP,
        dy: heading.1 * STEP,
        bounds: Bounds {
            width: 300,
            height: 300,
            step: STEP,
        },
    }
}

/// Runs one tick through a Controller and returns what was pushed to set_action
fn decide(kind: AgentKind, state: StateSnapshot) -> Option<String> {
    let config = Config::default_hardcoded();
    let agent = kind.build(ActionMap::cardinal(STEP), &config, Box::new(FirstChoice));

    let pushed: Rc<RefCell<Vec<Option<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = pushed.clone();
    let mut controller = Controller::new(
        agent,
        Box::new(move || state.clone()),
        Box::new(move |action: Option<&str>| sink.borrow_mut().push(action.map(str::to_string))),
    );
    controller.sense_and_act();

    let pushed = pushed.borrow();
    assert_eq!(pushed.len(), 1, "set_action must be called exactly once");
    pushed[0].clone()
}

/// Snake coiled into a closed ring around a two-cell pocket; the head sits in
/// the pocket and the food is far outside.
fn walled_off() -> StateSnapshot {
    snapshot(
        &[
            (2, 2),
            (1, 2),
            (1, 3),
            (2, 3),
            (3, 3),
            (4, 3),
            (4, 2),
            (4, 1),
            (3, 1),
            (2, 1),
            (1, 1),
        ],
        (20, 20),
        (1, 0),
    )
}

#[test]
fn test_greedy_continues_straight_toward_food() {
    let state = StateSnapshot {
        snake: vec![Cell { x: 0, y: 0 }],
        food: Cell { x: 20, y: 0 },
        dx: 10,
        dy: 0,
        bounds: Bounds {
            width: 300,
            height: 300,
            step: 10,
        },
    };

    let actions = ActionMap::cardinal(10);
    let chosen = decide(AgentKind::Greedy, state.clone()).expect("greedy should choose");
    assert_eq!(actions.get(&chosen), Some(Vector { dx: 10, dy: 0 }));

    let next = state.advance(Vector { dx: 10, dy: 0 });
    assert_eq!(next.head().manhattan(&next.food), 10);
}

#[test]
fn test_greedy_is_deterministic() {
    let state = snapshot(&[(7, 9), (7, 10), (7, 11)], (15, 3), (0, -1));
    let first = decide(AgentKind::Greedy, state.clone());
    for _ in 0..20 {
        assert_eq!(decide(AgentKind::Greedy, state.clone()), first);
    }
}

#[test]
fn test_planner_avoids_neck_collision_straight_ahead() {
    // Heading right, but the cell to the right is part of the curled body
    let state = snapshot(
        &[(2, 2), (1, 2), (1, 1), (2, 1), (3, 1), (3, 2), (3, 3)],
        (6, 2),
        (1, 0),
    );

    let straight = state.advance(Vector { dx: STEP, dy: 0 });
    assert!(is_dead(&straight), "scenario must make going straight fatal");

    let chosen = decide(AgentKind::Planning, state).expect("planner should choose");
    assert_ne!(chosen, "right");
    assert_eq!(chosen, "down");
}

#[test]
fn test_planner_terminates_when_food_is_walled_off() {
    let state = walled_off();
    let actions = ActionMap::cardinal(STEP);
    let legal = legal_actions(&actions, &state);

    let mut planner = PlanningAgent::new(actions.clone(), Config::default_hardcoded().planning);
    let chosen = planner.best_action(&state).expect("planner should still choose");

    assert!(legal.contains(&chosen.as_str()));
    let stats = planner.last_stats().unwrap();
    assert!(stats.expansions <= 1001);
    assert!(!stats.reached_food);
    assert!(stats.exhausted);
}

#[test]
fn test_planner_never_returns_reversal() {
    let config = Config::default_hardcoded();
    let actions = ActionMap::cardinal(STEP);
    let mut planner = PlanningAgent::new(actions.clone(), config.planning);

    let cases = vec![
        snapshot(&[(5, 5), (4, 5), (3, 5)], (1, 5), (1, 0)),
        snapshot(&[(5, 5), (5, 6), (5, 7)], (5, 20), (0, -1)),
        snapshot(&[(0, 0), (1, 0)], (29, 29), (-1, 0)),
        snapshot(&[(29, 29), (29, 28)], (0, 0), (0, 1)),
    ];

    for state in cases {
        let chosen = planner.best_action(&state).expect("a safe move exists");
        let vector = actions.get(&chosen).unwrap();
        assert!(
            !vector.is_reverse_of(&state.heading()),
            "{} reverses heading {:?}",
            chosen,
            state.heading()
        );
        assert!(!is_dead(&state.advance(vector)), "{} is fatal", chosen);
    }
}

#[test]
fn test_planner_respects_expansion_cap_on_open_board() {
    let mut config = Config::default_hardcoded().planning;
    config.max_expansions = 10;
    let mut planner = PlanningAgent::new(ActionMap::cardinal(STEP), config);

    let state = snapshot(&[(0, 0), (0, 1)], (29, 29), (0, -1));
    let chosen = planner.best_action(&state);

    assert_eq!(planner.last_stats().unwrap().expansions, 11);
    assert!(chosen.is_some());
}

#[test]
fn test_rollout_with_first_choice_is_reproducible() {
    let state = snapshot(&[(12, 12), (11, 12), (10, 12)], (3, 25), (1, 0));
    let config = Config::default_hardcoded();

    let mut a = RolloutAgent::new(ActionMap::cardinal(STEP), config.rollout.clone(), Box::new(FirstChoice));
    let mut b = RolloutAgent::new(ActionMap::cardinal(STEP), config.rollout, Box::new(FirstChoice));

    assert_eq!(a.score_actions(&state), b.score_actions(&state));
    assert_eq!(a.best_action(&state), b.best_action(&state));
}

#[test]
fn test_rollout_avoids_immediately_fatal_moves() {
    // Bottom-right corner heading right: right and down leave the board
    let state = snapshot(&[(29, 29), (28, 29)], (0, 0), (1, 0));
    let mut rollout = RolloutAgent::new(
        ActionMap::cardinal(STEP),
        Config::default_hardcoded().rollout,
        Box::new(RandomChooser::seeded(99)),
    );

    let chosen = rollout.best_action(&state).expect("up is available");
    assert_eq!(chosen, "up");

    let scores = rollout.last_scores();
    let fatal: Vec<i64> = scores
        .iter()
        .filter(|(name, _)| name != "up")
        .map(|(_, score)| *score)
        .collect();
    assert!(fatal.iter().all(|&s| s == -100 * 200));
}

#[test]
fn test_all_agents_share_the_contract() {
    let state = snapshot(&[(10, 5), (9, 5), (8, 5)], (20, 5), (1, 0));
    for kind in AgentKind::all().iter() {
        let chosen = decide(*kind, state.clone());
        assert_eq!(chosen.as_deref(), Some("right"), "{} disagreed", kind);
    }
}

#[test]
fn test_greedy_agent_direct_use_matches_controller() {
    let state = snapshot(&[(3, 3)], (3, 9), (1, 0));
    let mut greedy = GreedyAgent::new(ActionMap::cardinal(STEP));
    assert_eq!(greedy.best_action(&state), decide(AgentKind::Greedy, state));
}
