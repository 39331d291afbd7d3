// Headless game harness
//
// Plays the scheduler's part: owns the live snake, hands agents snapshots,
// applies whatever action they push back, grows the snake on food and ends
// the game on death. Nothing is rendered.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

use crate::agents::{AgentKind, Controller};
use crate::chooser::{tick_seed, SharedChooser};
use crate::config::Config;
use crate::debug_logger::DecisionLogger;
use crate::evaluation::is_dead;
use crate::types::{ActionMap, Bounds, Cell, StateSnapshot, Vector};

/// Live game state
pub struct Game {
    snake: Vec<Cell>,
    food: Cell,
    heading: Vector,
    bounds: Bounds,
    actions: ActionMap,
    score: u32,
    ticks: u32,
    over: bool,
    died: bool,
    rng: StdRng,
}

impl Game {
    /// Starts a game with a horizontal snake heading right from the centre
    pub fn new(config: &Config, actions: ActionMap, rng: StdRng) -> Self {
        let bounds = config.grid.bounds();
        let step = bounds.step;
        let centre = Cell {
            x: (bounds.width / step / 2) * step,
            y: (bounds.height / step / 2) * step,
        };

        let length = config.grid.initial_length.max(1) as i32;
        let snake = (0..length)
            .map(|i| Cell {
                x: centre.x - i * step,
                y: centre.y,
            })
            .collect();

        Game::assemble(snake, Vector { dx: step, dy: 0 }, bounds, actions, rng)
    }

    /// Starts a game from an explicit snake and heading; food is spawned
    pub fn from_parts(
        snake: Vec<Cell>,
        heading: Vector,
        bounds: Bounds,
        actions: ActionMap,
        rng: StdRng,
    ) -> Result<Self, String> {
        if snake.is_empty() {
            return Err("Snake must have at least one segment".to_string());
        }
        Ok(Game::assemble(snake, heading, bounds, actions, rng))
    }

    /// `snake` is non-empty
    fn assemble(
        snake: Vec<Cell>,
        heading: Vector,
        bounds: Bounds,
        actions: ActionMap,
        rng: StdRng,
    ) -> Self {
        let mut game = Game {
            food: snake[0],
            snake,
            heading,
            bounds,
            actions,
            score: 0,
            ticks: 0,
            over: false,
            died: false,
            rng,
        };
        game.spawn_food();
        game
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn died(&self) -> bool {
        self.died
    }

    pub fn snake(&self) -> &[Cell] {
        &self.snake
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    /// Moves the food somewhere specific
    pub fn place_food(&mut self, cell: Cell) {
        self.food = cell;
    }

    /// Independent copy of the current state
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            snake: self.snake.clone(),
            food: self.food,
            dx: self.heading.dx,
            dy: self.heading.dy,
            bounds: self.bounds,
        }
    }

    /// Advances one tick using `action`
    ///
    /// A missing or unknown action keeps the current heading.
    pub fn apply(&mut self, action: Option<&str>) {
        if self.over {
            return;
        }

        match action {
            Some(name) => match self.actions.get(name) {
                Some(v) => self.heading = v,
                None => warn!("Unknown action '{}', keeping heading", name),
            },
            None => debug!("No action this tick, keeping heading"),
        }

        let new_head = self.snake[0].offset(self.heading);
        self.snake.insert(0, new_head);
        if new_head == self.food {
            self.score += 1;
            self.spawn_food();
        } else {
            self.snake.pop();
        }
        self.ticks += 1;

        if is_dead(&self.snapshot()) {
            info!(
                "Snake died at {:?} on tick {} with score {}",
                new_head, self.ticks, self.score
            );
            self.over = true;
            self.died = true;
        }
    }

    /// Places food on a uniformly random free cell; ends the game if none is left
    fn spawn_food(&mut self) {
        let step = self.bounds.step;
        let free: Vec<Cell> = (0..self.bounds.height / step)
            .flat_map(|row| {
                (0..self.bounds.width / step).map(move |col| Cell {
                    x: col * step,
                    y: row * step,
                })
            })
            .filter(|cell| !self.snake.contains(cell))
            .collect();

        if free.is_empty() {
            info!("Board is full, ending game");
            self.over = true;
            return;
        }

        self.food = free[self.rng.random_range(0..free.len())];
    }
}

/// Outcome of one simulated game
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub game: usize,
    pub agent: AgentKind,
    pub seed: u64,
    pub score: u32,
    pub ticks: u32,
    pub length: usize,
    pub died: bool,
}

/// Plays one game to completion with the given strategy
///
/// The agent only sees the game through its state source and action sink;
/// the sink applies the action and records the decision.
pub fn play_game(
    kind: AgentKind,
    config: &Config,
    seed: u64,
    game_index: usize,
    logger: &DecisionLogger,
) -> GameSummary {
    let actions = ActionMap::cardinal(config.grid.step);
    let game = Rc::new(RefCell::new(Game::new(
        config,
        actions.clone(),
        StdRng::seed_from_u64(seed),
    )));

    // Reseeded before every decision so the log can name each tick's stream
    let chooser = SharedChooser::seeded(tick_seed(seed, 0));
    let agent = kind.build(actions, config, Box::new(chooser.clone()));
    let chooser_seed = move |tick: u32| match kind {
        AgentKind::Rollout => Some(tick_seed(seed, tick)),
        _ => None,
    };

    let source = game.clone();
    let sink = game.clone();
    let sink_logger = logger.clone();
    let mut controller = Controller::new(
        agent,
        Box::new(move || {
            let game = source.borrow();
            chooser.reseed(tick_seed(seed, game.ticks()));
            game.snapshot()
        }),
        Box::new(move |action: Option<&str>| {
            let mut game = sink.borrow_mut();
            let tick = game.ticks();
            sink_logger.log_decision(
                game_index,
                tick,
                kind,
                action,
                chooser_seed(tick),
                &game.snapshot(),
            );
            game.apply(action);
        }),
    );

    info!("Game {} started with {} agent (seed {})", game_index, kind, seed);

    loop {
        {
            let g = game.borrow();
            if g.is_over() || g.ticks() >= config.simulation.max_ticks {
                break;
            }
        }
        controller.sense_and_act();
    }

    let g = game.borrow();
    let summary = GameSummary {
        game: game_index,
        agent: kind,
        seed,
        score: g.score(),
        ticks: g.ticks(),
        length: g.snake().len(),
        died: g.died(),
    };
    info!(
        "Game {} over: score {}, ticks {}, died: {}",
        game_index, summary.score, summary.ticks, summary.died
    );
    summary
}
