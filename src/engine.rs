//! The authoritative game state and its per-tick simulation.
//!
//! [`GameEngine`] is a plain state machine: it never sleeps, reads input or
//! owns a timer. A front end calls [`GameEngine::set_direction`] when a key is
//! pressed and [`GameEngine::step`] every [`GameEngine::tick_delay_ms`]
//! milliseconds, then draws from [`GameEngine::snapshot`].

use std::time::Duration;

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coordinates::Coordinates;
use crate::difficulty::GameDifficulty;
use crate::error::{ConfigError, EngineError};
use crate::grid::GridConfig;
use crate::snake::{Direction, Snake, INIT_SNAKE_SIZE};

pub const DEFAULT_TICK_DELAY_MS: u64 = 100;
pub const MIN_TICK_DELAY_MS: u64 = 25;

/// Where a fresh apple may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplePlacement {
    /// Uniform over every cell, the snake's own body included.
    #[default]
    Anywhere,
    /// Uniform over the cells the snake does not occupy. Falls back to
    /// [`ApplePlacement::Anywhere`] when the snake covers the whole board.
    AvoidSnake,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub initial_tick_delay_ms: u64,
    /// Eating never pushes the tick delay below this.
    pub min_tick_delay_ms: u64,
    pub apple_placement: ApplePlacement,
    /// Fixed seed for apple placement. `None` draws a new seed on every start.
    pub seed: Option<u64>,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_tick_delay_ms == 0 || self.initial_tick_delay_ms < self.min_tick_delay_ms {
            return Err(ConfigError::InvalidTickDelay {
                initial: self.initial_tick_delay_ms,
                min: self.min_tick_delay_ms,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_tick_delay_ms: DEFAULT_TICK_DELAY_MS,
            min_tick_delay_ms: MIN_TICK_DELAY_MS,
            apple_placement: ApplePlacement::default(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    NotStarted,
    Running,
    GameOver(Collision),
}

/// What a single [`GameEngine::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved,
    AteApple,
    Collided(Collision),
}

/// Owned copy of everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    pub score: u32,
    pub running: bool,
    pub tick_delay_ms: u64,
    pub direction: Direction,
    pub difficulty: GameDifficulty,
    pub grid: GridConfig,
    /// Head first.
    pub snake: Vec<Coordinates>,
    pub apple: Coordinates,
}

#[derive(Debug, Clone)]
struct Run {
    grid: GridConfig,
    difficulty: GameDifficulty,
    snake: Snake,
    direction: Direction,
    // applied at the start of the next step
    pending_direction: Option<Direction>,
    apple: Coordinates,
    score: u32,
    tick_delay_ms: u64,
    rng: StdRng,
}

impl Run {
    fn place_apple(&mut self, placement: ApplePlacement) {
        self.apple = match placement {
            ApplePlacement::Anywhere => random_cell(&mut self.rng, &self.grid),
            ApplePlacement::AvoidSnake => free_cell(&mut self.rng, &self.grid, &self.snake)
                .unwrap_or_else(|| random_cell(&mut self.rng, &self.grid)),
        };
    }
}

fn random_cell(rng: &mut StdRng, grid: &GridConfig) -> Coordinates {
    let column = rng.random_range(0..grid.columns());
    let row = rng.random_range(0..grid.rows());
    grid.cell(column, row)
}

fn free_cell(rng: &mut StdRng, grid: &GridConfig, snake: &Snake) -> Option<Coordinates> {
    let board_size = grid.cell_count();
    // if the snake covers more than 80% of the board pick from the list of
    // empty cells, otherwise retry random cells until one is free
    if snake.len() > (board_size * 4) / 5 {
        let empty_positions: Vec<Coordinates> = (0..grid.columns())
            .flat_map(|column| (0..grid.rows()).map(move |row| (column, row)))
            .map(|(column, row)| grid.cell(column, row))
            .filter(|position| !snake.occupies(position))
            .collect();
        if empty_positions.is_empty() {
            return None;
        }
        let random_index = rng.random_range(0..empty_positions.len());
        return Some(empty_positions[random_index]);
    }
    loop {
        let position = random_cell(rng, grid);
        if !snake.occupies(&position) {
            return Some(position);
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameEngine {
    config: EngineConfig,
    state: GameState,
    run: Option<Run>,
    last_seed: Option<u64>,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        GameEngine {
            config,
            state: GameState::NotStarted,
            run: None,
            last_seed: None,
        }
    }

    /// Begins a new run, discarding whatever the previous one left behind.
    ///
    /// On a configuration error the engine keeps its previous state.
    pub fn start(&mut self, difficulty: GameDifficulty, grid: GridConfig) -> Result<(), ConfigError> {
        grid.validate()?;
        self.config.validate()?;

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let spawn = grid.cell(INIT_SNAKE_SIZE as i32 - 1, grid.rows() / 2);
        let mut run = Run {
            grid,
            difficulty,
            snake: Snake::spawn(spawn, INIT_SNAKE_SIZE, grid.unit()),
            direction: Direction::Right,
            pending_direction: None,
            apple: spawn,
            score: 0,
            tick_delay_ms: self.config.initial_tick_delay_ms,
            rng: StdRng::seed_from_u64(seed),
        };
        run.place_apple(self.config.apple_placement);

        info!(
            "starting {} game on {}x{} grid (unit {}), seed {}, first apple at {}",
            difficulty,
            grid.width(),
            grid.height(),
            grid.unit(),
            seed,
            run.apple
        );
        self.run = Some(run);
        self.last_seed = Some(seed);
        self.state = GameState::Running;
        Ok(())
    }

    /// Queues a turn for the next step. A turn straight back into the neck is
    /// ignored; the last accepted turn before a step wins.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), EngineError> {
        let run = self.running_mut()?;
        // judged against the heading the snake last moved in, not the pending turn
        if direction == run.direction.opposite() {
            debug!("ignoring reversal from {:?} to {:?}", run.direction, direction);
            return Ok(());
        }
        run.pending_direction = Some(direction);
        Ok(())
    }

    /// Advances the game by one tick: move, eat, then check for collisions.
    pub fn step(&mut self) -> Result<StepOutcome, EngineError> {
        let placement = self.config.apple_placement;
        let min_tick_delay_ms = self.config.min_tick_delay_ms;
        let run = self.running_mut()?;

        if let Some(direction) = run.pending_direction.take() {
            run.direction = direction;
        }
        let old_tail = run
            .snake
            .advance(run.direction, run.grid.unit())
            .ok_or(EngineError::EmptySnake)?;
        let head = run.snake.head();
        trace!("snake head moved {:?} to {}", run.direction, head);

        let mut outcome = StepOutcome::Moved;
        if head == run.apple {
            run.snake.grow(old_tail);
            run.score += 1;
            run.tick_delay_ms = run
                .tick_delay_ms
                .saturating_sub(run.difficulty.get_speed_increment())
                .max(min_tick_delay_ms);
            run.place_apple(placement);
            debug!(
                "apple eaten at {}, score {}, tick delay {}ms, next apple at {}",
                head, run.score, run.tick_delay_ms, run.apple
            );
            outcome = StepOutcome::AteApple;
        }

        let collision = if !run.grid.is_in_bound(&head) {
            Some(Collision::Wall)
        } else if run.snake.bites_itself() {
            Some(Collision::SelfBite)
        } else {
            None
        };

        if let Some(collision) = collision {
            info!(
                "game over: {:?} at {}, final score {}",
                collision, head, run.score
            );
            self.state = GameState::GameOver(collision);
            return Ok(StepOutcome::Collided(collision));
        }
        Ok(outcome)
    }

    /// `None` until the first [`GameEngine::start`]. After a game over the
    /// final frame stays available until the next start.
    pub fn snapshot(&self) -> Option<RunState> {
        let run = self.run.as_ref()?;
        Some(RunState {
            score: run.score,
            running: self.is_running(),
            tick_delay_ms: run.tick_delay_ms,
            direction: run.direction,
            difficulty: run.difficulty,
            grid: run.grid,
            snake: run.snake.to_vec(),
            apple: run.apple,
        })
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn score(&self) -> u32 {
        self.run.as_ref().map_or(0, |run| run.score)
    }

    /// Delay the tick source should wait before the next step.
    pub fn tick_delay_ms(&self) -> u64 {
        self.run
            .as_ref()
            .map_or(self.config.initial_tick_delay_ms, |run| run.tick_delay_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms())
    }

    /// Seed behind the current run's apple sequence.
    pub fn last_seed(&self) -> Option<u64> {
        self.last_seed
    }

    /// Replaces the running snake, head first. Meant for tests and replays.
    pub fn debug_set_snake(
        &mut self,
        segments: &[Coordinates],
        direction: Direction,
    ) -> Result<(), EngineError> {
        if segments.is_empty() {
            return Err(EngineError::EmptySnake);
        }
        let run = self.running_mut()?;
        if let Some(position) = segments.iter().find(|position| !on_lattice(&run.grid, position)) {
            return Err(EngineError::InvalidPosition {
                position: *position,
            });
        }
        run.snake = Snake::from_segments(segments);
        run.direction = direction;
        run.pending_direction = None;
        Ok(())
    }

    /// Moves the current apple. Meant for tests and replays.
    pub fn debug_set_apple(&mut self, position: Coordinates) -> Result<(), EngineError> {
        let run = self.running_mut()?;
        if !on_lattice(&run.grid, &position) {
            return Err(EngineError::InvalidPosition { position });
        }
        run.apple = position;
        Ok(())
    }

    fn running_mut(&mut self) -> Result<&mut Run, EngineError> {
        match (self.state, self.run.as_mut()) {
            (GameState::Running, Some(run)) => Ok(run),
            (state, _) => Err(EngineError::NotRunning { state }),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        GameEngine::new(EngineConfig::default())
    }
}

fn on_lattice(grid: &GridConfig, position: &Coordinates) -> bool {
    grid.is_in_bound(position) && grid.is_aligned(position)
}
