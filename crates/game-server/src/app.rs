use std::sync::Arc;

use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;
use tracing::{debug, info};
use twenty48_core::engine::{EngineError, GameState, Move, MoveOutcome, Rules};

use crate::config::{Config, GameConfig};
use crate::routes;

/// The single "current game" slot plus the RNG that feeds it.
///
/// The engine itself is stateless; all mutation of the current game happens
/// here, one request at a time behind the `AppState` mutex.
pub struct Session {
    pub(crate) current: Option<GameState>,
    rules: Rules,
    default_size: usize,
    rng: StdRng,
}

impl Session {
    pub fn new(rules: Rules, default_size: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            current: None,
            rules,
            default_size,
            rng,
        }
    }

    /// Current game, starting one at the default size if none exists yet.
    pub fn current(&mut self) -> Result<GameState, EngineError> {
        if let Some(state) = &self.current {
            return Ok(state.clone());
        }
        self.restart(None)
    }

    /// Replace the current game with a fresh one. On error the old game is kept.
    pub fn restart(&mut self, size: Option<usize>) -> Result<GameState, EngineError> {
        let size = size.unwrap_or(self.default_size);
        let state = self.rules.new_game(size, &mut self.rng)?;
        info!(size, tiles = ?state.new_tiles(), "new game");
        self.current = Some(state.clone());
        Ok(state)
    }

    pub fn play(&mut self, direction: Move) -> Result<MoveOutcome, EngineError> {
        let state = self.current()?;
        let outcome = self.rules.play(&state, direction, &mut self.rng);
        debug!(
            %direction,
            moved = outcome.moved,
            gained = outcome.gained,
            score = outcome.state.score(),
            won = outcome.state.won(),
            over = outcome.state.over(),
            "move\n{}",
            outcome.state.board()
        );
        if outcome.state.over() {
            info!(
                score = outcome.state.score(),
                highest_tile = outcome.state.board().highest_tile(),
                "game over"
            );
        }
        self.current = Some(outcome.state.clone());
        Ok(outcome)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub game: Arc<GameConfig>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let session = Session::new(
            config.rules()?,
            config.game.default_size,
            config.game.seed,
        );
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            game: Arc::new(config.game.clone()),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/game/new", post(routes::restart))
        .route("/api/game/restart", post(routes::restart))
        .route("/api/game/state", get(routes::get_state))
        .route("/api/game/move", post(routes::play_move))
        .route("/health", get(routes::get_health))
        .with_state(state)
}
