use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use twenty48_core::engine::{EngineError, GameState, Move};

use crate::app::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: String,
    default_size: usize,
    win_tile: u32,
}

#[derive(Deserialize, Default)]
pub struct SizeQuery {
    size: Option<usize>,
}

#[derive(Deserialize, Default)]
pub struct MoveQuery {
    dir: Option<String>,
}

fn bad_request(err: EngineError) -> (StatusCode, String) {
    warn!(%err, "rejected request");
    (StatusCode::BAD_REQUEST, err.to_string())
}

/// `POST /api/game/new` and `POST /api/game/restart`.
pub async fn restart(
    State(state): State<AppState>,
    Query(query): Query<SizeQuery>,
) -> Result<Json<GameState>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    session.restart(query.size).map(Json).map_err(bad_request)
}

pub async fn get_state(
    State(state): State<AppState>,
) -> Result<Json<GameState>, (StatusCode, String)> {
    let mut session = state.session.lock().await;
    session.current().map(Json).map_err(bad_request)
}

/// Apply one move. The direction is validated before the session is touched,
/// so a bad token neither creates nor changes a game.
pub async fn play_move(
    State(state): State<AppState>,
    Query(query): Query<MoveQuery>,
) -> Result<Json<GameState>, (StatusCode, String)> {
    let token = query.dir.ok_or_else(|| {
        warn!("move without dir");
        (
            StatusCode::BAD_REQUEST,
            "missing `dir` query parameter".to_string(),
        )
    })?;
    let direction: Move = token.parse().map_err(|err| {
        warn!(%err, "rejected move");
        (StatusCode::BAD_REQUEST, format!("{err}"))
    })?;

    let mut session = state.session.lock().await;
    let outcome = session.play(direction).map_err(bad_request)?;
    Ok(Json(outcome.state))
}

pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        default_size: state.game.default_size,
        win_tile: state.game.win_tile,
    })
}
