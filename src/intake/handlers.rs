use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use super::types::{PlayerIdRequest, StartRequest};
use crate::scope::{ScopeId, ScopeKind};
use crate::shared::{AppError, AppState};

/// Routes for every lifecycle report the backend can make
pub fn router() -> Router<AppState> {
    Router::new()
        // Player joins, leaves or toggles ready in a game
        .route("/game/:game_id/playerjoin", post(game_player_join))
        .route("/game/:game_id/playerleave", post(game_player_leave))
        .route("/game/:game_id/playerready", post(game_player_ready))
        .route("/game/:game_id/playerunready", post(game_player_unready))
        // LOBBY -> PREGAME
        .route("/game/:game_id/launched", post(game_launched))
        // PREGAME -> INGAME
        .route("/game/:game_id/started", post(game_started))
        // {INGAME, POSTPENDING} -> POSTGAME
        .route("/game/:game_id/ended", post(game_ended))
        // INGAME -> POSTPENDING
        .route("/game/:game_id/confirmkills", post(game_confirm_kills))
        // Closed by the owner, an admin or otherwise
        .route("/game/:game_id", delete(game_closed))
        .route(
            "/game/:game_id/confirmKill/:player_id",
            get(player_confirm_kill),
        )
        // Same player reports for lobbies
        .route("/lobby/:lobby_id/playerjoin", post(lobby_player_join))
        .route("/lobby/:lobby_id/playerleave", post(lobby_player_leave))
        .route("/lobby/:lobby_id/playerready", post(lobby_player_ready))
        .route("/lobby/:lobby_id/playerunready", post(lobby_player_unready))
}

fn parse_player_id(raw: String) -> Result<String, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::BadRequest("playerId must not be empty".to_string()));
    }
    Ok(raw)
}

async fn player_join(
    state: &AppState,
    kind: ScopeKind,
    raw_id: String,
    player: Value,
) -> Result<StatusCode, AppError> {
    let scope_id = ScopeId::parse(raw_id)?;
    info!(scope_kind = %kind, scope_id = %scope_id, "Got player join data");

    state.dispatcher.player_join(kind, &scope_id, player).await;
    Ok(StatusCode::OK)
}

async fn player_leave(
    state: &AppState,
    kind: ScopeKind,
    raw_id: String,
    request: PlayerIdRequest,
) -> Result<StatusCode, AppError> {
    let scope_id = ScopeId::parse(raw_id)?;
    let player_id = parse_player_id(request.player_id)?;
    info!(scope_kind = %kind, scope_id = %scope_id, player_id = %player_id, "Got player leave data");

    state
        .dispatcher
        .player_leave(kind, &scope_id, &player_id)
        .await;
    Ok(StatusCode::OK)
}

async fn player_ready(
    state: &AppState,
    kind: ScopeKind,
    raw_id: String,
    request: PlayerIdRequest,
) -> Result<StatusCode, AppError> {
    let scope_id = ScopeId::parse(raw_id)?;
    let player_id = parse_player_id(request.player_id)?;
    info!(scope_kind = %kind, scope_id = %scope_id, player_id = %player_id, "Got player ready data");

    state
        .dispatcher
        .player_ready(kind, &scope_id, &player_id)
        .await;
    Ok(StatusCode::OK)
}

async fn player_unready(
    state: &AppState,
    kind: ScopeKind,
    raw_id: String,
    request: PlayerIdRequest,
) -> Result<StatusCode, AppError> {
    let scope_id = ScopeId::parse(raw_id)?;
    let player_id = parse_player_id(request.player_id)?;
    info!(scope_kind = %kind, scope_id = %scope_id, player_id = %player_id, "Got player unready data");

    state
        .dispatcher
        .player_unready(kind, &scope_id, &player_id)
        .await;
    Ok(StatusCode::OK)
}

/// POST /game/{game_id}/playerjoin
/// Body is the player info, relayed as-is
#[instrument(name = "game_player_join", skip(state, player))]
pub async fn game_player_join(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(player): Json<Value>,
) -> Result<StatusCode, AppError> {
    player_join(&state, ScopeKind::Game, game_id, player).await
}

/// POST /game/{game_id}/playerleave
#[instrument(name = "game_player_leave", skip(state))]
pub async fn game_player_leave(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_leave(&state, ScopeKind::Game, game_id, request).await
}

/// POST /game/{game_id}/playerready
#[instrument(name = "game_player_ready", skip(state))]
pub async fn game_player_ready(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_ready(&state, ScopeKind::Game, game_id, request).await
}

/// POST /game/{game_id}/playerunready
#[instrument(name = "game_player_unready", skip(state))]
pub async fn game_player_unready(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_unready(&state, ScopeKind::Game, game_id, request).await
}

/// POST /game/{game_id}/launched
#[instrument(name = "game_launched", skip(state))]
pub async fn game_launched(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    info!(game_id = %game_id, "Got game launch request");

    state.dispatcher.game_launch(&game_id).await;
    Ok(StatusCode::OK)
}

/// POST /game/{game_id}/started
/// Body: `{"startTime": ...}`
#[instrument(name = "game_started", skip(state))]
pub async fn game_started(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<StartRequest>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    info!(game_id = %game_id, "Got game start request");

    state.dispatcher.game_start(&game_id, request.start_time).await;
    Ok(StatusCode::OK)
}

/// POST /game/{game_id}/ended
/// Body is the end-of-game summary, relayed as-is
#[instrument(name = "game_ended", skip(state, summary))]
pub async fn game_ended(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(summary): Json<Value>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    info!(game_id = %game_id, "Got game end request");

    state.dispatcher.game_end(&game_id, summary).await;
    Ok(StatusCode::OK)
}

/// POST /game/{game_id}/confirmkills
/// Body lists the kills still waiting for confirmation
#[instrument(name = "game_confirm_kills", skip(state, pending))]
pub async fn game_confirm_kills(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(pending): Json<Value>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    info!(game_id = %game_id, "Got game confirm kills request");

    state.dispatcher.confirm_kills(&game_id, pending).await;
    Ok(StatusCode::OK)
}

/// DELETE /game/{game_id}
#[instrument(name = "game_closed", skip(state))]
pub async fn game_closed(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    info!(game_id = %game_id, "Got game close request");

    state.dispatcher.game_close(&game_id).await;
    Ok(StatusCode::OK)
}

/// GET /game/{game_id}/confirmKill/{player_id}
#[instrument(name = "player_confirm_kill", skip(state))]
pub async fn player_confirm_kill(
    State(state): State<AppState>,
    Path((game_id, player_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let game_id = ScopeId::parse(game_id)?;
    let player_id = parse_player_id(player_id)?;
    info!(game_id = %game_id, player_id = %player_id, "Got player confirm kill request");

    state
        .dispatcher
        .player_confirm_kill(&game_id, &player_id)
        .await;
    Ok(StatusCode::OK)
}

/// POST /lobby/{lobby_id}/playerjoin
#[instrument(name = "lobby_player_join", skip(state, player))]
pub async fn lobby_player_join(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
    Json(player): Json<Value>,
) -> Result<StatusCode, AppError> {
    player_join(&state, ScopeKind::Lobby, lobby_id, player).await
}

/// POST /lobby/{lobby_id}/playerleave
#[instrument(name = "lobby_player_leave", skip(state))]
pub async fn lobby_player_leave(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_leave(&state, ScopeKind::Lobby, lobby_id, request).await
}

/// POST /lobby/{lobby_id}/playerready
#[instrument(name = "lobby_player_ready", skip(state))]
pub async fn lobby_player_ready(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_ready(&state, ScopeKind::Lobby, lobby_id, request).await
}

/// POST /lobby/{lobby_id}/playerunready
#[instrument(name = "lobby_player_unready", skip(state))]
pub async fn lobby_player_unready(
    State(state): State<AppState>,
    Path(lobby_id): Path<String>,
    Json(request): Json<PlayerIdRequest>,
) -> Result<StatusCode, AppError> {
    player_unready(&state, ScopeKind::Lobby, lobby_id, request).await
}
