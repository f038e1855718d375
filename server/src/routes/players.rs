use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, Instrument};
use utoipa::IntoParams;

use mediapub_core::{
    deadpool_diesel, interact,
    model::{
        self,
        repository::{self, player_prefs::ReorderDirection},
    },
};

use crate::{
    app_state::SharedState,
    http_error::{ApiResult, HttpError},
    schema::{CleanupResponse, EnabledPlayer, Player, PlayerPrefsId},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_players))
        .route("/enabled", get(get_enabled_players))
        .route("/cleanup", post(cleanup_players))
        .route("/:id/enable", post(enable_player))
        .route("/:id/disable", post(disable_player))
        .route("/:id/reorder", post(reorder_player))
}

fn parse_id(id: PlayerPrefsId) -> ApiResult<model::PlayerPrefsId> {
    id.try_into()
        .map_err(|err: eyre::Report| HttpError::BadRequest(err.to_string()))
}

async fn all_players(app_state: &SharedState) -> ApiResult<Vec<Player>> {
    let conn = app_state.pool.get().in_current_span().await?;
    let rows = interact!(conn, move |conn| repository::player_prefs::get_players(conn))
        .in_current_span()
        .await??;
    Ok(rows
        .iter()
        .map(|row| Player::from_model(row, &app_state.players))
        .collect())
}

/// Every row of the players table, enabled ones first.
#[utoipa::path(
    get,
    path = "/api/players",
    responses((status = 200, body = Vec<Player>)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_players(State(app_state): State<SharedState>) -> ApiResult<Json<Vec<Player>>> {
    Ok(Json(all_players(&app_state).await?))
}

/// The players the front end should try, most preferred first.
#[utoipa::path(
    get,
    path = "/api/players/enabled",
    responses((status = 200, body = Vec<EnabledPlayer>)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_enabled_players(
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<EnabledPlayer>>> {
    let conn = app_state.pool.get().in_current_span().await?;
    let state = app_state.clone();
    let enabled = interact!(conn, move |conn| {
        repository::player_prefs::fetch_enabled_players(conn, &state.players)
    })
    .in_current_span()
    .await??;
    Ok(Json(
        enabled
            .into_iter()
            .map(|(cls, data)| EnabledPlayer::from_model(&cls, data))
            .collect(),
    ))
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CleanupQuery {
    /// Enable newly added default players, defaults to the server config
    pub enable: Option<bool>,
}

#[utoipa::path(
    post,
    path = "/api/players/cleanup",
    params(CleanupQuery),
    responses((status = 200, body = CleanupResponse)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn cleanup_players(
    State(app_state): State<SharedState>,
    Query(query): Query<CleanupQuery>,
) -> ApiResult<Json<CleanupResponse>> {
    let enable = query.enable.unwrap_or(app_state.enable_default_players);
    let conn = app_state.pool.get().in_current_span().await?;
    let state = app_state.clone();
    let report = interact!(conn, move |conn| {
        repository::player_prefs::cleanup_players_table(conn, &state.players, enable)
    })
    .in_current_span()
    .await??;
    Ok(Json(report.into()))
}

async fn set_enabled(app_state: SharedState, id: PlayerPrefsId, enabled: bool) -> ApiResult<Player> {
    let id = parse_id(id)?;
    let conn = app_state.pool.get().in_current_span().await?;
    let player = interact!(conn, move |conn| {
        if repository::player_prefs::get_player(conn, id)?.is_none() {
            return Ok(None);
        }
        repository::player_prefs::set_player_enabled(conn, id, enabled)?;
        repository::player_prefs::get_player(conn, id)
    })
    .in_current_span()
    .await??
    .ok_or_else(|| HttpError::not_found(id))?;
    info!(name = %player.name, enabled, "changed player state");
    Ok(Player::from_model(&player, &app_state.players))
}

#[utoipa::path(
    post,
    path = "/api/players/{id}/enable",
    params(("id" = String, Path, description = "Player id")),
    responses((status = 200, body = Player), (status = 404, description = "No player with this id")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn enable_player(
    State(app_state): State<SharedState>,
    Path(id): Path<PlayerPrefsId>,
) -> ApiResult<Json<Player>> {
    Ok(Json(set_enabled(app_state, id, true).await?))
}

#[utoipa::path(
    post,
    path = "/api/players/{id}/disable",
    params(("id" = String, Path, description = "Player id")),
    responses((status = 200, body = Player), (status = 404, description = "No player with this id")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn disable_player(
    State(app_state): State<SharedState>,
    Path(id): Path<PlayerPrefsId>,
) -> ApiResult<Json<Player>> {
    Ok(Json(set_enabled(app_state, id, false).await?))
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReorderQuery {
    /// `up` or `down`
    pub direction: String,
}

/// Move a player one place up or down. Returns all players in their new order.
#[utoipa::path(
    post,
    path = "/api/players/{id}/reorder",
    params(("id" = String, Path, description = "Player id"), ReorderQuery),
    responses((status = 200, body = Vec<Player>), (status = 400, description = "Invalid direction"), (status = 404, description = "No player with this id")),
)]
#[tracing::instrument(skip(app_state))]
pub async fn reorder_player(
    State(app_state): State<SharedState>,
    Path(id): Path<PlayerPrefsId>,
    Query(query): Query<ReorderQuery>,
) -> ApiResult<Json<Vec<Player>>> {
    let id = parse_id(id)?;
    let direction = ReorderDirection::from_str(&query.direction).map_err(|_| {
        HttpError::BadRequest(format!(
            "invalid direction '{}', expected up or down",
            query.direction
        ))
    })?;
    let conn = app_state.pool.get().in_current_span().await?;
    let found = interact!(conn, move |conn| {
        if repository::player_prefs::get_player(conn, id)?.is_none() {
            return Ok(false);
        }
        repository::player_prefs::reorder_player(conn, id, direction)?;
        Ok(true)
    })
    .in_current_span()
    .await??;
    if !found {
        return Err(HttpError::not_found(id));
    }
    Ok(Json(all_players(&app_state).await?))
}
