use std::sync::Arc;

use mediapub_core::{
    core::storage::StorageContext, model::repository::db::DbPool, player::PlayerRegistry,
};

pub struct AppState {
    pub pool: DbPool,
    pub players: PlayerRegistry,
    pub storage_ctx: StorageContext,
    /// Whether newly added default players start out enabled
    pub enable_default_players: bool,
}

pub type SharedState = Arc<AppState>;
