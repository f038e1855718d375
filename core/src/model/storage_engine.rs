use chrono::{DateTime, Utc};
use serde::Serialize;

use super::StorageEngineId;

/// Every storage engine implementation there is. The string form is what
/// gets persisted in `storage.engine_type`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
pub enum EngineType {
    LocalFileStorage,
    RemoteURLStorage,
}

/// A configured storage engine as persisted in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageEngineRow {
    pub id: StorageEngineId,
    pub engine_type: EngineType,
    pub display_name: String,
    pub enabled: bool,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub data: serde_json::Value,
}
