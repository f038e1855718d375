use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use mediapub_core::{
    model::{self, repository::player_prefs::CleanupReport},
    player::{PlayerClass, PlayerRegistry},
};

use super::PlayerPrefsId;

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerPrefsId,
    pub name: String,
    pub display_name: String,
    /// False if no player implementation with this name exists
    pub registered: bool,
    pub enabled: bool,
    pub priority: i32,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl Player {
    pub fn from_model(value: &model::PlayerPrefs, registry: &PlayerRegistry) -> Player {
        Player {
            id: value.id.into(),
            name: value.name.clone(),
            display_name: value.display_name(registry),
            registered: value.player_cls(registry).is_some(),
            enabled: value.enabled,
            priority: value.priority,
            data: value.data.clone(),
            created_on: value.created_on,
            modified_on: value.modified_on,
        }
    }
}

/// A player the front end should try, in order of preference.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnabledPlayer {
    pub name: String,
    pub display_name: String,
    pub kind: String,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl EnabledPlayer {
    pub fn from_model(cls: &PlayerClass, data: serde_json::Value) -> EnabledPlayer {
        EnabledPlayer {
            name: cls.name.clone(),
            display_name: cls.display_name.clone(),
            kind: cls.kind.to_string(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub renumbered: usize,
    pub inserted: Vec<String>,
}

impl From<CleanupReport> for CleanupResponse {
    fn from(value: CleanupReport) -> Self {
        CleanupResponse {
            renumbered: value.renumbered,
            inserted: value.inserted,
        }
    }
}
