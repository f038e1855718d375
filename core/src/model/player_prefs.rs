use chrono::{DateTime, Utc};

use crate::player::{PlayerClass, PlayerRegistry};

use super::PlayerPrefsId;

/// The administrator's preferences for one player implementation.
/// Rows are matched to a registered [`PlayerClass`] by `name`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerPrefs {
    pub id: PlayerPrefsId,
    pub name: String,
    pub enabled: bool,
    /// Order of preference, ascending
    pub priority: i32,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    /// Passed to the player implementation when it is rendered
    pub data: serde_json::Value,
}

impl PlayerPrefs {
    pub fn player_cls<'r>(&self, registry: &'r PlayerRegistry) -> Option<&'r PlayerClass> {
        registry.get(&self.name)
    }

    pub fn display_name(&self, registry: &PlayerRegistry) -> String {
        match self.player_cls(registry) {
            Some(cls) => cls.display_name.clone(),
            None => format!("(unregistered {})", self.name),
        }
    }
}
