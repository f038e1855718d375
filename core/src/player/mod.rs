//! Front-end media players the site can render media with.
//!
//! Which players are used, and in which order they are tried, is stored in
//! the `players` table (see [`crate::model::repository::player_prefs`]).
//! Rows are tied to an implementation by name through a [`PlayerRegistry`].

mod registry;

pub use registry::*;

use serde_json::json;

/// The implementation behind a registered player name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
pub enum PlayerKind {
    JWPlayer,
    YoutubeFlash,
    VimeoUniversalEmbed,
    GoogleVideoFlash,
    BlipTVFlash,
    DailyMotionEmbed,
    FlowPlayer,
    Html5,
    Html5PlusFlowPlayer,
    Html5PlusJWPlayer,
    ITunes,
}

impl PlayerKind {
    /// Name the player is registered and persisted under.
    pub fn default_name(&self) -> &'static str {
        match self {
            PlayerKind::JWPlayer => "jwplayer",
            PlayerKind::YoutubeFlash => "youtube",
            PlayerKind::VimeoUniversalEmbed => "vimeo",
            PlayerKind::GoogleVideoFlash => "googlevideo",
            PlayerKind::BlipTVFlash => "bliptv",
            PlayerKind::DailyMotionEmbed => "dailymotion",
            PlayerKind::FlowPlayer => "flowplayer",
            PlayerKind::Html5 => "html5",
            PlayerKind::Html5PlusFlowPlayer => "html5+flowplayer",
            PlayerKind::Html5PlusJWPlayer => "html5+jwplayer",
            PlayerKind::ITunes => "itunes",
        }
    }

    pub fn default_display_name(&self) -> &'static str {
        match self {
            PlayerKind::JWPlayer => "JWPlayer (Flash)",
            PlayerKind::YoutubeFlash => "YouTube Flash Player",
            PlayerKind::VimeoUniversalEmbed => "Vimeo Universal Embed Player",
            PlayerKind::GoogleVideoFlash => "Google Video Flash Player",
            PlayerKind::BlipTVFlash => "Blip.tv Flash Player",
            PlayerKind::DailyMotionEmbed => "Dailymotion Embed Player",
            PlayerKind::FlowPlayer => "Flowplayer (Flash)",
            PlayerKind::Html5 => "Plain HTML5 Player",
            PlayerKind::Html5PlusFlowPlayer => "HTML5 + Flowplayer Fallback",
            PlayerKind::Html5PlusJWPlayer => "HTML5 + JWPlayer Fallback",
            PlayerKind::ITunes => "iTunes Player",
        }
    }

    /// Settings a freshly inserted `players` row starts out with.
    pub fn default_data(&self) -> serde_json::Value {
        match self {
            PlayerKind::Html5PlusFlowPlayer | PlayerKind::Html5PlusJWPlayer => {
                json!({ "prefer_flash": false })
            }
            _ => json!({}),
        }
    }
}

/// A player implementation as known to a [`PlayerRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerClass {
    pub name: String,
    pub display_name: String,
    pub kind: PlayerKind,
    pub default_data: serde_json::Value,
}

impl PlayerClass {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        kind: PlayerKind,
    ) -> PlayerClass {
        PlayerClass {
            name: name.into(),
            display_name: display_name.into(),
            kind,
            default_data: kind.default_data(),
        }
    }
}

impl From<PlayerKind> for PlayerClass {
    fn from(kind: PlayerKind) -> Self {
        PlayerClass::new(kind.default_name(), kind.default_display_name(), kind)
    }
}

/// Players that are added to the table first and, if requested, enabled
/// when they are first inserted. In order of preference.
pub const DEFAULT_PLAYERS: &[&str] = &[
    "jwplayer",
    "youtube",
    "vimeo",
    "googlevideo",
    "bliptv",
    "dailymotion",
];
