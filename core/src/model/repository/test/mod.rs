use super::db;

pub mod player_prefs;
pub mod storage_engine;
pub mod util;
