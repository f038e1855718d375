mod player_prefs;
mod storage_engine;

pub use player_prefs::*;
pub use storage_engine::*;
