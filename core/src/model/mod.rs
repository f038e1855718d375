pub mod repository;

mod id_types;
mod media_file;
mod player_prefs;
mod storage_engine;
mod storage_uri;
pub use id_types::*;
pub use media_file::*;
pub use player_prefs::*;
pub use storage_engine::*;
pub use storage_uri::*;

pub(crate) mod util;
