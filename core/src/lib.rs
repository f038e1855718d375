pub mod config;
pub mod core;
pub mod form;
pub mod model;
pub mod player;
pub use deadpool_diesel;
pub mod util;
