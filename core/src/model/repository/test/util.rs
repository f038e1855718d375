use std::{
    io,
    sync::{Arc, Mutex},
};

use claims::assert_ok;

use crate::model::{
    repository::{
        self,
        db::DbConn,
        player_prefs::CreatePlayerPrefs,
    },
    PlayerPrefs, PlayerPrefsId,
};

pub fn insert_test_player(
    conn: &mut DbConn,
    name: &str,
    enabled: bool,
    priority: i32,
) -> PlayerPrefsId {
    assert_ok!(repository::player_prefs::insert_player(
        conn,
        &CreatePlayerPrefs {
            name: name.to_owned(),
            enabled,
            priority,
            data: serde_json::json!({}),
        }
    ))
}

/// All rows in priority order, oldest first among equal priorities
pub fn players_by_priority(conn: &mut DbConn) -> Vec<PlayerPrefs> {
    let mut players = assert_ok!(repository::player_prefs::get_players(conn));
    players.sort_by_key(|p| (p.priority, p.id));
    players
}

/// Log output collected by [`with_captured_logs`].
#[derive(Debug, Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a thread-local subscriber that records warnings and errors.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs)
}
