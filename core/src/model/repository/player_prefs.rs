use std::collections::HashSet;

use chrono::Utc;
use diesel::prelude::*;
use eyre::{eyre, Context, Result};
use tracing::{info, instrument, warn};

use crate::model::{
    repository::db_entity::DbPlayerPrefs,
    util::{datetime_to_db_repr, json_from_db_repr, json_to_db_repr},
    PlayerPrefs, PlayerPrefsId,
};
use crate::player::{PlayerClass, PlayerRegistry, DEFAULT_PLAYERS};

use super::db::DbConn;
use super::schema;

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlayerPrefs {
    pub name: String,
    pub enabled: bool,
    pub priority: i32,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// What [`cleanup_players_table`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Number of existing rows whose priority was rewritten
    pub renumbered: usize,
    /// Names of the players that were added, in insertion order
    pub inserted: Vec<String>,
}

impl CleanupReport {
    pub fn is_noop(&self) -> bool {
        self.renumbered == 0 && self.inserted.is_empty()
    }
}

#[instrument(skip(conn), level = "trace")]
pub fn insert_player(conn: &mut DbConn, create: &CreatePlayerPrefs) -> Result<PlayerPrefsId> {
    use schema::players;
    let now = datetime_to_db_repr(&Utc::now());
    let id = diesel::insert_into(players::table)
        .values((
            players::name.eq(&create.name),
            players::enabled.eq(create.enabled),
            players::priority.eq(create.priority),
            players::created_on.eq(now),
            players::modified_on.eq(now),
            players::data.eq(json_to_db_repr(&create.data)?),
        ))
        .returning(players::id)
        .get_result(conn)
        .wrap_err("could not insert into table players")?;
    Ok(PlayerPrefsId(id))
}

#[instrument(skip(conn), level = "trace")]
pub fn get_player(conn: &mut DbConn, id: PlayerPrefsId) -> Result<Option<PlayerPrefs>> {
    use schema::players;
    let db_player: Option<DbPlayerPrefs> = players::table
        .find(id.0)
        .select(DbPlayerPrefs::as_select())
        .first(conn)
        .optional()?;
    db_player.map(|p| p.try_into()).transpose()
}

/// All rows, enabled players first, then by ascending priority
/// and most recently added first.
#[instrument(skip(conn), level = "trace")]
pub fn get_players(conn: &mut DbConn) -> Result<Vec<PlayerPrefs>> {
    use schema::players;
    let db_players: Vec<DbPlayerPrefs> = players::table
        .select(DbPlayerPrefs::as_select())
        .order((
            players::enabled.desc(),
            players::priority.asc(),
            players::id.desc(),
        ))
        .load(conn)
        .wrap_err("could not query table players")?;
    db_players
        .into_iter()
        .map(|p| p.try_into())
        .collect::<Result<Vec<_>>>()
}

/// Player classes and their configured data for every enabled row, in
/// ascending priority (newer rows first among equal priorities).
///
/// Rows naming a player that is not in `registry` are skipped with a
/// warning, and so is an empty result.
#[instrument(skip(conn, registry), level = "debug")]
pub fn fetch_enabled_players(
    conn: &mut DbConn,
    registry: &PlayerRegistry,
) -> Result<Vec<(PlayerClass, serde_json::Value)>> {
    use schema::players;
    let rows: Vec<(String, String)> = players::table
        .select((players::name, players::data))
        .filter(players::enabled.eq(true))
        .order((players::priority.asc(), players::id.desc()))
        .load(conn)
        .wrap_err("could not query enabled players")?;
    let mut enabled_players = Vec::with_capacity(rows.len());
    for (name, data) in rows {
        match registry.get(&name) {
            Some(cls) => {
                let data = json_from_db_repr(&data)
                    .wrap_err_with(|| format!("invalid data for player '{}'", name))?;
                enabled_players.push((cls.clone(), data));
            }
            None => {
                warn!(
                    "Player name {:?} exists in the database but has not been registered.",
                    name
                );
            }
        }
    }
    if enabled_players.is_empty() {
        warn!("No registered players are configured in your database.");
    }
    Ok(enabled_players)
}

/// Make sure every registered player has a row and that priorities run
/// 1..n without gaps, keeping the existing relative order.
///
/// Missing players are appended after the existing rows, the ones in
/// [`DEFAULT_PLAYERS`] first. A new row is enabled only if `enabled` is set
/// and the player is one of the defaults.
#[instrument(skip(conn, registry), level = "debug")]
pub fn cleanup_players_table(
    conn: &mut DbConn,
    registry: &PlayerRegistry,
    enabled: bool,
) -> Result<CleanupReport> {
    use schema::players;
    let report = conn
        .transaction(|conn| {
            let existing: Vec<(i64, String, i32)> = players::table
                .select((players::id, players::name, players::priority))
                .order((players::priority.asc(), players::id.asc()))
                .load(conn)?;
            let now = datetime_to_db_repr(&Utc::now());

            let mut report = CleanupReport::default();
            let mut priority: i32 = 0;
            for (row_id, _, row_priority) in &existing {
                priority += 1;
                if *row_priority != priority {
                    diesel::update(players::table.find(*row_id))
                        .set((
                            players::priority.eq(priority),
                            players::modified_on.eq(now),
                        ))
                        .execute(conn)?;
                    report.renumbered += 1;
                }
            }

            let existing_names: HashSet<&str> =
                existing.iter().map(|(_, name, _)| name.as_str()).collect();
            let defaults = DEFAULT_PLAYERS.iter().filter_map(|name| registry.get(name));
            let others = registry
                .players()
                .filter(|cls| !DEFAULT_PLAYERS.contains(&cls.name.as_str()));
            for cls in defaults.chain(others) {
                if existing_names.contains(cls.name.as_str()) {
                    continue;
                }
                let enable_player = enabled && DEFAULT_PLAYERS.contains(&cls.name.as_str());
                priority += 1;
                diesel::insert_into(players::table)
                    .values((
                        players::name.eq(&cls.name),
                        players::enabled.eq(enable_player),
                        players::priority.eq(priority),
                        players::created_on.eq(now),
                        players::modified_on.eq(now),
                        players::data.eq(json_to_db_repr(&cls.default_data)?),
                    ))
                    .execute(conn)?;
                report.inserted.push(cls.name.clone());
            }
            Ok::<_, eyre::Report>(report)
        })
        .wrap_err("error cleaning up table players")?;
    if !report.is_noop() {
        info!(
            renumbered = report.renumbered,
            inserted = ?report.inserted,
            "cleaned up players table"
        );
    }
    Ok(report)
}

#[instrument(skip(conn), level = "debug")]
pub fn set_player_enabled(conn: &mut DbConn, id: PlayerPrefsId, enabled: bool) -> Result<()> {
    use schema::players;
    let now = datetime_to_db_repr(&Utc::now());
    let updated = diesel::update(players::table.find(id.0))
        .set((players::enabled.eq(enabled), players::modified_on.eq(now)))
        .execute(conn)?;
    if updated == 0 {
        return Err(eyre!("no player with id {}", id));
    }
    Ok(())
}

#[instrument(skip(conn, data), level = "debug")]
pub fn update_player_data(
    conn: &mut DbConn,
    id: PlayerPrefsId,
    data: &serde_json::Value,
) -> Result<()> {
    use schema::players;
    let now = datetime_to_db_repr(&Utc::now());
    let updated = diesel::update(players::table.find(id.0))
        .set((
            players::data.eq(json_to_db_repr(data)?),
            players::modified_on.eq(now),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(eyre!("no player with id {}", id));
    }
    Ok(())
}

/// Move a player one place up or down in the preference order.
/// Priorities of all rows are rewritten to 1..n in the new order.
/// Returns false if the player already is first/last.
#[instrument(skip(conn), level = "debug")]
pub fn reorder_player(
    conn: &mut DbConn,
    id: PlayerPrefsId,
    direction: ReorderDirection,
) -> Result<bool> {
    use schema::players;
    conn.transaction(|conn| {
        let mut ordered: Vec<(i64, i32)> = players::table
            .select((players::id, players::priority))
            .order((players::priority.asc(), players::id.desc()))
            .load(conn)?;
        let idx = ordered
            .iter()
            .position(|(row_id, _)| *row_id == id.0)
            .ok_or_else(|| eyre!("no player with id {}", id))?;
        let swap_with = match direction {
            ReorderDirection::Up if idx > 0 => idx - 1,
            ReorderDirection::Down if idx + 1 < ordered.len() => idx + 1,
            _ => return Ok(false),
        };
        ordered.swap(idx, swap_with);
        let now = datetime_to_db_repr(&Utc::now());
        for (new_priority, (row_id, old_priority)) in (1..).zip(ordered.iter()) {
            if *old_priority != new_priority {
                diesel::update(players::table.find(*row_id))
                    .set((
                        players::priority.eq(new_priority),
                        players::modified_on.eq(now),
                    ))
                    .execute(conn)?;
            }
        }
        Ok::<_, eyre::Report>(true)
    })
}
