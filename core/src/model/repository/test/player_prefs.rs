use std::collections::HashSet;

use claims::{assert_err, assert_ok, assert_some};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::util::{insert_test_player, players_by_priority, with_captured_logs};
use crate::{
    model::{
        repository::{
            self,
            player_prefs::{CreatePlayerPrefs, ReorderDirection},
        },
        PlayerPrefsId,
    },
    player::{PlayerKind, PlayerRegistry, DEFAULT_PLAYERS},
};

#[test]
fn insert_retrieve() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let create = CreatePlayerPrefs {
        name: "html5+jwplayer".to_owned(),
        enabled: false,
        priority: 4,
        data: serde_json::json!({ "prefer_flash": true }),
    };
    let id = assert_ok!(repository::player_prefs::insert_player(&mut conn, &create));
    let retrieved = assert_some!(assert_ok!(repository::player_prefs::get_player(
        &mut conn, id
    )));
    assert_eq!(retrieved.id, id);
    assert_eq!(retrieved.name, create.name);
    assert_eq!(retrieved.enabled, create.enabled);
    assert_eq!(retrieved.priority, create.priority);
    assert_eq!(retrieved.data, create.data);
    assert_eq!(retrieved.created_on, retrieved.modified_on);
    assert_eq!(
        assert_ok!(repository::player_prefs::get_player(
            &mut conn,
            PlayerPrefsId(id.0 + 1)
        )),
        None
    );
}

#[test]
fn get_players_lists_enabled_first() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let disabled = insert_test_player(&mut conn, "flowplayer", false, 1);
    let enabled_late = insert_test_player(&mut conn, "jwplayer", true, 2);
    let enabled_early = insert_test_player(&mut conn, "youtube", true, 1);
    let players = assert_ok!(repository::player_prefs::get_players(&mut conn));
    let ids: Vec<PlayerPrefsId> = players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![enabled_early, enabled_late, disabled]);
}

#[test]
fn fetch_enabled_players_orders_by_priority_then_newest() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    insert_test_player(&mut conn, "jwplayer", true, 2);
    insert_test_player(&mut conn, "youtube", true, 1);
    insert_test_player(&mut conn, "vimeo", true, 1);
    insert_test_player(&mut conn, "html5", false, 0);
    let enabled = assert_ok!(repository::player_prefs::fetch_enabled_players(
        &mut conn, &registry
    ));
    let names: Vec<&str> = enabled.iter().map(|(cls, _)| cls.name.as_str()).collect();
    assert_eq!(names, vec!["vimeo", "youtube", "jwplayer"]);
}

#[test]
fn fetch_enabled_players_skips_unregistered_names() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    insert_test_player(&mut conn, "realplayer", true, 1);
    let jw_id = insert_test_player(&mut conn, "jwplayer", true, 2);
    let data = serde_json::json!({ "skin": "glow" });
    assert_ok!(repository::player_prefs::update_player_data(
        &mut conn, jw_id, &data
    ));
    let (enabled, logs) = with_captured_logs(|| {
        repository::player_prefs::fetch_enabled_players(&mut conn, &registry)
    });
    let enabled = assert_ok!(enabled);
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].0.kind, PlayerKind::JWPlayer);
    assert_eq!(enabled[0].1, data);
    let logs = logs.contents();
    assert!(logs.contains("WARN"), "{logs}");
    assert!(
        logs.contains(r#"Player name "realplayer" exists in the database but has not been registered."#),
        "{logs}"
    );
    assert!(!logs.contains("No registered players"), "{logs}");
}

#[test]
fn fetch_enabled_players_without_resolvable_rows_is_empty() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    let (enabled, logs) = with_captured_logs(|| {
        repository::player_prefs::fetch_enabled_players(&mut conn, &registry)
    });
    assert!(assert_ok!(enabled).is_empty());
    let logs = logs.contents();
    assert!(
        logs.contains("No registered players are configured in your database."),
        "{logs}"
    );
    assert!(!logs.contains("has not been registered"), "{logs}");

    insert_test_player(&mut conn, "realplayer", true, 1);
    insert_test_player(&mut conn, "jwplayer", false, 2);
    let (enabled, logs) = with_captured_logs(|| {
        repository::player_prefs::fetch_enabled_players(&mut conn, &registry)
    });
    assert!(assert_ok!(enabled).is_empty());
    let logs = logs.contents();
    assert!(logs.contains("\"realplayer\" exists in the database"), "{logs}");
    assert!(
        logs.contains("No registered players are configured in your database."),
        "{logs}"
    );
}

#[test]
fn cleanup_fills_empty_table() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    let report = assert_ok!(repository::player_prefs::cleanup_players_table(
        &mut conn, &registry, true
    ));
    assert_eq!(report.renumbered, 0);
    assert_eq!(report.inserted.len(), registry.len());
    assert_eq!(&report.inserted[..DEFAULT_PLAYERS.len()], DEFAULT_PLAYERS);

    let players = players_by_priority(&mut conn);
    let priorities: Vec<i32> = players.iter().map(|p| p.priority).collect();
    assert_eq!(priorities, (1..=registry.len() as i32).collect::<Vec<_>>());
    for player in &players {
        assert_eq!(
            player.enabled,
            DEFAULT_PLAYERS.contains(&player.name.as_str()),
            "{}",
            player.name
        );
        let cls = assert_some!(player.player_cls(&registry));
        assert_eq!(player.data, cls.default_data);
    }
}

#[test]
fn cleanup_does_not_enable_unless_asked() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    assert_ok!(repository::player_prefs::cleanup_players_table(
        &mut conn, &registry, false
    ));
    let players = players_by_priority(&mut conn);
    assert_eq!(players.len(), registry.len());
    assert!(players.iter().all(|p| !p.enabled));
}

#[test]
fn cleanup_renumbers_and_keeps_unregistered_rows() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::builder()
        .register(PlayerKind::JWPlayer)
        .register(PlayerKind::Html5)
        .register(PlayerKind::ITunes)
        .build();
    let realplayer = insert_test_player(&mut conn, "realplayer", true, 10);
    let jwplayer = insert_test_player(&mut conn, "jwplayer", true, 3);
    let html5 = insert_test_player(&mut conn, "html5", false, 3);
    let report = assert_ok!(repository::player_prefs::cleanup_players_table(
        &mut conn, &registry, true
    ));
    assert_eq!(report.renumbered, 3);
    assert_eq!(report.inserted, vec!["itunes".to_owned()]);
    let players = players_by_priority(&mut conn);
    let order: Vec<(String, i32, bool)> = players
        .iter()
        .map(|p| (p.name.clone(), p.priority, p.enabled))
        .collect();
    assert_eq!(
        order,
        vec![
            ("jwplayer".to_owned(), 1, true),
            ("html5".to_owned(), 2, false),
            ("realplayer".to_owned(), 3, true),
            // not a default player, so not enabled
            ("itunes".to_owned(), 4, false),
        ]
    );
    assert_eq!(players[0].id, jwplayer);
    assert_eq!(players[1].id, html5);
    assert_eq!(players[2].id, realplayer);
}

#[test]
fn display_name_falls_back_for_unregistered() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    let id = insert_test_player(&mut conn, "realplayer", true, 1);
    let player = assert_some!(assert_ok!(repository::player_prefs::get_player(
        &mut conn, id
    )));
    assert!(player.player_cls(&registry).is_none());
    assert_eq!(player.display_name(&registry), "(unregistered realplayer)");

    let id = insert_test_player(&mut conn, "vimeo", true, 2);
    let player = assert_some!(assert_ok!(repository::player_prefs::get_player(
        &mut conn, id
    )));
    assert_eq!(
        player.display_name(&registry),
        PlayerKind::VimeoUniversalEmbed.default_display_name()
    );
}

#[test]
fn enable_disable() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let registry = PlayerRegistry::with_builtin_players();
    let id = insert_test_player(&mut conn, "html5", false, 1);
    assert_ok!(repository::player_prefs::set_player_enabled(
        &mut conn, id, true
    ));
    let enabled = assert_ok!(repository::player_prefs::fetch_enabled_players(
        &mut conn, &registry
    ));
    assert_eq!(enabled.len(), 1);
    assert_ok!(repository::player_prefs::set_player_enabled(
        &mut conn, id, false
    ));
    let enabled = assert_ok!(repository::player_prefs::fetch_enabled_players(
        &mut conn, &registry
    ));
    assert!(enabled.is_empty());
    assert_err!(repository::player_prefs::set_player_enabled(
        &mut conn,
        PlayerPrefsId(id.0 + 100),
        true
    ));
}

#[test]
fn reorder_moves_one_place() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let a = insert_test_player(&mut conn, "jwplayer", true, 1);
    let b = insert_test_player(&mut conn, "youtube", true, 2);
    let c = insert_test_player(&mut conn, "vimeo", false, 3);

    let moved = assert_ok!(repository::player_prefs::reorder_player(
        &mut conn,
        c,
        ReorderDirection::Up
    ));
    assert!(moved);
    let ids: Vec<PlayerPrefsId> = players_by_priority(&mut conn).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![a, c, b]);

    let moved = assert_ok!(repository::player_prefs::reorder_player(
        &mut conn,
        a,
        ReorderDirection::Up
    ));
    assert!(!moved);

    let moved = assert_ok!(repository::player_prefs::reorder_player(
        &mut conn,
        a,
        ReorderDirection::Down
    ));
    assert!(moved);
    let players = players_by_priority(&mut conn);
    let ids: Vec<PlayerPrefsId> = players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![c, a, b]);
    let priorities: Vec<i32> = players.iter().map(|p| p.priority).collect();
    assert_eq!(priorities, vec![1, 2, 3]);

    let moved = assert_ok!(repository::player_prefs::reorder_player(
        &mut conn,
        b,
        ReorderDirection::Down
    ));
    assert!(!moved);
    assert_err!(repository::player_prefs::reorder_player(
        &mut conn,
        PlayerPrefsId(c.0 + 100),
        ReorderDirection::Down
    ));
}

const NAME_POOL: &[&str] = &[
    "jwplayer",
    "youtube",
    "html5",
    "itunes",
    "flowplayer",
    "realplayer",
    "quicktime",
];

fn arb_existing_rows() -> impl Strategy<Value = Vec<(&'static str, bool, i32)>> {
    prop::collection::vec(
        (prop::sample::select(NAME_POOL), any::<bool>(), -3i32..12),
        0..8,
    )
}

proptest! {
    #[test]
    fn prop_cleanup_priorities_dense_and_idempotent(
        rows in arb_existing_rows(),
        enabled in any::<bool>(),
    ) {
        let mut conn = super::db::open_in_memory_and_migrate();
        let registry = PlayerRegistry::with_builtin_players();
        let mut existing: Vec<(i32, PlayerPrefsId)> = Vec::new();
        for (name, row_enabled, priority) in &rows {
            let id = insert_test_player(&mut conn, name, *row_enabled, *priority);
            existing.push((*priority, id));
        }
        existing.sort();
        let expected_existing_order: Vec<PlayerPrefsId> =
            existing.iter().map(|(_, id)| *id).collect();

        let report = repository::player_prefs::cleanup_players_table(&mut conn, &registry, enabled);
        prop_assert!(report.is_ok(), "cleanup failed: {:?}", report.unwrap_err());

        let players = players_by_priority(&mut conn);
        let priorities: Vec<i32> = players.iter().map(|p| p.priority).collect();
        prop_assert_eq!(priorities, (1..=players.len() as i32).collect::<Vec<_>>());
        let leading_ids: Vec<PlayerPrefsId> = players
            .iter()
            .take(expected_existing_order.len())
            .map(|p| p.id)
            .collect();
        prop_assert_eq!(leading_ids, expected_existing_order);
        let names: HashSet<&str> = players.iter().map(|p| p.name.as_str()).collect();
        for cls in registry.players() {
            prop_assert!(names.contains(cls.name.as_str()));
        }

        let second = repository::player_prefs::cleanup_players_table(&mut conn, &registry, enabled);
        prop_assert!(second.is_ok());
        prop_assert!(second.unwrap().is_noop());
        prop_assert_eq!(players_by_priority(&mut conn), players);
    }
}
