use camino::Utf8Path as Path;
use eyre::{Context, Result};
use tracing::{info, Instrument};

use mediapub_core::{
    config::{Config, StorageEngineConfig},
    core::storage::{
        EngineType, LocalFileStorage, LocalFileStorageData, Storage, StorageContext,
        StorageEngine as _,
    },
    deadpool_diesel, interact,
    model::repository::{
        self,
        db::{self, DbPool},
        player_prefs::CleanupReport,
        storage_engine::CreateStorageEngine,
    },
    player::PlayerRegistry,
};

pub const DB_FILE_NAME: &str = "mediapub.db";

pub async fn db_setup(dir: &Path) -> Result<DbPool> {
    tokio::fs::create_dir_all(dir)
        .await
        .wrap_err_with(|| format!("could not create data directory {}", dir))?;
    let db_url = dir.join(DB_FILE_NAME).to_string();
    let pool = db::open_db_pool(&db_url)?;
    let conn = pool.get().await?;
    interact!(conn, db::migrate).await??;
    Ok(pool)
}

fn engine_from_config(engine_config: &StorageEngineConfig, ctx: &StorageContext) -> Storage {
    let mut storage = match engine_config.engine_type {
        EngineType::LocalFileStorage => LocalFileStorage::new(
            ctx,
            None,
            LocalFileStorageData {
                path: engine_config.path.clone(),
                rtmp_server_uri: engine_config.rtmp_server_uri.clone(),
            },
        )
        .into(),
        other => Storage::new(other, ctx),
    };
    if let Some(display_name) = &engine_config.display_name {
        storage.set_display_name(display_name.clone());
    }
    storage
}

/// Insert the storage engines listed in the config file that are not in the
/// database yet. An engine counts as present if a row of the same type (and
/// display name, if one is configured) exists.
///
/// Without any configured engines a default LocalFileStorage is ensured.
#[tracing::instrument(skip(config, pool))]
pub async fn store_storage_engines_from_config(config: &Config, pool: &DbPool) -> Result<()> {
    let ctx = StorageContext::from(config);
    let wanted: Vec<StorageEngineConfig> = if config.storage_engines.is_empty() {
        vec![StorageEngineConfig {
            engine_type: EngineType::LocalFileStorage,
            display_name: None,
            path: None,
            rtmp_server_uri: None,
        }]
    } else {
        config.storage_engines.clone()
    };

    let conn = pool.get().in_current_span().await?;
    for engine_config in wanted {
        let engine_type = engine_config.engine_type;
        let existing = interact!(conn, move |conn| {
            repository::storage_engine::get_storage_engines_by_type(conn, engine_type)
        })
        .await?
        .wrap_err("error checking for existing storage engines")?;
        let already_stored = match &engine_config.display_name {
            Some(name) => existing.iter().any(|row| &row.display_name == name),
            None => !existing.is_empty(),
        };
        if already_stored {
            continue;
        }

        let storage = engine_from_config(&engine_config, &ctx);
        let create = CreateStorageEngine {
            engine_type,
            display_name: storage.display_name().to_owned(),
            enabled: true,
            data: storage.data()?,
        };
        let id = interact!(conn, move |conn| {
            repository::storage_engine::insert_storage_engine(conn, &create)
        })
        .await??;
        info!(%id, %engine_type, display_name = storage.display_name(), "added storage engine from config");
    }
    Ok(())
}

/// Bring the players table in line with the registered players.
#[tracing::instrument(skip(pool, registry))]
pub async fn reconcile_players(
    pool: &DbPool,
    registry: PlayerRegistry,
    enable_defaults: bool,
) -> Result<(PlayerRegistry, CleanupReport)> {
    let conn = pool.get().in_current_span().await?;
    let (registry, report) = interact!(conn, move |conn| {
        let report =
            repository::player_prefs::cleanup_players_table(conn, &registry, enable_defaults)?;
        Ok((registry, report))
    })
    .in_current_span()
    .await??;
    Ok((registry, report))
}
