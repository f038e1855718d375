use chrono::Utc;
use diesel::prelude::*;
use eyre::{eyre, Context, Result};
use tracing::instrument;

use crate::model::{
    repository::db_entity::DbStorageEngine,
    util::{datetime_to_db_repr, json_to_db_repr},
    EngineType, StorageEngineId, StorageEngineRow,
};

use super::db::DbConn;
use super::schema;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateStorageEngine {
    pub engine_type: EngineType,
    pub display_name: String,
    pub enabled: bool,
    pub data: serde_json::Value,
}

#[instrument(skip(conn), level = "trace")]
pub fn insert_storage_engine(
    conn: &mut DbConn,
    create: &CreateStorageEngine,
) -> Result<StorageEngineId> {
    use schema::storage;
    let now = datetime_to_db_repr(&Utc::now());
    let id = diesel::insert_into(storage::table)
        .values((
            storage::engine_type.eq(create.engine_type.to_string()),
            storage::display_name.eq(&create.display_name),
            storage::enabled.eq(create.enabled),
            storage::created_on.eq(now),
            storage::modified_on.eq(now),
            storage::data.eq(json_to_db_repr(&create.data)?),
        ))
        .returning(storage::id)
        .get_result(conn)
        .wrap_err("could not insert into table storage")?;
    Ok(StorageEngineId(id))
}

#[instrument(skip(conn), level = "trace")]
pub fn get_storage_engine(
    conn: &mut DbConn,
    id: StorageEngineId,
) -> Result<Option<StorageEngineRow>> {
    use schema::storage;
    let db_engine: Option<DbStorageEngine> = storage::table
        .find(id.0)
        .select(DbStorageEngine::as_select())
        .first(conn)
        .optional()?;
    db_engine.map(|e| e.try_into()).transpose()
}

#[instrument(skip(conn), level = "trace")]
pub fn get_storage_engines(conn: &mut DbConn) -> Result<Vec<StorageEngineRow>> {
    use schema::storage;
    let db_engines: Vec<DbStorageEngine> = storage::table
        .select(DbStorageEngine::as_select())
        .order(storage::id.asc())
        .load(conn)
        .wrap_err("could not query table storage")?;
    db_engines
        .into_iter()
        .map(|e| e.try_into())
        .collect::<Result<Vec<_>>>()
}

#[instrument(skip(conn), level = "trace")]
pub fn get_storage_engines_by_type(
    conn: &mut DbConn,
    engine_type: EngineType,
) -> Result<Vec<StorageEngineRow>> {
    use schema::storage;
    let db_engines: Vec<DbStorageEngine> = storage::table
        .select(DbStorageEngine::as_select())
        .filter(storage::engine_type.eq(engine_type.to_string()))
        .order(storage::id.asc())
        .load(conn)
        .wrap_err("could not query table storage")?;
    db_engines
        .into_iter()
        .map(|e| e.try_into())
        .collect::<Result<Vec<_>>>()
}

/// Write back display name, enabled flag and data of an engine row.
#[instrument(skip(conn), level = "debug")]
pub fn update_storage_engine(conn: &mut DbConn, row: &StorageEngineRow) -> Result<()> {
    use schema::storage;
    let now = datetime_to_db_repr(&Utc::now());
    let updated = diesel::update(storage::table.find(row.id.0))
        .set((
            storage::display_name.eq(&row.display_name),
            storage::enabled.eq(row.enabled),
            storage::data.eq(json_to_db_repr(&row.data)?),
            storage::modified_on.eq(now),
        ))
        .execute(conn)
        .wrap_err("could not update table storage")?;
    if updated == 0 {
        return Err(eyre!("no storage engine with id {}", row.id));
    }
    Ok(())
}
