use std::str::FromStr;

use diesel::{Queryable, Selectable};
use eyre::eyre;

use crate::model::{
    util::{datetime_from_db_repr, json_from_db_repr},
    EngineType, StorageEngineId, StorageEngineRow,
};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = super::super::schema::storage)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbStorageEngine {
    pub id: i64,
    pub engine_type: String,
    pub display_name: String,
    pub enabled: bool,
    pub created_on: i64,
    pub modified_on: i64,
    pub data: String,
}

impl TryFrom<DbStorageEngine> for StorageEngineRow {
    type Error = eyre::Report;

    fn try_from(value: DbStorageEngine) -> Result<Self, Self::Error> {
        let engine_type = EngineType::from_str(&value.engine_type)
            .map_err(|_| eyre!("unknown storage engine type '{}'", value.engine_type))?;
        Ok(StorageEngineRow {
            id: StorageEngineId(value.id),
            engine_type,
            display_name: value.display_name,
            enabled: value.enabled,
            created_on: datetime_from_db_repr(value.created_on)?,
            modified_on: datetime_from_db_repr(value.modified_on)?,
            data: json_from_db_repr(&value.data)?,
        })
    }
}
