use diesel::{Queryable, Selectable};

use crate::model::{
    util::{datetime_from_db_repr, json_from_db_repr},
    PlayerPrefs, PlayerPrefsId,
};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = super::super::schema::players)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbPlayerPrefs {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
    pub priority: i32,
    pub created_on: i64,
    pub modified_on: i64,
    pub data: String,
}

impl TryFrom<DbPlayerPrefs> for PlayerPrefs {
    type Error = eyre::Report;

    fn try_from(value: DbPlayerPrefs) -> Result<Self, Self::Error> {
        Ok(PlayerPrefs {
            id: PlayerPrefsId(value.id),
            name: value.name,
            enabled: value.enabled,
            priority: value.priority,
            created_on: datetime_from_db_repr(value.created_on)?,
            modified_on: datetime_from_db_repr(value.modified_on)?,
            data: json_from_db_repr(&value.data)?,
        })
    }
}
