use claims::{assert_err, assert_ok, assert_some};
use diesel::prelude::*;
use pretty_assertions::assert_eq;

use crate::model::{
    repository::{self, storage_engine::CreateStorageEngine},
    EngineType, StorageEngineId,
};

fn local_engine() -> CreateStorageEngine {
    CreateStorageEngine {
        engine_type: EngineType::LocalFileStorage,
        display_name: "Local File Storage".to_owned(),
        enabled: true,
        data: serde_json::json!({ "path": null, "rtmp_server_uri": null }),
    }
}

#[test]
fn insert_retrieve() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let create = local_engine();
    let id = assert_ok!(repository::storage_engine::insert_storage_engine(
        &mut conn, &create
    ));
    let row = assert_some!(assert_ok!(
        repository::storage_engine::get_storage_engine(&mut conn, id)
    ));
    assert_eq!(row.id, id);
    assert_eq!(row.engine_type, EngineType::LocalFileStorage);
    assert_eq!(row.display_name, create.display_name);
    assert!(row.enabled);
    assert_eq!(row.data, create.data);
    assert_eq!(
        assert_ok!(repository::storage_engine::get_storage_engine(
            &mut conn,
            StorageEngineId(id.0 + 1)
        )),
        None
    );
}

#[test]
fn get_all_and_by_type() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let local = assert_ok!(repository::storage_engine::insert_storage_engine(
        &mut conn,
        &local_engine()
    ));
    let remote = assert_ok!(repository::storage_engine::insert_storage_engine(
        &mut conn,
        &CreateStorageEngine {
            engine_type: EngineType::RemoteURLStorage,
            display_name: "Remote URLs".to_owned(),
            enabled: true,
            data: serde_json::json!({}),
        }
    ));
    let all = assert_ok!(repository::storage_engine::get_storage_engines(&mut conn));
    assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![local, remote]);
    let remotes = assert_ok!(repository::storage_engine::get_storage_engines_by_type(
        &mut conn,
        EngineType::RemoteURLStorage
    ));
    assert_eq!(remotes.len(), 1);
    assert_eq!(remotes[0].id, remote);
}

#[test]
fn update_writes_back_display_name_and_data() {
    let mut conn = super::db::open_in_memory_and_migrate();
    let id = assert_ok!(repository::storage_engine::insert_storage_engine(
        &mut conn,
        &local_engine()
    ));
    let mut row = assert_some!(assert_ok!(
        repository::storage_engine::get_storage_engine(&mut conn, id)
    ));
    row.display_name = "Disk".to_owned();
    row.enabled = false;
    row.data = serde_json::json!({ "path": "/srv/media", "rtmp_server_uri": null });
    assert_ok!(repository::storage_engine::update_storage_engine(
        &mut conn, &row
    ));
    let updated = assert_some!(assert_ok!(
        repository::storage_engine::get_storage_engine(&mut conn, id)
    ));
    assert_eq!(updated.display_name, "Disk");
    assert!(!updated.enabled);
    assert_eq!(updated.data, row.data);
    assert_eq!(updated.created_on, row.created_on);

    row.id = StorageEngineId(id.0 + 10);
    assert_err!(repository::storage_engine::update_storage_engine(
        &mut conn, &row
    ));
}

#[test]
fn unknown_engine_type_in_db_is_an_error() {
    let mut conn = super::db::open_in_memory_and_migrate();
    assert_ok!(diesel::sql_query(
        "INSERT INTO storage(engine_type, display_name, enabled, created_on, modified_on, data) \
         VALUES ('FtpStorage', 'FTP', 1, 0, 0, '{}')"
    )
    .execute(&mut conn));
    assert_err!(repository::storage_engine::get_storage_engines(&mut conn));
}
