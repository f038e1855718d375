use utoipa::OpenApi;

use crate::{routes, schema};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::players::get_players,
        routes::players::get_enabled_players,
        routes::players::cleanup_players,
        routes::players::enable_player,
        routes::players::disable_player,
        routes::players::reorder_player,
        routes::storage::get_storage_engines,
        routes::storage::get_storage_form,
        routes::storage::post_storage_form,
        routes::storage::get_storage_uris,
    ),
    components(schemas(
        schema::PlayerPrefsId,
        schema::StorageEngineId,
        schema::MediaFileId,
        schema::Player,
        schema::EnabledPlayer,
        schema::CleanupResponse,
        schema::StorageEngine,
        schema::StorageFormBody,
        schema::GeneralFields,
        schema::LocalFileFields,
        schema::FieldErrorResponse,
        schema::FormErrorsResponse,
        schema::StorageUri,
    )),
    tags((name = "mediapub"))
)]
pub struct ApiDoc;
