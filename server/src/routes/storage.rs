use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use eyre::Result;
use tracing::{info, Instrument};

use mediapub_core::{
    core::storage::{Storage, StorageContext, StorageEngine as _},
    deadpool_diesel,
    form::storage::StorageFormValues,
    interact,
    model::{self, repository, StorageEngineRow},
};

use crate::{
    app_state::SharedState,
    http_error::{ApiResult, HttpError},
    schema::{self, MediaFileQuery, StorageFormBody, StorageUri},
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_storage_engines))
        .route("/:id/form", get(get_storage_form).post(post_storage_form))
        .route("/:id/uris", get(get_storage_uris))
}

async fn load_engine(
    app_state: &SharedState,
    id: schema::StorageEngineId,
) -> ApiResult<(StorageEngineRow, Storage)> {
    let id: model::StorageEngineId = id
        .try_into()
        .map_err(|err: eyre::Report| HttpError::BadRequest(err.to_string()))?;
    let conn = app_state.pool.get().in_current_span().await?;
    let row = interact!(conn, move |conn| {
        repository::storage_engine::get_storage_engine(conn, id)
    })
    .in_current_span()
    .await??
    .ok_or_else(|| HttpError::not_found(id))?;
    let storage = Storage::from_row(&row, &app_state.storage_ctx)?;
    Ok((row, storage))
}

fn load_all(rows: &[StorageEngineRow], ctx: &StorageContext) -> Result<Vec<schema::StorageEngine>> {
    rows.iter()
        .map(|row| {
            let storage = Storage::from_row(row, ctx)?;
            Ok(schema::StorageEngine::from_model(row, &storage))
        })
        .collect()
}

#[utoipa::path(
    get,
    path = "/api/storage",
    responses((status = 200, body = Vec<schema::StorageEngine>)),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_storage_engines(
    State(app_state): State<SharedState>,
) -> ApiResult<Json<Vec<schema::StorageEngine>>> {
    let conn = app_state.pool.get().in_current_span().await?;
    let rows = interact!(conn, move |conn| {
        repository::storage_engine::get_storage_engines(conn)
    })
    .in_current_span()
    .await??;
    Ok(Json(load_all(&rows, &app_state.storage_ctx)?))
}

/// The settings form of a storage engine, pre-filled with its current values.
#[utoipa::path(
    get,
    path = "/api/storage/{id}/form",
    params(("id" = String, Path, description = "Storage engine id")),
    responses(
        (status = 200, body = StorageFormBody),
        (status = 404, description = "No storage engine with this id"),
    ),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_storage_form(
    State(app_state): State<SharedState>,
    Path(id): Path<schema::StorageEngineId>,
) -> ApiResult<Json<StorageFormBody>> {
    let (_row, storage) = load_engine(&app_state, id).await?;
    let values = storage
        .settings_form()
        .display(StorageFormValues::default(), &storage);
    Ok(Json(values.into()))
}

/// Validate the submitted settings and save them to the storage engine.
#[utoipa::path(
    post,
    path = "/api/storage/{id}/form",
    params(("id" = String, Path, description = "Storage engine id")),
    request_body = StorageFormBody,
    responses(
        (status = 200, body = schema::StorageEngine),
        (status = 400, body = schema::FormErrorsResponse),
        (status = 404, description = "No storage engine with this id"),
    ),
)]
#[tracing::instrument(skip(app_state))]
pub async fn post_storage_form(
    State(app_state): State<SharedState>,
    Path(id): Path<schema::StorageEngineId>,
    Json(body): Json<StorageFormBody>,
) -> ApiResult<Json<schema::StorageEngine>> {
    let (mut row, mut storage) = load_engine(&app_state, id).await?;
    let form = storage.settings_form();
    let validated = form.validate(&body.into())?;
    form.save_engine_params(&mut storage, validated);
    storage.write_to_row(&mut row)?;

    let conn = app_state.pool.get().in_current_span().await?;
    let to_save = row.clone();
    interact!(conn, move |conn| {
        repository::storage_engine::update_storage_engine(conn, &to_save)
    })
    .in_current_span()
    .await??;
    info!(id = %row.id, display_name = %row.display_name, "saved storage engine settings");
    Ok(Json(schema::StorageEngine::from_model(&row, &storage)))
}

/// Every URI a media file stored with this engine can be accessed with.
#[utoipa::path(
    get,
    path = "/api/storage/{id}/uris",
    params(("id" = String, Path, description = "Storage engine id"), MediaFileQuery),
    responses(
        (status = 200, body = Vec<StorageUri>),
        (status = 404, description = "No storage engine with this id"),
    ),
)]
#[tracing::instrument(skip(app_state))]
pub async fn get_storage_uris(
    State(app_state): State<SharedState>,
    Path(id): Path<schema::StorageEngineId>,
    Query(query): Query<MediaFileQuery>,
) -> ApiResult<Json<Vec<StorageUri>>> {
    let (_row, storage) = load_engine(&app_state, id).await?;
    let media_file: model::MediaFile = query.into();
    Ok(Json(
        storage
            .get_uris(&media_file)
            .iter()
            .map(StorageUri::from)
            .collect(),
    ))
}
