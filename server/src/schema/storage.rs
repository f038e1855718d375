use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use mediapub_core::{
    core::storage::{Storage, StorageEngine as _},
    form::{
        storage::{GeneralValues, LocalFileValues, StorageFormValues},
        FormErrors,
    },
    model::{self, StorageEngineRow},
};

use super::{to_camel_case, MediaFileId, StorageEngineId};

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageEngine {
    pub id: StorageEngineId,
    pub engine_type: String,
    pub display_name: String,
    pub enabled: bool,
    /// Which settings form applies, `Generic` or `LocalFile`
    pub form: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
}

impl StorageEngine {
    pub fn from_model(row: &StorageEngineRow, storage: &Storage) -> StorageEngine {
        StorageEngine {
            id: row.id.into(),
            engine_type: row.engine_type.to_string(),
            display_name: storage.display_name().to_owned(),
            enabled: row.enabled,
            form: storage.settings_form().to_string(),
            created_on: row.created_on,
            modified_on: row.modified_on,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageFormBody {
    pub general: GeneralFields,
    pub specifics: Option<LocalFileFields>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralFields {
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalFileFields {
    pub path: Option<String>,
    pub rtmp_server_uri: Option<String>,
}

impl From<StorageFormBody> for StorageFormValues {
    fn from(value: StorageFormBody) -> Self {
        StorageFormValues {
            general: GeneralValues {
                display_name: value.general.display_name,
            },
            specifics: value.specifics.map(|s| LocalFileValues {
                path: s.path,
                rtmp_server_uri: s.rtmp_server_uri,
            }),
        }
    }
}

impl From<StorageFormValues> for StorageFormBody {
    fn from(value: StorageFormValues) -> Self {
        StorageFormBody {
            general: GeneralFields {
                display_name: value.general.display_name,
            },
            specifics: value.specifics.map(|s| LocalFileFields {
                path: s.path,
                rtmp_server_uri: s.rtmp_server_uri,
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrorResponse {
    /// Path of the field in camelCase, like `general.displayName`
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormErrorsResponse {
    pub errors: Vec<FieldErrorResponse>,
}

impl From<&FormErrors> for FormErrorsResponse {
    fn from(value: &FormErrors) -> Self {
        FormErrorsResponse {
            errors: value
                .errors()
                .iter()
                .map(|e| FieldErrorResponse {
                    field: to_camel_case(&e.field),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}

/// The media file to list URIs for. Media files live outside of this
/// service, so the caller describes it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct MediaFileQuery {
    pub file_id: i64,
    pub media_id: i64,
    pub slug: String,
    pub container: String,
    pub unique_id: String,
}

impl From<MediaFileQuery> for model::MediaFile {
    fn from(value: MediaFileQuery) -> Self {
        model::MediaFile {
            id: model::MediaFileId(value.file_id),
            media_id: model::MediaId(value.media_id),
            media_slug: value.slug,
            container: value.container,
            unique_id: value.unique_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageUri {
    pub file: MediaFileId,
    /// One of `http`, `rtmp`, `download`, `file`
    pub scheme: String,
    pub file_uri: String,
    pub server_uri: Option<String>,
}

impl From<&model::StorageURI> for StorageUri {
    fn from(value: &model::StorageURI) -> Self {
        StorageUri {
            file: value.file.into(),
            scheme: value.scheme.to_string(),
            file_uri: value.file_uri.clone(),
            server_uri: value.server_uri.clone(),
        }
    }
}
