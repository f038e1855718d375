use camino::Utf8PathBuf as PathBuf;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::core::storage::{is_rtmp_url, EngineType, LocalFileStorageData, Storage, StorageEngine};

use super::{FieldError, FormErrors};

/// Kept in sync with the `length(max = ..)` rule on `GeneralValues`
pub const DISPLAY_NAME_MAX_LEN: usize = 100;

/// The admin form used to edit a storage engine's settings.
///
/// Every engine gets the general fields; engines with settings of their own
/// have a form variant that adds a `specifics` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum StorageForm {
    Generic,
    LocalFile,
}

/// Raw (possibly sparse) form values as submitted or displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageFormValues {
    pub general: GeneralValues,
    pub specifics: Option<LocalFileValues>,
}

/// Validation rules apply to trimmed values, see [`StorageForm::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneralValues {
    #[validate(
        required(message = "Please enter a value"),
        length(max = 100, message = "Enter a value not more than 100 characters long")
    )]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocalFileValues {
    #[validate(custom(function = "absolute_path"))]
    pub path: Option<String>,
    #[validate(custom(function = "rtmp_url"))]
    pub rtmp_server_uri: Option<String>,
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn absolute_path(path: &str) -> Result<(), ValidationError> {
    if PathBuf::from(path).is_absolute() {
        Ok(())
    } else {
        Err(validation_error("absolute_path", "The path must be absolute"))
    }
}

fn rtmp_url(uri: &str) -> Result<(), ValidationError> {
    if is_rtmp_url(uri) {
        Ok(())
    } else {
        Err(validation_error(
            "rtmp_url",
            "The RTMP server URI must be a valid rtmp:// URL",
        ))
    }
}

/// Form values that passed validation, ready to be written to an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedStorageForm {
    pub display_name: String,
    /// Only set by the local file form
    pub local: Option<LocalFileStorageData>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Copy the messages of `result` into `errors` as `{section}.{field}`, in the
/// order of `fields`.
fn collect_errors(
    section: &str,
    fields: &[&str],
    result: Result<(), ValidationErrors>,
    errors: &mut Vec<FieldError>,
) {
    let Err(validation_errors) = result else {
        return;
    };
    let field_errors = validation_errors.field_errors();
    for field in fields {
        for error in field_errors.get(*field).into_iter().flat_map(|e| e.iter()) {
            let message = error.message.as_deref().unwrap_or(&error.code).to_owned();
            errors.push(FieldError::new(format!("{section}.{field}"), message));
        }
    }
}

impl StorageForm {
    pub fn for_engine_type(engine_type: EngineType) -> StorageForm {
        match engine_type {
            EngineType::LocalFileStorage => StorageForm::LocalFile,
            EngineType::RemoteURLStorage => StorageForm::Generic,
        }
    }

    /// Fill in whatever `value` is missing from the engine's current settings.
    pub fn display(&self, mut value: StorageFormValues, engine: &Storage) -> StorageFormValues {
        let has_name = value
            .general
            .display_name
            .as_deref()
            .is_some_and(|name| !name.is_empty());
        if !has_name {
            value.general.display_name = Some(engine.display_name().to_owned());
        }

        match (self, engine) {
            (StorageForm::LocalFile, Storage::LocalFileStorage(local)) => {
                let settings = local.settings();
                let specifics = value.specifics.get_or_insert_with(Default::default);
                if specifics.path.as_deref().map_or(true, str::is_empty) {
                    specifics.path = settings.path.as_ref().map(|p| p.to_string());
                }
                if specifics.rtmp_server_uri.as_deref().map_or(true, str::is_empty) {
                    specifics.rtmp_server_uri = settings.rtmp_server_uri.clone();
                }
            }
            (StorageForm::LocalFile, _) => {
                value.specifics.get_or_insert_with(Default::default);
            }
            (StorageForm::Generic, _) => {
                value.specifics = None;
            }
        }
        value
    }

    /// Check trimmed `value` against the form's rules. Empty strings count
    /// as missing values.
    pub fn validate(&self, value: &StorageFormValues) -> Result<ValidatedStorageForm, FormErrors> {
        let mut errors = Vec::new();

        let general = GeneralValues {
            display_name: non_empty(value.general.display_name.as_deref()),
        };
        collect_errors("general", &["display_name"], general.validate(), &mut errors);

        let local = match self {
            StorageForm::Generic => None,
            StorageForm::LocalFile => {
                let specifics = value.specifics.clone().unwrap_or_default();
                let specifics = LocalFileValues {
                    path: non_empty(specifics.path.as_deref()),
                    rtmp_server_uri: non_empty(specifics.rtmp_server_uri.as_deref()),
                };
                collect_errors(
                    "specifics",
                    &["path", "rtmp_server_uri"],
                    specifics.validate(),
                    &mut errors,
                );
                Some(LocalFileStorageData {
                    path: specifics.path.map(PathBuf::from),
                    rtmp_server_uri: specifics.rtmp_server_uri,
                })
            }
        };

        match general.display_name {
            Some(display_name) if errors.is_empty() => Ok(ValidatedStorageForm {
                display_name,
                local,
            }),
            _ => Err(FormErrors(errors)),
        }
    }

    /// Write validated values onto the engine. The caller persists it.
    pub fn save_engine_params(&self, engine: &mut Storage, validated: ValidatedStorageForm) {
        engine.set_display_name(validated.display_name);
        if let (Storage::LocalFileStorage(local), Some(data)) = (engine, validated.local) {
            local.set_settings(data);
        }
    }
}
