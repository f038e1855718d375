use async_trait::async_trait;
use camino::Utf8PathBuf as PathBuf;
use enum_dispatch::enum_dispatch;
use eyre::{Context, Result};
use tokio::io::AsyncRead;

use crate::{
    config::Config,
    form::storage::StorageForm,
    model::{MediaFile, StorageEngineRow, StorageURI},
};

mod duration;
mod file_name;
mod local;
mod media_url;
mod remote;

pub use crate::model::EngineType;
pub use duration::parse_duration;
pub use file_name::safe_file_name;
pub use local::{LocalFileStorage, LocalFileStorageData};
pub use media_url::is_rtmp_url;
pub use remote::RemoteURLStorage;

/// A backend that keeps uploaded media files somewhere and knows how they
/// can be accessed again.
///
/// `store` hands back a unique id which is saved with the media file and
/// passed to `delete` and (as [`MediaFile::unique_id`]) to `get_uris` later.
#[async_trait]
#[enum_dispatch(Storage)]
pub trait StorageEngine {
    fn engine_type(&self) -> EngineType;

    /// Name used when no display name was configured
    fn default_name(&self) -> &'static str;

    fn display_name(&self) -> &str;

    fn set_display_name(&mut self, display_name: String);

    /// The engine's settings, as persisted in `storage.data`
    fn data(&self) -> Result<serde_json::Value>;

    fn settings_form(&self) -> StorageForm;

    /// Store the given file or URL and return a unique identifier for it,
    /// or None if the engine doesn't generate one. Metadata gathered while
    /// storing (like the duration) is written to `meta`.
    async fn store(
        &self,
        media_file: &MediaFile,
        file: Option<UploadedFile>,
        url: Option<&str>,
        meta: &mut FileMeta,
    ) -> Result<Option<String>>;

    /// Delete the stored file with the given unique id.
    /// Returns false if that did not work out.
    async fn delete(&self, unique_id: &str) -> bool;

    /// Every way the stored file can be accessed, most preferred first.
    fn get_uris(&self, media_file: &MediaFile) -> Vec<StorageURI>;
}

#[enum_dispatch]
pub enum Storage {
    LocalFileStorage,
    RemoteURLStorage,
}

impl Clone for Storage {
    fn clone(&self) -> Self {
        match self {
            Self::LocalFileStorage(a) => Self::LocalFileStorage(a.clone()),
            Self::RemoteURLStorage(a) => Self::RemoteURLStorage(a.clone()),
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalFileStorage(a) => std::fmt::Debug::fmt(a, f),
            Self::RemoteURLStorage(a) => std::fmt::Debug::fmt(a, f),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("{0} can only store uploaded files")]
    MissingFile(EngineType),
    #[error("{0} can only store URLs")]
    MissingUrl(EngineType),
    #[error("URL '{0}' is not supported")]
    UnsupportedUrl(String),
    #[error("invalid settings for {engine_type}")]
    InvalidData {
        engine_type: EngineType,
        #[source]
        source: serde_json::Error,
    },
}

/// An upload as received from the client.
pub struct UploadedFile {
    /// File name the client sent, used as a hint for the extension
    pub filename: Option<String>,
    pub reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMeta {
    /// Whole seconds, 0 if the file was not recognized
    pub duration: Option<u64>,
}

/// Application wide settings the engines fall back to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageContext {
    pub base_url: String,
    pub media_dir: PathBuf,
    pub deleted_files_dir: Option<PathBuf>,
}

impl From<&Config> for StorageContext {
    fn from(config: &Config) -> Self {
        StorageContext {
            base_url: config.base_url.clone(),
            media_dir: config.media.media_dir.clone(),
            deleted_files_dir: config.media.deleted_files_dir.clone(),
        }
    }
}

impl Storage {
    /// A freshly configured engine of the given type.
    pub fn new(engine_type: EngineType, ctx: &StorageContext) -> Storage {
        match engine_type {
            EngineType::LocalFileStorage => {
                LocalFileStorage::new(ctx, None, LocalFileStorageData::default()).into()
            }
            EngineType::RemoteURLStorage => RemoteURLStorage::new(None).into(),
        }
    }

    pub fn from_row(row: &StorageEngineRow, ctx: &StorageContext) -> Result<Storage> {
        let display_name = Some(row.display_name.clone()).filter(|name| !name.is_empty());
        let storage: Storage = match row.engine_type {
            EngineType::LocalFileStorage => {
                let data: LocalFileStorageData = serde_json::from_value(row.data.clone())
                    .map_err(|source| StorageError::InvalidData {
                        engine_type: row.engine_type,
                        source,
                    })
                    .wrap_err_with(|| format!("error loading storage engine {}", row.id))?;
                LocalFileStorage::new(ctx, display_name, data).into()
            }
            EngineType::RemoteURLStorage => RemoteURLStorage::new(display_name).into(),
        };
        Ok(storage)
    }

    /// Copy this engine's display name and settings onto its database row.
    pub fn write_to_row(&self, row: &mut StorageEngineRow) -> Result<()> {
        row.display_name = self.display_name().to_owned();
        row.data = self.data()?;
        Ok(())
    }
}
