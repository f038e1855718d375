use async_trait::async_trait;
use camino::Utf8PathBuf as PathBuf;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn, Instrument};

use crate::{
    form::storage::StorageForm,
    model::{MediaFile, StorageURI, UriScheme},
};

use super::{
    parse_duration, safe_file_name, EngineType, FileMeta, StorageContext, StorageEngine,
    StorageError, UploadedFile,
};

/// Settings of a [`LocalFileStorage`] that can be changed from the admin UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFileStorageData {
    /// Directory to keep files in, instead of the global media dir
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Streaming server that has access to the same files
    #[serde(default)]
    pub rtmp_server_uri: Option<String>,
}

/// Keeps uploads as plain files in a local directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    display_name: String,
    data: LocalFileStorageData,
    media_dir: PathBuf,
    deleted_files_dir: Option<PathBuf>,
    base_url: String,
}

impl LocalFileStorage {
    pub const DEFAULT_NAME: &'static str = "Local File Storage";

    pub fn new(
        ctx: &StorageContext,
        display_name: Option<String>,
        data: LocalFileStorageData,
    ) -> LocalFileStorage {
        LocalFileStorage {
            display_name: display_name.unwrap_or_else(|| Self::DEFAULT_NAME.to_owned()),
            data,
            media_dir: ctx.media_dir.clone(),
            deleted_files_dir: ctx.deleted_files_dir.clone(),
            base_url: ctx.base_url.clone(),
        }
    }

    pub fn settings(&self) -> &LocalFileStorageData {
        &self.data
    }

    pub fn set_settings(&mut self, data: LocalFileStorageData) {
        self.data = data;
    }

    /// Directory files are stored in: the configured path if there is one,
    /// the global media dir otherwise.
    pub fn base_path(&self) -> &camino::Utf8Path {
        match &self.data.path {
            Some(path) if !path.as_str().is_empty() => path.as_path(),
            _ => self.media_dir.as_path(),
        }
    }

    pub fn get_path(&self, unique_id: &str) -> PathBuf {
        self.base_path().join(unique_id)
    }

    fn rtmp_server_uri(&self) -> Option<&str> {
        self.data
            .rtmp_server_uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }

    fn serve_url(&self, media_file: &MediaFile) -> String {
        format!(
            "{}/files/{}-{}.{}",
            self.base_url, media_file.id.0, media_file.media_slug, media_file.container
        )
    }
}

/// Unique ids are bare file names; anything that could escape the base
/// directory is refused.
fn is_plain_file_name(unique_id: &str) -> bool {
    !unique_id.is_empty()
        && unique_id != "."
        && unique_id != ".."
        && !unique_id.contains(['/', '\\'])
}

#[async_trait]
impl StorageEngine for LocalFileStorage {
    fn engine_type(&self) -> EngineType {
        EngineType::LocalFileStorage
    }

    fn default_name(&self) -> &'static str {
        Self::DEFAULT_NAME
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
    }

    fn data(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.data).wrap_err("error serializing LocalFileStorage settings")
    }

    fn settings_form(&self) -> StorageForm {
        StorageForm::LocalFile
    }

    #[instrument(skip(self, file, meta), level = "debug")]
    async fn store(
        &self,
        media_file: &MediaFile,
        file: Option<UploadedFile>,
        _url: Option<&str>,
        meta: &mut FileMeta,
    ) -> Result<Option<String>> {
        let Some(mut file) = file else {
            return Err(StorageError::MissingFile(self.engine_type()).into());
        };
        let file_name = safe_file_name(media_file, file.filename.as_deref());
        let file_path = self.get_path(&file_name);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .wrap_err("could not create media directory")?;
        }

        let mut permanent_file = tokio::fs::File::create(&file_path)
            .in_current_span()
            .await
            .wrap_err_with(|| format!("error opening {} for writing", file_path))?;
        let written = tokio::io::copy(&mut file.reader, &mut permanent_file)
            .await
            .wrap_err_with(|| format!("error writing upload to {}", file_path))?;
        permanent_file
            .flush()
            .await
            .wrap_err("error flushing stored file")?;
        drop(permanent_file);
        debug!(%file_path, written, "stored upload");

        let duration_path = file_path.clone();
        let duration = tokio::task::spawn_blocking(move || parse_duration(&duration_path))
            .await
            .unwrap_or(0);
        meta.duration = Some(duration);

        Ok(Some(file_name))
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, unique_id: &str) -> bool {
        if !is_plain_file_name(unique_id) {
            warn!("refusing to delete suspicious unique id {:?}", unique_id);
            return false;
        }
        let file_path = self.get_path(unique_id);
        let result = match &self.deleted_files_dir {
            Some(deleted_dir) => {
                let target = deleted_dir.join("media").join(unique_id);
                match tokio::fs::create_dir_all(deleted_dir.join("media")).await {
                    Ok(()) => tokio::fs::rename(&file_path, &target).await,
                    Err(err) => Err(err),
                }
            }
            None => tokio::fs::remove_file(&file_path).await,
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(%file_path, "error deleting media file: {}", err);
                false
            }
        }
    }

    fn get_uris(&self, media_file: &MediaFile) -> Vec<StorageURI> {
        let mut uris = Vec::with_capacity(4);

        let url = self.serve_url(media_file);
        uris.push(StorageURI::new(
            media_file.id,
            UriScheme::Http,
            url.clone(),
            None,
        ));

        if let Some(rtmp_server_uri) = self.rtmp_server_uri() {
            uris.push(StorageURI::new(
                media_file.id,
                UriScheme::Rtmp,
                media_file.unique_id.clone(),
                Some(rtmp_server_uri.to_owned()),
            ));
        }

        uris.push(StorageURI::new(
            media_file.id,
            UriScheme::Download,
            format!("{}?download=1", url),
            None,
        ));

        // used internally to serve the file directly
        uris.push(StorageURI::new(
            media_file.id,
            UriScheme::File,
            format!("file://{}", self.get_path(&media_file.unique_id)),
            None,
        ));

        uris
    }
}
