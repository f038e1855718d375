use async_trait::async_trait;
use eyre::Result;

use crate::{
    form::storage::StorageForm,
    model::{MediaFile, StorageURI, UriScheme},
};

use super::{
    media_url::{parse_media_url, split_rtmp_url},
    EngineType, FileMeta, StorageEngine, StorageError, UploadedFile,
};

/// Media that lives on some other web or streaming server. Nothing is
/// stored, the URL itself is the unique id.
#[derive(Debug, Clone)]
pub struct RemoteURLStorage {
    display_name: String,
}

impl RemoteURLStorage {
    pub const DEFAULT_NAME: &'static str = "Remote URLs";

    pub fn new(display_name: Option<String>) -> RemoteURLStorage {
        RemoteURLStorage {
            display_name: display_name.unwrap_or_else(|| Self::DEFAULT_NAME.to_owned()),
        }
    }
}

#[async_trait]
impl StorageEngine for RemoteURLStorage {
    fn engine_type(&self) -> EngineType {
        EngineType::RemoteURLStorage
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
        Ok(serde_json::json!({}))
    }

    fn settings_form(&self) -> StorageForm {
        StorageForm::Generic
    }

    async fn store(
        &self,
        _media_file: &MediaFile,
        _file: Option<UploadedFile>,
        url: Option<&str>,
        _meta: &mut FileMeta,
    ) -> Result<Option<String>> {
        let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
            return Err(StorageError::MissingUrl(self.engine_type()).into());
        };
        if parse_media_url(url).is_none() {
            return Err(StorageError::UnsupportedUrl(url.to_owned()).into());
        }
        Ok(Some(url.to_owned()))
    }

    async fn delete(&self, _unique_id: &str) -> bool {
        // nothing was stored
        true
    }

    fn get_uris(&self, media_file: &MediaFile) -> Vec<StorageURI> {
        let url = &media_file.unique_id;
        match parse_media_url(url) {
            Some((parsed, UriScheme::Rtmp)) => {
                // rtmp://server/app/stream: players want the server part
                // and the stream name separately
                let (server, stream) =
                    split_rtmp_url(&parsed).unwrap_or_else(|| (url.clone(), String::new()));
                vec![StorageURI::new(
                    media_file.id,
                    UriScheme::Rtmp,
                    stream,
                    Some(server),
                )]
            }
            Some(_) => vec![StorageURI::new(
                media_file.id,
                UriScheme::Http,
                url.clone(),
                None,
            )],
            None => Vec::new(),
        }
    }
}
