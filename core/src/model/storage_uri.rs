use serde::Serialize;

use super::MediaFileId;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UriScheme {
    Http,
    Rtmp,
    Download,
    File,
}

/// One way to access a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageURI {
    pub file: MediaFileId,
    pub scheme: UriScheme,
    pub file_uri: String,
    /// Streaming server the `file_uri` is relative to, for rtmp
    pub server_uri: Option<String>,
}

impl StorageURI {
    pub fn new(
        file: MediaFileId,
        scheme: UriScheme,
        file_uri: impl Into<String>,
        server_uri: Option<String>,
    ) -> Self {
        StorageURI {
            file,
            scheme,
            file_uri: file_uri.into(),
            server_uri,
        }
    }
}
