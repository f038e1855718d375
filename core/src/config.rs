use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use color_eyre::eyre::{bail, Context, Result};
use serde::Deserialize;
use std::str::FromStr;

use crate::{
    core::storage::{is_rtmp_url, EngineType},
    util::absolute_or_relative_to,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlDataDir {
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlMedia {
    pub media_dir: Option<String>,
    pub deleted_files_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlPlayers {
    pub enable_defaults: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlStorageEngine {
    pub engine_type: String,
    pub display_name: Option<String>,
    pub path: Option<String>,
    pub rtmp_server_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    #[serde(rename = "DataDir")]
    pub data_dir: TomlDataDir,
    #[serde(rename = "Media")]
    pub media: Option<TomlMedia>,
    #[serde(rename = "Players")]
    pub players: Option<TomlPlayers>,
    #[serde(rename = "StorageEngines", default)]
    pub storage_engines: Vec<TomlStorageEngine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// Where LocalFileStorage engines without their own `path` put files.
    pub media_dir: PathBuf,
    /// If set, deleted media files are moved here instead of being removed.
    pub deleted_files_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayersConfig {
    pub enable_defaults: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEngineConfig {
    pub engine_type: EngineType,
    pub display_name: Option<String>,
    pub path: Option<PathBuf>,
    pub rtmp_server_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: Option<String>,
    pub port: Option<u16>,
    /// Scheme and authority used to build public media URLs, without trailing slash.
    pub base_url: String,
    pub data_dir: DataDir,
    pub media: MediaConfig,
    pub players: PlayersConfig,
    pub storage_engines: Vec<StorageEngineConfig>,
}

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    // all relative paths in the config file are relative to its directory
    let config_dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_owned(),
        _ => PathBuf::from("."),
    };
    parse_config(&toml_str, &config_dir)
}

pub fn parse_config(toml_str: &str, config_dir: &Path) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    let data_dir = DataDir {
        path: absolute_or_relative_to(config_dir, &PathBuf::from_str(&toml_config.data_dir.path)?),
    };
    let media = match toml_config.media {
        Some(media) => MediaConfig {
            media_dir: media
                .media_dir
                .map(|p| absolute_or_relative_to(config_dir, Path::new(&p)))
                .unwrap_or_else(|| data_dir.path.join("media")),
            deleted_files_dir: media
                .deleted_files_dir
                .map(|p| absolute_or_relative_to(config_dir, Path::new(&p))),
        },
        None => MediaConfig {
            media_dir: data_dir.path.join("media"),
            deleted_files_dir: None,
        },
    };
    let players = PlayersConfig {
        enable_defaults: toml_config
            .players
            .and_then(|p| p.enable_defaults)
            .unwrap_or(true),
    };
    let storage_engines = toml_config
        .storage_engines
        .into_iter()
        .map(|toml_value| {
            let engine_type = EngineType::from_str(&toml_value.engine_type).map_err(|_| {
                color_eyre::eyre::eyre!("unknown storage engine type '{}'", toml_value.engine_type)
            })?;
            if let Some(rtmp) = &toml_value.rtmp_server_uri {
                if !is_rtmp_url(rtmp) {
                    bail!("rtmp_server_uri must be an rtmp:// URL, got '{}'", rtmp);
                }
            }
            Ok(StorageEngineConfig {
                engine_type,
                display_name: toml_value.display_name,
                path: toml_value
                    .path
                    .map(|p| absolute_or_relative_to(config_dir, Path::new(&p))),
                rtmp_server_uri: toml_value.rtmp_server_uri,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let base_url = toml_config
        .base_url
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
        .trim_end_matches('/')
        .to_owned();
    Ok(Config {
        address: toml_config.address,
        port: toml_config.port,
        base_url,
        data_dir,
        media,
        players,
        storage_engines,
    })
}

#[cfg(test)]
mod test {
    use claims::{assert_err, assert_ok};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = assert_ok!(parse_config(
            r#"
[DataDir]
path = "data"
"#,
            Path::new("/etc/mediapub"),
        ));
        assert_eq!(config.data_dir.path, PathBuf::from("/etc/mediapub/data"));
        assert_eq!(
            config.media.media_dir,
            PathBuf::from("/etc/mediapub/data/media")
        );
        assert_eq!(config.media.deleted_files_dir, None);
        assert!(config.players.enable_defaults);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.storage_engines.is_empty());
    }

    #[test]
    fn full_config() {
        let config = assert_ok!(parse_config(
            r#"
address = "0.0.0.0"
port = 8080
base_url = "https://media.example.com/"

[DataDir]
path = "/var/lib/mediapub"

[Media]
media_dir = "files"
deleted_files_dir = "/var/lib/mediapub/deleted"

[Players]
enable_defaults = false

[[StorageEngines]]
engine_type = "LocalFileStorage"
display_name = "Disk"
path = "/srv/media"
rtmp_server_uri = "rtmp://stream.example.com/vod"

[[StorageEngines]]
engine_type = "RemoteURLStorage"
"#,
            Path::new("/etc/mediapub"),
        ));
        assert_eq!(config.address.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.base_url, "https://media.example.com");
        assert_eq!(config.media.media_dir, PathBuf::from("/etc/mediapub/files"));
        assert_eq!(
            config.media.deleted_files_dir,
            Some(PathBuf::from("/var/lib/mediapub/deleted"))
        );
        assert!(!config.players.enable_defaults);
        assert_eq!(
            config.storage_engines,
            vec![
                StorageEngineConfig {
                    engine_type: EngineType::LocalFileStorage,
                    display_name: Some("Disk".to_owned()),
                    path: Some(PathBuf::from("/srv/media")),
                    rtmp_server_uri: Some("rtmp://stream.example.com/vod".to_owned()),
                },
                StorageEngineConfig {
                    engine_type: EngineType::RemoteURLStorage,
                    display_name: None,
                    path: None,
                    rtmp_server_uri: None,
                }
            ]
        );
    }

    #[test]
    fn unknown_engine_type_is_rejected() {
        assert_err!(parse_config(
            r#"
[DataDir]
path = "data"

[[StorageEngines]]
engine_type = "FtpStorage"
"#,
            Path::new("/"),
        ));
    }

    #[test]
    fn bad_rtmp_uri_is_rejected() {
        assert_err!(parse_config(
            r#"
[DataDir]
path = "data"

[[StorageEngines]]
engine_type = "LocalFileStorage"
rtmp_server_uri = "http://not-rtmp"
"#,
            Path::new("/"),
        ));
    }

    #[test]
    fn malformed_rtmp_uri_is_rejected() {
        assert_err!(parse_config(
            r#"
[DataDir]
path = "data"

[[StorageEngines]]
engine_type = "LocalFileStorage"
rtmp_server_uri = "rtmp://exa mple.com/vod"
"#,
            Path::new("/"),
        ));
    }
}
