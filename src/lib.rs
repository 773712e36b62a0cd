pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod index;
pub mod plugins;
pub mod progress;
pub mod report;
pub mod version;

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("failed to parse settings: {0}")]
    SettingsParse(String),

    #[error("settings file already exists at {0}")]
    SettingsExists(PathBuf),

    #[error("no settings file found (run 'pytest-plugin-list init' first)")]
    NoSettings,

    #[error("group '{0}' already exists")]
    GroupExists(String),

    #[error("group '{0}' not found in settings")]
    GroupNotFound(String),

    // Index errors
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to parse response from {url}: {source}")]
    ResponseParse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    // Cache errors
    #[error("failed to create cache directory: {0}")]
    CacheCreate(#[source] std::io::Error),

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode JSON for {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
