use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Application name used for the XDG cache and config directories.
pub const APP_NAME: &str = "pytest-plugin-list";

/// CACHEDIR.TAG content per https://bford.info/cachedir/
const CACHEDIR_TAG_CONTENT: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by pytest-plugin-list.\n\
# For information about cache directory tags, see:\n\
#   https://bford.info/cachedir/\n";

/// An HTTP response, either fresh from the network or read back from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    /// Header names are lowercased.
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub stored_at: Option<String>,
    /// Set when the response was served from the cache.
    #[serde(skip)]
    pub from_cache: bool,
}

impl CachedResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// File-backed response store, one JSON file per request signature.
pub struct ResponseCache {
    cache_dir: PathBuf,
}

impl ResponseCache {
    /// Create a response cache in the XDG cache directory.
    pub fn new() -> Result<Self> {
        let dirs = xdg::BaseDirectories::with_prefix(APP_NAME);
        let cache_dir = dirs.get_cache_home().ok_or_else(|| {
            Error::CacheCreate(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine cache directory",
            ))
        })?;

        Ok(Self { cache_dir })
    }

    /// Create a response cache with a custom cache directory (for testing).
    pub fn with_cache_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn http_dir(&self) -> PathBuf {
        self.cache_dir.join("http")
    }

    /// Ensure the cache directory exists and has a CACHEDIR.TAG.
    pub fn ensure_cache_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir).map_err(Error::CacheCreate)?;

        let tag_path = self.cache_dir.join("CACHEDIR.TAG");
        if !tag_path.exists() {
            std::fs::write(&tag_path, CACHEDIR_TAG_CONTENT).map_err(Error::CacheCreate)?;
        }

        std::fs::create_dir_all(self.http_dir()).map_err(Error::CacheCreate)?;
        Ok(())
    }

    /// Path of the entry stored under `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.http_dir().join(format!("{}.json", key))
    }

    /// Look up a stored response. Unreadable entries count as misses.
    pub fn get(&self, key: &str) -> Result<Option<CachedResponse>> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| Error::FileRead {
            path: path.clone(),
            source: e,
        })?;

        match serde_json::from_str::<CachedResponse>(&content) {
            Ok(mut response) => {
                response.from_cache = true;
                Ok(Some(response))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt cache entry");
                Ok(None)
            }
        }
    }

    /// Store a response under `key`, replacing any previous entry.
    pub fn put(&self, key: &str, response: &CachedResponse) -> Result<()> {
        self.ensure_cache_dir()?;

        let path = self.entry_path(key);
        let mut stored = response.clone();
        stored.stored_at = Some(chrono::Utc::now().to_rfc3339());

        let content = serde_json::to_string(&stored).map_err(|e| Error::JsonParse {
            path: path.clone(),
            source: e,
        })?;

        std::fs::write(&path, content).map_err(|e| Error::FileWrite {
            path: path.clone(),
            source: e,
        })?;

        debug!(key, url = %response.url, "stored response");
        Ok(())
    }

    /// Remove every stored response. Returns how many entries were deleted.
    pub fn clear(&self) -> Result<usize> {
        let dir = self.http_dir();
        if !dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path).map_err(|e| Error::FileWrite {
                    path: path.clone(),
                    source: e,
                })?;
                removed += 1;
            }
        }

        Ok(removed)
    }
}
