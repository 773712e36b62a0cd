use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

use crate::cache::{CachedResponse, ResponseCache};
use crate::{Error, Result};

/// A GET request with its extra headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Cache key: SHA-256 over method, URL and the normalized header set.
    pub fn signature(&self) -> String {
        let mut headers: Vec<(String, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.as_str()))
            .collect();
        headers.sort();

        let mut hasher = Sha256::new();
        hasher.update(b"GET ");
        hasher.update(self.url.as_bytes());
        for (name, value) in headers {
            hasher.update(b"\n");
            hasher.update(name.as_bytes());
            hasher.update(b": ");
            hasher.update(value.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Performs a request against the network.
pub trait Transport {
    fn get(&self, request: &Request) -> Result<CachedResponse>;
}

/// Blocking `reqwest` transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport {
                url: String::new(),
                source: e,
            })?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    fn get(&self, request: &Request) -> Result<CachedResponse> {
        let mut builder = self.client.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().map_err(|e| Error::Transport {
            url: request.url.clone(),
            source: e,
        })?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.text().map_err(|e| Error::Transport {
            url: request.url.clone(),
            source: e,
        })?;

        trace!(status, bytes = body.len(), "received response");
        Ok(CachedResponse {
            url: request.url.clone(),
            status,
            headers,
            body,
            stored_at: None,
            from_cache: false,
        })
    }
}

/// A transport fronted by the response cache.
pub struct CachedSession<T> {
    cache: ResponseCache,
    transport: T,
}

impl<T: Transport> CachedSession<T> {
    pub fn new(cache: ResponseCache, transport: T) -> Self {
        Self { cache, transport }
    }

    /// Serve from the cache when possible, unless `refresh` forces a network request.
    /// Only successful responses are stored.
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub fn get(&self, request: &Request, refresh: bool) -> Result<CachedResponse> {
        let key = request.signature();

        if !refresh {
            if let Some(cached) = self.cache.get(&key)? {
                trace!("cache hit");
                return Ok(cached);
            }
        }

        debug!(refresh, "fetching from network");
        let response = self.transport.get(request)?;
        if response.is_success() {
            self.cache.put(&key, &response)?;
        }
        Ok(response)
    }
}
