use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::document::{IndexEntry, ProjectDocument, SimpleIndex};
use super::session::{CachedSession, Request, Transport};
use crate::cache::CachedResponse;
use crate::{Error, Result};

pub const PYPI_SIMPLE_URL: &str = "https://pypi.org/simple";
pub const PYPI_PROJECT_URL: &str = "https://pypi.org/pypi";

/// Response header carrying the project's serial number.
pub const LAST_SERIAL_HEADER: &str = "X-PyPI-Last-Serial";

const SIMPLE_JSON_ACCEPT: &str = "application/vnd.pypi.simple.v1+json";

/// Source of index listings and project metadata.
pub trait ProjectSource {
    /// Every project known to the index, in listing order.
    fn list_projects(&self) -> Result<Vec<IndexEntry>>;

    /// Metadata at least as fresh as `expected_serial`, or `None` if the
    /// project no longer exists.
    fn fetch_project(&self, name: &str, expected_serial: u64) -> Result<Option<ProjectDocument>>;
}

/// PyPI client with serial-based cache revalidation.
pub struct IndexClient<T> {
    session: CachedSession<T>,
}

impl<T: Transport> IndexClient<T> {
    pub fn new(session: CachedSession<T>) -> Self {
        Self { session }
    }

    fn project_request(name: &str) -> Request {
        Request::get(format!("{}/{}/json", PYPI_PROJECT_URL, name))
    }
}

impl<T: Transport> ProjectSource for IndexClient<T> {
    #[instrument(skip(self))]
    fn list_projects(&self) -> Result<Vec<IndexEntry>> {
        let request = Request::get(PYPI_SIMPLE_URL).header("Accept", SIMPLE_JSON_ACCEPT);
        // The listing changes constantly, so never trust a cached copy.
        let response = self.session.get(&request, true)?;
        ensure_success(&response)?;

        let index: SimpleIndex = parse_body(&response)?;
        info!(projects = index.projects.len(), "fetched index listing");
        Ok(index.projects)
    }

    #[instrument(skip(self))]
    fn fetch_project(&self, name: &str, expected_serial: u64) -> Result<Option<ProjectDocument>> {
        let request = Self::project_request(name);

        let mut response = self.session.get(&request, false)?;
        let serial = response
            .header(LAST_SERIAL_HEADER)
            .and_then(|value| value.trim().parse::<u64>().ok());
        if serial != Some(expected_serial) {
            debug!(?serial, expected_serial, "stale response, refreshing");
            response = self.session.get(&request, true)?;
        }

        if response.status == 404 {
            debug!("project not found");
            return Ok(None);
        }
        ensure_success(&response)?;

        parse_body(&response).map(Some)
    }
}

fn ensure_success(response: &CachedResponse) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(Error::HttpStatus {
            url: response.url.clone(),
            status: response.status,
        })
    }
}

fn parse_body<D: DeserializeOwned>(response: &CachedResponse) -> Result<D> {
    serde_json::from_str(&response.body).map_err(|e| Error::ResponseParse {
        url: response.url.clone(),
        source: e,
    })
}
