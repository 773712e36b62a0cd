mod client;
mod document;
mod session;

pub use client::{IndexClient, ProjectSource, LAST_SERIAL_HEADER, PYPI_PROJECT_URL, PYPI_SIMPLE_URL};
pub use document::{IndexEntry, ProjectDocument, ProjectInfo, ReleaseFile, SimpleIndex};
pub use session::{CachedSession, HttpTransport, Request, Transport};
