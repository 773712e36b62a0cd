mod response;

pub use response::{CachedResponse, ResponseCache, APP_NAME};
