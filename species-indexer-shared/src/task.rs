//! Fetch tasks consumed by the catalog client.

use std::fmt;

/// A single catalog API request: the record identifier and the endpoint path
/// relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTask {
    pub id: u32,
    pub path: String,
}

impl FetchTask {
    pub fn new(id: u32, path: impl Into<String>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Build the task for `/{endpoint}/{id}`.
    pub fn for_endpoint(endpoint: &str, id: u32) -> Self {
        Self::new(id, format!("{}/{}", endpoint.trim_matches('/'), id))
    }
}

impl fmt::Display for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path, self.id)
    }
}
