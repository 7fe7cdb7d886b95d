//! Request parameter and body types for the contract endpoints.

use serde::Deserialize;

/// Page size used when a paginated request does not specify one.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Bookmark pagination parameters (`?page_size=&bookmark=`).
///
/// The page size is forwarded to the state database unchanged; bounds are
/// the store's business.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page_size: Option<i32>,
    pub bookmark: Option<String>,
}

impl PageParams {
    pub fn page_size(&self) -> i32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn bookmark(&self) -> &str {
        self.bookmark.as_deref().unwrap_or("")
    }
}

/// Body of `POST /assets`.
#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub cid: String,
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub features: String,
}

/// Body of `POST /assets/query`.
///
/// `query` may be sent either as a JSON string holding the query or as the
/// query object itself.
#[derive(Debug, Deserialize)]
pub struct QueryAssetsRequest {
    pub query: serde_json::Value,
    #[serde(flatten)]
    pub page: PageParams,
}

impl QueryAssetsRequest {
    /// The query in the textual form the state database expects.
    pub fn query_string(&self) -> String {
        match &self.query {
            serde_json::Value::String(raw) => raw.clone(),
            other => other.to_string(),
        }
    }
}
