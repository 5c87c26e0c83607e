//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs.

use contracts::domain::common::EntityId;

/// Build a full API URL from a path
///
/// # Arguments
/// * `base` - API base like "http://localhost:3000" (trailing slash tolerated)
/// * `path` - The API path (should start with "/api/")
///
/// # Example
/// ```rust
/// use frontend::shared::api_utils::api_url;
/// assert_eq!(api_url("http://localhost:3000/", "/api/offers"), "http://localhost:3000/api/offers");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// `GET`/`POST` endpoint of a collection
pub fn collection_url(base: &str, collection: &str) -> String {
    api_url(base, &format!("/api/{}", collection))
}

/// `PUT`/`DELETE` endpoint of one entity; the id is percent-encoded
pub fn item_url<Id: EntityId>(base: &str, collection: &str, id: &Id) -> String {
    api_url(
        base,
        &format!("/api/{}/{}", collection, urlencoding::encode(&id.as_string())),
    )
}

/// `POST` endpoint persisting a new order
pub fn reorder_url(base: &str, collection: &str) -> String {
    api_url(base, &format!("/api/{}/reorder", collection))
}
