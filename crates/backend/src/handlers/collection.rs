use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::common::{SortOrderEntry, IDEMPOTENCY_KEY_HEADER};
use contracts::shared::errors::ErrorBody;
use serde_json::Value;

use crate::routes::AppState;
use crate::shared::data::store::{kind_of, StoreFailure};

/// Error response: status plus an [`ErrorBody`]
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl From<StoreFailure> for ApiError {
    fn from(failure: StoreFailure) -> Self {
        let status = match &failure {
            StoreFailure::UnknownCollection(_) | StoreFailure::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StoreFailure::Duplicate { .. } => StatusCode::CONFLICT,
            StoreFailure::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        let fields = match &failure {
            StoreFailure::Invalid(fields) => fields.clone(),
            _ => Vec::new(),
        };
        ApiError {
            status,
            body: ErrorBody {
                message: failure.to_string(),
                fields,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// GET /api/:collection
pub async fn list(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let kind = kind_of(&collection)?;
    Ok(Json(state.store.list(kind).await))
}

/// POST /api/:collection
pub async fn create(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let kind = kind_of(&collection)?;
    let key = headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let created = state.store.create(kind, body, key).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/:collection/:id
pub async fn update(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let kind = kind_of(&collection)?;
    let updated = state.store.update(kind, &id, patch).await?;
    tracing::info!("Updated {} {}", kind.display_name(), id);
    Ok(Json(updated))
}

/// DELETE /api/:collection/:id
pub async fn delete(
    State(state): State<AppState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = kind_of(&collection)?;
    state.store.delete(kind, &id).await?;
    tracing::info!("Deleted {} {}", kind.display_name(), id);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/:collection/reorder
pub async fn reorder(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    Json(entries): Json<Vec<SortOrderEntry<Value>>>,
) -> Result<StatusCode, ApiError> {
    let kind = kind_of(&collection)?;
    let count = entries.len();
    state.store.reorder(kind, entries).await?;
    tracing::info!("Reordered {} {}", count, kind.collection());
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderName;
    use serde_json::json;

    use super::*;
    use crate::shared::data::store::MemoryStore;

    fn state() -> AppState {
        AppState {
            store: Arc::new(MemoryStore::new()),
        }
    }

    fn product_body() -> Json<Value> {
        Json(json!({ "name": "Axolotl", "price": 40.0 }))
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let state = state();
        let (status, Json(created)) = create(
            State(state.clone()),
            Path("products".into()),
            HeaderMap::new(),
            product_body(),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);

        let Json(rows) = list(State(state), Path("products".into())).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_collection_is_404() {
        let err = list(State(state()), Path("orders".into())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_body_is_422_with_fields() {
        let err = create(
            State(state()),
            Path("offers".into()),
            HeaderMap::new(),
            Json(json!({ "title": "Spring sale" })),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.body.fields.contains(&"imageUrl".to_string()));
    }

    #[tokio::test]
    async fn test_idempotency_header_replays_create() {
        let state = state();
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("idempotency-key"), "9b2c".parse().unwrap());

        for _ in 0..2 {
            create(
                State(state.clone()),
                Path("products".into()),
                headers.clone(),
                product_body(),
            )
            .await
            .unwrap();
        }

        let Json(rows) = list(State(state), Path("products".into())).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_404() {
        let err = delete(State(state()), Path(("products".into(), "5".into())))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.body.message, "Product 5 not found");
    }
}
