use std::marker::PhantomData;

use async_trait::async_trait;
use contracts::domain::common::{Entity, EntityId, MutationKey, SortOrderEntry, IDEMPOTENCY_KEY_HEADER};
use contracts::shared::errors::{ErrorBody, GatewayError, StoreError};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use super::{check_create, check_reorder, check_update, Gateway, GatewayOp};
use crate::shared::api_utils::{collection_url, item_url, reorder_url};
use crate::shared::config::ClientConfig;
use crate::shared::patch::Patch;

/// HTTP client for one collection of the CRUD API
pub struct HttpGateway<E> {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<String>,
    _kind: PhantomData<fn() -> E>,
}

impl<E: Entity> HttpGateway<E> {
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout());
        let client = builder
            .build()
            .map_err(|e| GatewayError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api.base_url.clone(),
            auth_token: config.api.auth_token.clone(),
            _kind: PhantomData,
        })
    }

    /// Shares an existing connection pool between gateways of different kinds.
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.api.base_url.clone(),
            auth_token: config.api.auth_token.clone(),
            _kind: PhantomData,
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, op: GatewayOp, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = self
            .authorize(request)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(op, e))?;

        let status = response.status();
        if status.is_success() {
            log::debug!("{:?} {} -> {}", op, E::collection_name(), status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) if parsed.fields.is_empty() => parsed.message,
            Ok(parsed) => format!("{} ({})", parsed.message, parsed.fields.join(", ")),
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body,
        };
        log::warn!(
            "{:?} {} failed with status {}: {}",
            op,
            E::collection_name(),
            status,
            message
        );
        Err(GatewayError::from_status(status.as_u16(), message))
    }

    async fn read_json<T: DeserializeOwned>(op: GatewayOp, response: Response) -> Result<T, GatewayError> {
        response
            .json::<T>()
            .await
            .map_err(|e| transport_error(op, e))
    }
}

fn transport_error(op: GatewayOp, e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        log::warn!("{:?} timed out: {}", op, e);
        GatewayError::timeout(format!("Request timed out: {}", e))
    } else if e.is_decode() {
        log::error!("{:?} returned an unreadable body: {}", op, e);
        GatewayError::network(format!("Failed to parse response: {}", e))
    } else {
        log::warn!("{:?} failed to reach the server: {}", op, e);
        GatewayError::network(format!("Failed to send request: {}", e))
    }
}

#[async_trait(?Send)]
impl<E: Entity> Gateway<E> for HttpGateway<E> {
    async fn list(&self) -> Result<Vec<E>, StoreError> {
        let url = collection_url(&self.base_url, E::collection_name());
        let response = self.send(GatewayOp::List, self.client.get(&url)).await?;
        Ok(Self::read_json(GatewayOp::List, response).await?)
    }

    async fn create(&self, entity: &E, key: MutationKey) -> Result<E, StoreError> {
        check_create(entity)?;

        let mut body = entity.clone();
        body.set_id(None);
        let url = collection_url(&self.base_url, E::collection_name());
        let request = self
            .client
            .post(&url)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .json(&body);
        let response = self.send(GatewayOp::Create, request).await?;
        let created: E = Self::read_json(GatewayOp::Create, response).await?;
        if created.id().is_none() {
            return Err(GatewayError::server("Created entity has no id").into());
        }
        Ok(created)
    }

    async fn update(&self, id: &E::Id, patch: &Patch, key: MutationKey) -> Result<E, StoreError> {
        check_update::<E>(patch)?;
        if id.is_temporary() {
            return Err(GatewayError::conflict(format!("{} {} was never saved", E::element_name(), id)).into());
        }

        let url = item_url(&self.base_url, E::collection_name(), id);
        let request = self
            .client
            .put(&url)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .json(patch);
        let response = self.send(GatewayOp::Update, request).await?;
        Ok(Self::read_json(GatewayOp::Update, response).await?)
    }

    async fn delete(&self, id: &E::Id, key: MutationKey) -> Result<(), StoreError> {
        if id.is_temporary() {
            return Err(GatewayError::conflict(format!("{} {} was never saved", E::element_name(), id)).into());
        }
        let url = item_url(&self.base_url, E::collection_name(), id);
        let request = self
            .client
            .delete(&url)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string());
        self.send(GatewayOp::Delete, request).await?;
        Ok(())
    }

    async fn reorder(&self, ids_in_order: &[E::Id], key: MutationKey) -> Result<(), StoreError> {
        check_reorder::<E>(ids_in_order)?;

        let url = reorder_url(&self.base_url, E::collection_name());
        let request = self
            .client
            .post(&url)
            .header(IDEMPOTENCY_KEY_HEADER, key.to_string())
            .json(&SortOrderEntry::dense(ids_in_order));
        self.send(GatewayOp::Reorder, request).await?;
        Ok(())
    }
}
