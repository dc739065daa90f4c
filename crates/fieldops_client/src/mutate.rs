use std::marker::PhantomData;
use std::sync::Arc;

use fieldops_core::{FailureKind, FetchError};
use fieldops_logging::ops_info;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::{ReqwestFetcher, Resource, SessionStore};

/// Single-row create/update/delete for one resource.
///
/// Holds no row state; after a success the caller refreshes its list controller.
pub struct RowMutator<T> {
    backend: Arc<ReqwestFetcher>,
    session: Arc<dyn SessionStore>,
    resource: Resource,
    _row: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> RowMutator<T> {
    pub fn new(
        backend: Arc<ReqwestFetcher>,
        session: Arc<dyn SessionStore>,
        resource: Resource,
    ) -> Self {
        Self {
            backend,
            session,
            resource,
            _row: PhantomData,
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Posts a new row and returns the entity from the `{data: ...}` response.
    pub async fn create<P: Serialize + Sync>(&self, payload: &P) -> Result<T, FetchError> {
        let path = self.resource.create_path().ok_or_else(|| {
            FetchError::new(
                FailureKind::InvalidSelection,
                format!("{} cannot be created here", self.resource),
            )
        })?;
        let token = self.token()?;
        let mut body = self
            .backend
            .send(Method::POST, path, Some(payload), &token)
            .await?;
        let entity = body
            .get_mut("data")
            .map(Value::take)
            .filter(|data| !data.is_null())
            .ok_or_else(|| FetchError::new(FailureKind::Decode, "create response has no data"))?;
        let created = serde_json::from_value(entity)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        ops_info!("Created {} row", self.resource);
        Ok(created)
    }

    pub async fn update<P: Serialize + Sync>(
        &self,
        id: Option<&str>,
        payload: &P,
    ) -> Result<(), FetchError> {
        let id = require_selection(id)?;
        let token = self.token()?;
        self.backend
            .send(Method::PUT, &self.resource.item_path(id), Some(payload), &token)
            .await?;
        ops_info!("Updated {} row {}", self.resource, id);
        Ok(())
    }

    /// Callers confirm with the user before getting here.
    pub async fn delete(&self, id: Option<&str>) -> Result<(), FetchError> {
        let id = require_selection(id)?;
        if !self.resource.supports_delete() {
            return Err(FetchError::new(
                FailureKind::InvalidSelection,
                format!("{} cannot be deleted here", self.resource),
            ));
        }
        let token = self.token()?;
        self.backend
            .send::<()>(Method::DELETE, &self.resource.item_path(id), None, &token)
            .await?;
        ops_info!("Deleted {} row {}", self.resource, id);
        Ok(())
    }

    fn token(&self) -> Result<String, FetchError> {
        self.session.token().ok_or_else(FetchError::unauthenticated)
    }
}

fn require_selection(id: Option<&str>) -> Result<&str, FetchError> {
    id.map(str::trim).filter(|id| !id.is_empty()).ok_or_else(|| {
        FetchError::new(
            FailureKind::InvalidSelection,
            "Invalid selection. Please try again.",
        )
    })
}
