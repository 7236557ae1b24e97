// Generic record service
//
// Typed CRUD operations against a single named REST resource. One
// instance per resource; the record type `T` and the create/update
// payload type `P` are fixed at construction. Identifiers are passed
// by their string form so the service stays agnostic of whether the
// backend assigns numeric or string ids.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

/// CRUD client for one REST resource under `{base}/api/{endpoint}`.
///
/// - `list_all` — `GET /{endpoint}`, the whole collection (no pagination)
/// - `get_by_id` — `GET /{endpoint}/{id}`
/// - `create` — `POST /{endpoint}` (server assigns the id)
/// - `update` — `PUT /{endpoint}/{id}`
/// - `delete` — `DELETE /{endpoint}/{id}`
///
/// A 404 on any id-addressed operation surfaces as [`Error::NotFound`];
/// deleting an already-deleted id reports `NotFound`, not success.
pub struct RecordService<T, P> {
    client: Arc<ApiClient>,
    endpoint: String,
    _marker: PhantomData<fn() -> (T, P)>,
}

impl<T, P> RecordService<T, P>
where
    T: DeserializeOwned,
    P: Serialize + Sync,
{
    /// Bind a service to a resource endpoint (e.g. `"activities"`).
    pub fn new(client: Arc<ApiClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            _marker: PhantomData,
        }
    }

    /// The resource endpoint name this service is bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the complete current collection.
    pub async fn list_all(&self) -> Result<Vec<T>, Error> {
        let url = self.client.api_url(&self.endpoint);
        self.client.get(url).await
    }

    /// Fetch a single record by id.
    pub async fn get_by_id(&self, id: impl Display) -> Result<T, Error> {
        let url = self.client.api_url(&format!("{}/{id}", self.endpoint));
        self.client.get(url).await
    }

    /// Create a record; the server assigns the identifier and returns
    /// the persisted record.
    pub async fn create(&self, payload: &P) -> Result<T, Error> {
        debug!(endpoint = %self.endpoint, "creating record");
        let url = self.client.api_url(&self.endpoint);
        self.client.post(url, payload).await
    }

    /// Update the record with the given id, returning the persisted record.
    pub async fn update(&self, id: impl Display, payload: &P) -> Result<T, Error> {
        debug!(endpoint = %self.endpoint, id = %id, "updating record");
        let url = self.client.api_url(&format!("{}/{id}", self.endpoint));
        self.client.put(url, payload).await
    }

    /// Delete the record with the given id.
    pub async fn delete(&self, id: impl Display) -> Result<(), Error> {
        debug!(endpoint = %self.endpoint, id = %id, "deleting record");
        let url = self.client.api_url(&format!("{}/{id}", self.endpoint));
        self.client.delete(url).await
    }
}

impl<T, P> Clone for RecordService<T, P> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            endpoint: self.endpoint.clone(),
            _marker: PhantomData,
        }
    }
}
