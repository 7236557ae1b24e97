// ── Record store seam ──
//
// The controller talks to the backend through this trait instead of a
// concrete HTTP client, so tests drive it with an in-memory store and
// production binds it to `tablero_api::RecordService`.

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::CoreError;
use crate::model::RecordId;

/// Asynchronous CRUD access to one named resource.
///
/// All operations may fail; failures carry a human-readable message
/// (see [`CoreError::message`]).
pub trait RecordStore<T, P>: Send + Sync {
    /// Fetch the complete current collection.
    fn list_all(&self) -> impl Future<Output = Result<Vec<T>, CoreError>> + Send;

    /// Fetch one record; `NotFound` if no record has that id.
    fn get_by_id(&self, id: &RecordId) -> impl Future<Output = Result<T, CoreError>> + Send;

    /// Create a record; the server assigns the id.
    fn create(&self, payload: &P) -> impl Future<Output = Result<T, CoreError>> + Send;

    /// Update a record; `NotFound` if the id does not exist.
    fn update(
        &self,
        id: &RecordId,
        payload: &P,
    ) -> impl Future<Output = Result<T, CoreError>> + Send;

    /// Delete a record; `NotFound` if the id does not exist (repeat
    /// deletes report `NotFound`, not success).
    fn delete(&self, id: &RecordId) -> impl Future<Output = Result<(), CoreError>> + Send;
}

impl<T, P> RecordStore<T, P> for tablero_api::RecordService<T, P>
where
    T: DeserializeOwned + Send + Sync,
    P: Serialize + Send + Sync,
{
    async fn list_all(&self) -> Result<Vec<T>, CoreError> {
        Ok(Self::list_all(self).await?)
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<T, CoreError> {
        Ok(Self::get_by_id(self, id).await?)
    }

    async fn create(&self, payload: &P) -> Result<T, CoreError> {
        Ok(Self::create(self, payload).await?)
    }

    async fn update(&self, id: &RecordId, payload: &P) -> Result<T, CoreError> {
        Ok(Self::update(self, id, payload).await?)
    }

    async fn delete(&self, id: &RecordId) -> Result<(), CoreError> {
        Ok(Self::delete(self, id).await?)
    }
}
