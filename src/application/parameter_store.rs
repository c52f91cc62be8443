//! Storage seam for overarching parameter records
//!
//! The service layer talks to this trait only; records are stored with their
//! derived metrics already populated and are replaced wholesale on update.

use async_trait::async_trait;

use crate::{
    domain::{OverarchingParameter, ParameterId},
    error::Result,
};

/// CRUD interface over parameter records
#[async_trait]
pub trait ParameterRepository: Send + Sync {
    /// Fetch one record
    async fn get(&self, id: ParameterId) -> Result<Option<OverarchingParameter>>;

    /// All records ordered by id
    async fn list(&self) -> Result<Vec<OverarchingParameter>>;

    /// Insert a new record; fails with `Conflict` if the id is taken
    async fn create(&self, record: OverarchingParameter) -> Result<OverarchingParameter>;

    /// Overwrite an existing record; fails with `NotFound` if absent
    async fn update(&self, record: OverarchingParameter) -> Result<OverarchingParameter>;

    /// Remove a record; returns whether one existed
    async fn delete(&self, id: ParameterId) -> Result<bool>;
}
