//! Store module
//!
//! Persistence collaborators for arrays, volumes and instance types.
//! Handlers only see these traits; `PgStore` backs them with Postgres and
//! `MemoryStore` keeps everything in process.

mod error;
mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::{
    ArrayId, ArrayRecord, Direction, InstanceType, NewArray, NewVolume, VolumeChanges, VolumeId,
    VolumeRecord,
};

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Array persistence
#[async_trait]
pub trait ArrayStore: Send + Sync {
    async fn list_arrays(&self) -> StoreResult<Vec<ArrayRecord>>;

    /// Fails with `ArrayNotFound` for unknown or deleted ids
    async fn get_array(&self, id: ArrayId) -> StoreResult<ArrayRecord>;

    async fn create_array(&self, new: NewArray) -> StoreResult<ArrayRecord>;

    /// Fails with `ArrayNotFound` for unknown or already deleted ids
    async fn delete_array(&self, id: ArrayId) -> StoreResult<()>;
}

/// Instance type lookup
#[async_trait]
pub trait InstanceTypeCatalog: Send + Sync {
    async fn instance_type_by_name(&self, name: &str) -> StoreResult<InstanceType>;
}

/// Volume and drive persistence
#[async_trait]
pub trait VolumeStore: Send + Sync {
    /// Fails with `VolumeNotFound` for unknown or deleted ids
    async fn get_volume(&self, id: VolumeId) -> StoreResult<VolumeRecord>;

    /// All live volumes whose `direction` link equals `array_id`, ordered by id
    async fn list_by_array(
        &self,
        array_id: ArrayId,
        direction: Direction,
    ) -> StoreResult<Vec<VolumeRecord>>;

    async fn create_volume(&self, new: NewVolume) -> StoreResult<VolumeRecord>;

    async fn update_volume(&self, id: VolumeId, changes: VolumeChanges) -> StoreResult<()>;

    async fn delete_volume(&self, id: VolumeId) -> StoreResult<()>;
}
