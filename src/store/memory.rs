//! In-memory store
//!
//! Keeps arrays, volumes and instance types in process behind a single
//! `RwLock`. Used by the `memory` backend and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::records::array_name;
use crate::domain::{
    ArrayId, ArrayRecord, ArrayStatus, Direction, InstanceType, InstanceTypeId, NewArray,
    NewVolume, VolumeChanges, VolumeId, VolumeRecord,
};

use super::{ArrayStore, InstanceTypeCatalog, StoreError, StoreResult, VolumeStore};

#[derive(Debug, Default)]
struct State {
    arrays: BTreeMap<ArrayId, ArrayRecord>,
    volumes: BTreeMap<VolumeId, VolumeRecord>,
    instance_types: BTreeMap<String, InstanceType>,
    next_array_id: i64,
    next_volume_id: i64,
}

impl State {
    fn drive_count(&self, array_id: ArrayId) -> i64 {
        self.volumes
            .values()
            .filter(|v| v.to_array_id == Some(array_id))
            .count() as i64
    }

    fn with_drive_count(&self, record: &ArrayRecord) -> ArrayRecord {
        let mut record = record.clone();
        record.drive_count = self.drive_count(record.id);
        record
    }
}

/// Process-local implementation of every store trait
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Empty store without any instance types
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the standard `m1.*` instance types
    pub fn with_default_instance_types() -> Self {
        let defaults = [
            ("m1.tiny", 512, 1, 0),
            ("m1.small", 2048, 1, 20),
            ("m1.medium", 4096, 2, 40),
            ("m1.large", 8192, 4, 80),
            ("m1.xlarge", 16384, 8, 160),
        ];

        let mut state = State::default();
        for (index, (name, memory_mb, vcpus, local_gb)) in defaults.into_iter().enumerate() {
            state.instance_types.insert(
                name.to_string(),
                InstanceType {
                    id: InstanceTypeId(index as i64 + 1),
                    name: name.to_string(),
                    memory_mb,
                    vcpus,
                    local_gb,
                },
            );
        }

        Self {
            state: RwLock::new(state),
        }
    }

    /// Attach a volume to a server; mirrors what the compute side would record
    pub async fn attach_volume(
        &self,
        id: VolumeId,
        instance_id: i64,
        mountpoint: &str,
    ) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let volume = state
            .volumes
            .get_mut(&id)
            .ok_or(StoreError::VolumeNotFound(id))?;
        volume.instance_id = Some(instance_id);
        volume.mountpoint = Some(mountpoint.to_string());
        volume.status = "in-use".to_string();
        Ok(())
    }
}

#[async_trait]
impl ArrayStore for MemoryStore {
    async fn list_arrays(&self) -> StoreResult<Vec<ArrayRecord>> {
        let state = self.state.read().await;
        Ok(state
            .arrays
            .values()
            .map(|record| state.with_drive_count(record))
            .collect())
    }

    async fn get_array(&self, id: ArrayId) -> StoreResult<ArrayRecord> {
        let state = self.state.read().await;
        state
            .arrays
            .get(&id)
            .map(|record| state.with_drive_count(record))
            .ok_or(StoreError::ArrayNotFound(id))
    }

    async fn create_array(&self, new: NewArray) -> StoreResult<ArrayRecord> {
        let mut state = self.state.write().await;
        state.next_array_id += 1;
        let id = ArrayId(state.next_array_id);

        let record = ArrayRecord {
            id,
            name: array_name(id),
            display_name: new.display_name,
            display_description: new.display_description,
            created_at: Utc::now(),
            status: ArrayStatus::Creating,
            instance_type: Some(new.instance_type),
            vc_count: new.vc_count,
            drive_count: 0,
            availability_zone: new.availability_zone,
            storage: new.storage,
            shared: new.shared,
        };
        state.arrays.insert(id, record.clone());

        Ok(record)
    }

    async fn delete_array(&self, id: ArrayId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .arrays
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::ArrayNotFound(id))
    }
}

#[async_trait]
impl InstanceTypeCatalog for MemoryStore {
    async fn instance_type_by_name(&self, name: &str) -> StoreResult<InstanceType> {
        let state = self.state.read().await;
        state
            .instance_types
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::InstanceTypeNotFound(name.to_string()))
    }
}

#[async_trait]
impl VolumeStore for MemoryStore {
    async fn get_volume(&self, id: VolumeId) -> StoreResult<VolumeRecord> {
        let state = self.state.read().await;
        state
            .volumes
            .get(&id)
            .cloned()
            .ok_or(StoreError::VolumeNotFound(id))
    }

    async fn list_by_array(
        &self,
        array_id: ArrayId,
        direction: Direction,
    ) -> StoreResult<Vec<VolumeRecord>> {
        let state = self.state.read().await;
        Ok(state
            .volumes
            .values()
            .filter(|v| direction.owner(v) == Some(array_id))
            .cloned()
            .collect())
    }

    async fn create_volume(&self, new: NewVolume) -> StoreResult<VolumeRecord> {
        let mut state = self.state.write().await;
        state.next_volume_id += 1;
        let id = VolumeId(state.next_volume_id);

        let (from_array_id, to_array_id) = match new.direction {
            Direction::From => (Some(new.array_id), None),
            Direction::To => (None, Some(new.array_id)),
        };

        let record = VolumeRecord {
            id,
            display_name: new.display_name,
            display_description: new.display_description,
            size: new.size,
            status: "creating".to_string(),
            availability_zone: Some("nova".to_string()),
            created_at: Utc::now(),
            from_array_id,
            to_array_id,
            provider_location: None,
            provider_auth: None,
            instance_id: None,
            mountpoint: None,
        };
        state.volumes.insert(id, record.clone());

        Ok(record)
    }

    async fn update_volume(&self, id: VolumeId, changes: VolumeChanges) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let volume = state
            .volumes
            .get_mut(&id)
            .ok_or(StoreError::VolumeNotFound(id))?;
        changes.apply_to(volume);
        Ok(())
    }

    async fn delete_volume(&self, id: VolumeId) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .volumes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::VolumeNotFound(id))
    }
}
