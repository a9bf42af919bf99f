//! Child Resource Handler
//!
//! One handler serves both volumes and drives. The `ChildKind` it is built
//! with decides the link column used for listing and ownership, the envelope
//! names, and whether create/update are allowed at all.

use std::sync::Arc;

use crate::audit::{AuditAction, AuditEvent};
use crate::domain::{
    ArrayId, ChildKind, DomainError, NewVolume, OperationContext, VolumeChanges, VolumeId,
    VolumeRecord,
};
use crate::error::{AppError, AppResult};
use crate::projection::{Envelope, ViewMode, VolumeView};
use crate::store::{ArrayStore, VolumeStore};

use super::commands::{unwrap_body, CreateVolumeCommand};
use super::ownership::load_owned;
use super::pagination::Pagination;

/// Handler for volumes or drives of an array
#[derive(Clone)]
pub struct ChildResourceHandler {
    kind: ChildKind,
    arrays: Arc<dyn ArrayStore>,
    volumes: Arc<dyn VolumeStore>,
}

impl ChildResourceHandler {
    pub fn new(kind: ChildKind, arrays: Arc<dyn ArrayStore>, volumes: Arc<dyn VolumeStore>) -> Self {
        Self {
            kind,
            arrays,
            volumes,
        }
    }

    /// Refuse creation outright when the kind does not allow it
    pub fn ensure_create_allowed(&self) -> Result<(), DomainError> {
        if self.kind.allows_create() {
            Ok(())
        } else {
            Err(DomainError::not_permitted(self.kind, "create"))
        }
    }

    /// Refuse updates outright when the kind does not allow it
    pub fn ensure_update_allowed(&self) -> Result<(), DomainError> {
        if self.kind.allows_update() {
            Ok(())
        } else {
            Err(DomainError::not_permitted(self.kind, "update"))
        }
    }

    fn project(&self, record: &VolumeRecord, mode: ViewMode) -> VolumeView {
        VolumeView::project(record, self.kind.direction(), mode)
    }

    /// Children of `array_id` linked through this kind's direction
    pub async fn list(
        &self,
        array_id: ArrayId,
        mode: ViewMode,
        page: Pagination,
    ) -> AppResult<Envelope<Vec<VolumeView>>> {
        tracing::info!(
            kind = %self.kind,
            array_id = %array_id,
            ?mode,
            "Listing {}s of array {}",
            self.kind,
            array_id
        );

        let records = self
            .volumes
            .list_by_array(array_id, self.kind.direction())
            .await?;
        let views = page
            .apply(records)
            .iter()
            .map(|record| self.project(record, mode))
            .collect();

        Ok(Envelope::new(self.kind.collection_name(), views))
    }

    pub async fn show(&self, array_id: ArrayId, id: VolumeId) -> AppResult<Envelope<VolumeView>> {
        tracing::info!(
            kind = %self.kind,
            array_id = %array_id,
            id = %id,
            "Showing {} {} of array {}",
            self.kind,
            id,
            array_id
        );

        let record = load_owned(self.volumes.as_ref(), self.kind, array_id, id).await?;
        Ok(Envelope::new(
            self.kind.member_name(),
            self.project(&record, ViewMode::Detail),
        ))
    }

    /// Create a child linked to `array_id`
    pub async fn create(
        &self,
        array_id: ArrayId,
        body: &[u8],
        context: &OperationContext,
    ) -> AppResult<Envelope<VolumeView>> {
        self.ensure_create_allowed()?;

        let command: CreateVolumeCommand = unwrap_body(body, self.kind.member_name())?;
        command.validate()?;

        // Parent must exist before anything is linked to it
        self.arrays.get_array(array_id).await?;

        let record = self
            .volumes
            .create_volume(NewVolume {
                size: command.size,
                display_name: command.display_name,
                display_description: command.display_description,
                array_id,
                direction: self.kind.direction(),
            })
            .await?;

        AuditEvent::new(AuditAction::VolumeCreated)
            .resource_type(self.kind.member_name())
            .resource_id(record.id)
            .array_id(array_id)
            .summary(format!(
                "Create {} of {} GB from array {}",
                self.kind, command.size, array_id
            ))
            .emit(context);

        Ok(Envelope::new(
            self.kind.member_name(),
            self.project(&record, ViewMode::Detail),
        ))
    }

    /// Apply the whitelisted fields of a `{"<member>": {...}}` body
    ///
    /// Keys outside the whitelist are dropped. An update with no whitelisted
    /// key still reaches the store as an empty change set.
    pub async fn update(
        &self,
        array_id: ArrayId,
        id: VolumeId,
        body: &[u8],
        context: &OperationContext,
    ) -> AppResult<()> {
        self.ensure_update_allowed()?;

        load_owned(self.volumes.as_ref(), self.kind, array_id, id).await?;

        let changes: VolumeChanges = unwrap_body(body, self.kind.member_name())?;
        let changed_fields = changes.changed_fields();

        self.volumes
            .update_volume(id, changes)
            .await
            .map_err(|e| AppError::from_child_store(self.kind, e))?;

        AuditEvent::new(AuditAction::VolumeUpdated)
            .resource_type(self.kind.member_name())
            .resource_id(id)
            .array_id(array_id)
            .changed_fields(changed_fields)
            .emit(context);

        Ok(())
    }

    pub async fn delete(
        &self,
        array_id: ArrayId,
        id: VolumeId,
        context: &OperationContext,
    ) -> AppResult<()> {
        load_owned(self.volumes.as_ref(), self.kind, array_id, id).await?;

        self.volumes
            .delete_volume(id)
            .await
            .map_err(|e| AppError::from_child_store(self.kind, e))?;

        AuditEvent::new(AuditAction::child_deleted(self.kind))
            .resource_type(self.kind.member_name())
            .resource_id(id)
            .array_id(array_id)
            .emit(context);

        Ok(())
    }
}
