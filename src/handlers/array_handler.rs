//! Array Handler
//!
//! CRUD for virtual storage arrays. Arrays have no parent, so there is no
//! ownership step here.

use std::sync::Arc;

use crate::audit::{AuditAction, AuditEvent};
use crate::config::ApiSettings;
use crate::domain::{ArrayId, NewArray, OperationContext};
use crate::error::AppResult;
use crate::projection::{ArrayView, Envelope, ViewMode};
use crate::store::{ArrayStore, InstanceTypeCatalog};

use super::commands::{unwrap_body, CreateArrayCommand};
use super::pagination::Pagination;

pub const ARRAY_MEMBER: &str = "vsa";
pub const ARRAY_COLLECTION: &str = "vsaSet";

/// Handler for array operations
#[derive(Clone)]
pub struct ArrayHandler {
    arrays: Arc<dyn ArrayStore>,
    instance_types: Arc<dyn InstanceTypeCatalog>,
    settings: Arc<ApiSettings>,
}

impl ArrayHandler {
    pub fn new(
        arrays: Arc<dyn ArrayStore>,
        instance_types: Arc<dyn InstanceTypeCatalog>,
        settings: Arc<ApiSettings>,
    ) -> Self {
        Self {
            arrays,
            instance_types,
            settings,
        }
    }

    /// Summary or detailed list of arrays
    pub async fn list(
        &self,
        mode: ViewMode,
        page: Pagination,
    ) -> AppResult<Envelope<Vec<ArrayView>>> {
        tracing::info!(?mode, "Listing arrays");

        let arrays = self.arrays.list_arrays().await?;
        let views = page
            .apply(arrays)
            .iter()
            .map(|record| ArrayView::project(record, mode))
            .collect();

        Ok(Envelope::new(ARRAY_COLLECTION, views))
    }

    pub async fn show(&self, id: ArrayId) -> AppResult<Envelope<ArrayView>> {
        tracing::info!(array_id = %id, "Showing array {}", id);

        let record = self.arrays.get_array(id).await?;
        Ok(Envelope::new(
            ARRAY_MEMBER,
            ArrayView::project(&record, ViewMode::Detail),
        ))
    }

    /// Create an array from a `{"vsa": {...}}` body
    ///
    /// An unknown `vcType` is a 404 rather than a 400: type names are a
    /// catalog lookup.
    pub async fn create(
        &self,
        body: &[u8],
        context: &OperationContext,
    ) -> AppResult<Envelope<ArrayView>> {
        let command: CreateArrayCommand = unwrap_body(body, ARRAY_MEMBER)?;

        let vc_type = command
            .vc_type
            .clone()
            .unwrap_or_else(|| self.settings.default_instance_type.clone());
        let instance_type = self.instance_types.instance_type_by_name(&vc_type).await?;

        let record = self
            .arrays
            .create_array(NewArray {
                display_name: command.display_name.clone(),
                display_description: command.display_description.clone(),
                instance_type,
                vc_count: self.settings.vc_count,
                availability_zone: command.availability_zone(),
                storage: command.storage.clone(),
                shared: command.shared.unwrap_or(false),
            })
            .await?;

        AuditEvent::new(AuditAction::ArrayCreated)
            .resource_type("array")
            .resource_id(record.id)
            .summary(format!(
                "Create VSA {} of type {}",
                command.display_name.as_deref().unwrap_or("<unnamed>"),
                vc_type
            ))
            .emit(context);

        Ok(Envelope::new(
            ARRAY_MEMBER,
            ArrayView::project(&record, ViewMode::Detail),
        ))
    }

    pub async fn delete(&self, id: ArrayId, context: &OperationContext) -> AppResult<()> {
        self.arrays.delete_array(id).await?;

        AuditEvent::new(AuditAction::ArrayDeleted)
            .resource_type("array")
            .resource_id(id)
            .emit(context);

        Ok(())
    }
}
