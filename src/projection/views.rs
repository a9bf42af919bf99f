//! External views
//!
//! Pure mappings from store records to the shapes returned by the API, in
//! summary or detailed form. Only the fields listed here ever leave the
//! service; provider credentials and direction links stay internal.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{ArrayId, ArrayRecord, ArrayStatus, Direction, VolumeId, VolumeRecord};

/// Summary or detailed projection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Summary,
    Detail,
}

impl ViewMode {
    pub fn is_detail(&self) -> bool {
        matches!(self, ViewMode::Detail)
    }
}

// =========================================================================
// Arrays
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayView {
    pub id: ArrayId,
    pub name: String,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub create_time: DateTime<Utc>,
    pub status: ArrayStatus,
    /// Instance type name, null when the array has none
    pub vc_type: Option<String>,
    pub vc_count: i32,
    pub drive_count: i64,
    /// Detailed view only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<Option<String>>,
}

impl ArrayView {
    pub fn project(record: &ArrayRecord, mode: ViewMode) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            display_name: record.display_name.clone(),
            display_description: record.display_description.clone(),
            create_time: record.created_at,
            status: record.status,
            vc_type: record.instance_type.as_ref().map(|t| t.name.clone()),
            vc_count: record.vc_count,
            drive_count: record.drive_count,
            availability_zone: mode
                .is_detail()
                .then(|| record.availability_zone.clone()),
        }
    }
}

// =========================================================================
// Volumes and drives
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub id: VolumeId,
    pub volume_id: VolumeId,
    pub server_id: i64,
    /// Detailed view only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeView {
    pub id: VolumeId,
    pub name: String,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub status: String,
    pub size: i64,
    pub availability_zone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub attachments: Vec<AttachmentView>,
    /// Owning array, read through the kind's direction link
    pub vsa_id: Option<ArrayId>,
}

impl VolumeView {
    pub fn project(record: &VolumeRecord, direction: Direction, mode: ViewMode) -> Self {
        let attachments = record
            .instance_id
            .map(|server_id| AttachmentView {
                id: record.id,
                volume_id: record.id,
                server_id,
                device: mode.is_detail().then(|| record.mountpoint.clone()),
            })
            .into_iter()
            .collect();

        Self {
            id: record.id,
            name: record.name(),
            display_name: record.display_name.clone(),
            display_description: record.display_description.clone(),
            status: record.status.clone(),
            size: record.size,
            availability_zone: record.availability_zone.clone(),
            created_at: record.created_at,
            attachments,
            vsa_id: direction.owner(record),
        }
    }
}
