//! Storage records
//!
//! Internal representations of arrays and volumes as returned by the
//! persistence layer. These never go on the wire directly; see
//! `crate::projection` for the external views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::direction::Direction;
use super::ids::{ArrayId, InstanceTypeId, VolumeId};

/// Array name derived from its id
pub fn array_name(id: ArrayId) -> String {
    format!("vsa-{:08x}", id.value())
}

/// Volume name derived from its id
pub fn volume_name(id: VolumeId) -> String {
    format!("volume-{:08x}", id.value())
}

// =========================================================================
// Instance types
// =========================================================================

/// Instance type used for the array's virtual controllers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceType {
    pub id: InstanceTypeId,
    pub name: String,
    pub memory_mb: i32,
    pub vcpus: i32,
    pub local_gb: i32,
}

// =========================================================================
// Arrays
// =========================================================================

/// Lifecycle state of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayStatus {
    Creating,
    Launching,
    Created,
    Partial,
    Failed,
    Deleting,
}

impl ArrayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayStatus::Creating => "creating",
            ArrayStatus::Launching => "launching",
            ArrayStatus::Created => "created",
            ArrayStatus::Partial => "partial",
            ArrayStatus::Failed => "failed",
            ArrayStatus::Deleting => "deleting",
        }
    }
}

impl std::str::FromStr for ArrayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creating" => Ok(ArrayStatus::Creating),
            "launching" => Ok(ArrayStatus::Launching),
            "created" => Ok(ArrayStatus::Created),
            "partial" => Ok(ArrayStatus::Partial),
            "failed" => Ok(ArrayStatus::Failed),
            "deleting" => Ok(ArrayStatus::Deleting),
            other => Err(format!("unknown array status: {}", other)),
        }
    }
}

/// Virtual storage array record
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayRecord {
    pub id: ArrayId,
    pub name: String,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: ArrayStatus,
    pub instance_type: Option<InstanceType>,
    /// Number of virtual controllers
    pub vc_count: i32,
    /// Number of live drives allocated to this array
    pub drive_count: i64,
    pub availability_zone: Option<String>,
    /// Opaque storage request passed through from create
    pub storage: Option<serde_json::Value>,
    pub shared: bool,
}

/// Values needed to create an array
#[derive(Debug, Clone, PartialEq)]
pub struct NewArray {
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub instance_type: InstanceType,
    pub vc_count: i32,
    pub availability_zone: Option<String>,
    pub storage: Option<serde_json::Value>,
    pub shared: bool,
}

// =========================================================================
// Volumes and drives
// =========================================================================

/// Volume record, shared by volumes and drives
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeRecord {
    pub id: VolumeId,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    /// Size in GB
    pub size: i64,
    pub status: String,
    pub availability_zone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub from_array_id: Option<ArrayId>,
    pub to_array_id: Option<ArrayId>,
    pub provider_location: Option<String>,
    pub provider_auth: Option<String>,
    /// Server this volume is attached to, if any
    pub instance_id: Option<i64>,
    pub mountpoint: Option<String>,
}

impl VolumeRecord {
    pub fn name(&self) -> String {
        volume_name(self.id)
    }

    #[cfg(test)]
    pub fn sample(id: VolumeId) -> Self {
        Self {
            id,
            display_name: Some(format!("vol-{}", id)),
            display_description: None,
            size: 1,
            status: "available".to_string(),
            availability_zone: Some("nova".to_string()),
            created_at: Utc::now(),
            from_array_id: None,
            to_array_id: None,
            provider_location: None,
            provider_auth: None,
            instance_id: None,
            mountpoint: None,
        }
    }
}

/// Values needed to create a volume linked to an array
#[derive(Debug, Clone, PartialEq)]
pub struct NewVolume {
    pub size: i64,
    pub display_name: Option<String>,
    pub display_description: Option<String>,
    pub array_id: ArrayId,
    /// Which link column receives `array_id`
    pub direction: Direction,
}

/// Whitelisted volume update
///
/// Only these fields may be changed through the API. Keys outside the
/// whitelist are ignored on deserialization. Each field is read from its
/// internal snake_case key, falling back to the camelCase name; when both are
/// present the snake_case key wins and the other is ignored. Nullable fields
/// distinguish an absent key (`None`) from an explicit null (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct VolumeChanges {
    pub display_name: Option<Option<String>>,
    pub display_description: Option<Option<String>>,
    pub status: Option<String>,
    pub provider_location: Option<Option<String>>,
    pub provider_auth: Option<Option<String>>,
}

impl TryFrom<Map<String, Value>> for VolumeChanges {
    type Error = String;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            display_name: take_field(&mut body, "display_name", "displayName")?,
            display_description: take_field(
                &mut body,
                "display_description",
                "displayDescription",
            )?,
            // A null status leaves the status alone
            status: take_field(&mut body, "status", "status")?.flatten(),
            provider_location: take_field(&mut body, "provider_location", "providerLocation")?,
            provider_auth: take_field(&mut body, "provider_auth", "providerAuth")?,
        })
    }
}

/// Present key (even `null`) becomes `Some(..)`
fn take_field(
    body: &mut Map<String, Value>,
    key: &str,
    external: &str,
) -> Result<Option<Option<String>>, String> {
    let Some(value) = body.remove(key).or_else(|| body.remove(external)) else {
        return Ok(None);
    };

    match value {
        Value::Null => Ok(Some(None)),
        Value::String(value) => Ok(Some(Some(value))),
        other => Err(format!("{} must be a string or null, got {}", key, other)),
    }
}

impl VolumeChanges {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Internal names of the fields this update touches
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.display_name.is_some() {
            fields.push("display_name");
        }
        if self.display_description.is_some() {
            fields.push("display_description");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.provider_location.is_some() {
            fields.push("provider_location");
        }
        if self.provider_auth.is_some() {
            fields.push("provider_auth");
        }
        fields
    }

    /// Apply the changes to a record in place
    pub fn apply_to(&self, record: &mut VolumeRecord) {
        if let Some(value) = &self.display_name {
            record.display_name = value.clone();
        }
        if let Some(value) = &self.display_description {
            record.display_description = value.clone();
        }
        if let Some(value) = &self.status {
            record.status = value.clone();
        }
        if let Some(value) = &self.provider_location {
            record.provider_location = value.clone();
        }
        if let Some(value) = &self.provider_auth {
            record.provider_auth = value.clone();
        }
    }
}
