//! Command definitions
//!
//! Request bodies for array and child resource operations, and the shared
//! unwrapping of `{"<resource>": {...}}` envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Parse a raw body and return the object stored under `root`
///
/// An absent body, an empty object, or a body without the `root` object is
/// malformed.
pub fn unwrap_body<T: DeserializeOwned>(body: &[u8], root: &str) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::MalformedRequest("request body is required".to_string()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::MalformedRequest(format!("invalid JSON: {}", e)))?;

    let mut object = match value {
        Value::Object(object) if !object.is_empty() => object,
        _ => {
            return Err(AppError::MalformedRequest(
                "request body must be a non-empty object".to_string(),
            ))
        }
    };

    let inner = match object.remove(root) {
        Some(inner @ Value::Object(_)) => inner,
        _ => {
            return Err(AppError::MalformedRequest(format!(
                "missing '{}' object",
                root
            )))
        }
    };

    serde_json::from_value(inner).map_err(|e| AppError::MalformedRequest(e.to_string()))
}

// =========================================================================
// Arrays
// =========================================================================

/// Placement hint for a new array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    #[serde(rename = "AvailabilityZone", default)]
    pub availability_zone: Option<String>,
}

/// Body of `POST /arrays` under the `vsa` key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArrayCommand {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub display_description: Option<String>,
    /// Instance type name; falls back to the configured default
    #[serde(default)]
    pub vc_type: Option<String>,
    /// Opaque storage request, passed through to the store
    #[serde(default)]
    pub storage: Option<Value>,
    #[serde(default)]
    pub shared: Option<bool>,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl CreateArrayCommand {
    pub fn availability_zone(&self) -> Option<String> {
        self.placement
            .as_ref()
            .and_then(|p| p.availability_zone.clone())
    }
}

// =========================================================================
// Volumes
// =========================================================================

/// Body of `POST /arrays/{id}/volumes` under the `volume` key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolumeCommand {
    /// Size in GB
    pub size: i64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub display_description: Option<String>,
}

impl CreateVolumeCommand {
    pub fn new(size: i64) -> Self {
        Self {
            size,
            display_name: None,
            display_description: None,
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.size <= 0 {
            return Err(AppError::MalformedRequest(format!(
                "size must be a positive number of GB, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::VolumeChanges;

    #[test]
    fn test_unwrap_create_array() {
        let body = br#"{"vsa": {"displayName": "arr1", "storage": "10GB",
                        "placement": {"AvailabilityZone": "zone-a"}}}"#;
        let command: CreateArrayCommand = unwrap_body(body, "vsa").unwrap();

        assert_eq!(command.display_name.as_deref(), Some("arr1"));
        assert_eq!(command.storage, Some(Value::String("10GB".to_string())));
        assert_eq!(command.vc_type, None);
        assert_eq!(command.availability_zone().as_deref(), Some("zone-a"));
    }

    #[test]
    fn test_empty_body_is_malformed() {
        let bodies: [&[u8]; 5] = [b"", b"   ", b"{}", b"null", b"[]"];
        for body in bodies {
            let result: AppResult<CreateArrayCommand> = unwrap_body(body, "vsa");
            assert!(matches!(result, Err(AppError::MalformedRequest(_))));
        }
    }

    #[test]
    fn test_missing_root_is_malformed() {
        let result: AppResult<CreateVolumeCommand> =
            unwrap_body(br#"{"drive": {"size": 3}}"#, "volume");
        assert!(matches!(result, Err(AppError::MalformedRequest(ref m)) if m.contains("volume")));
    }

    #[test]
    fn test_create_volume_requires_size() {
        let result: AppResult<CreateVolumeCommand> =
            unwrap_body(br#"{"volume": {"displayName": "v"}}"#, "volume");
        assert!(matches!(result, Err(AppError::MalformedRequest(_))));

        let command: CreateVolumeCommand =
            unwrap_body(br#"{"volume": {"size": 3}}"#, "volume").unwrap();
        assert_eq!(command, CreateVolumeCommand::new(3));
        assert!(command.validate().is_ok());
    }

    #[test]
    fn test_non_positive_size_is_rejected() {
        assert!(CreateVolumeCommand::new(0).validate().is_err());
        assert!(CreateVolumeCommand::new(-4).validate().is_err());
    }

    #[test]
    fn test_unwrap_update_body() {
        let changes: VolumeChanges = unwrap_body(
            br#"{"volume": {"status": "error", "size": 500}}"#,
            "volume",
        )
        .unwrap();
        assert_eq!(changes.changed_fields(), vec!["status"]);
    }

    #[test]
    fn test_update_body_with_both_spellings() {
        let changes: VolumeChanges = unwrap_body(
            br#"{"volume": {"display_name": "a", "displayName": "b"}}"#,
            "volume",
        )
        .unwrap();
        assert_eq!(changes.display_name, Some(Some("a".to_string())));
        assert_eq!(changes.changed_fields(), vec!["display_name"]);
    }
}
