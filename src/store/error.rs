//! Store Errors
//!
//! Error types for persistence operations.

use crate::domain::{ArrayId, VolumeId};

/// Errors that can occur in the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Array not found
    #[error("Array not found: {0}")]
    ArrayNotFound(ArrayId),

    /// Volume or drive not found
    #[error("Volume not found: {0}")]
    VolumeNotFound(VolumeId),

    /// Instance type name not in the catalog
    #[error("Instance type not found: {0}")]
    InstanceTypeNotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Row could not be mapped to a record
    #[error("Invalid record data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// Check if this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::ArrayNotFound(_)
                | StoreError::VolumeNotFound(_)
                | StoreError::InstanceTypeNotFound(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
