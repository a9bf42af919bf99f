//! Domain Error Types
//!
//! Errors raised by the direction policy and ownership rules. They are
//! independent of the web/infrastructure layer.

use thiserror::Error;

use super::direction::ChildKind;
use super::ids::{ArrayId, VolumeId};

/// Domain-specific errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Child resource exists but is linked to another array (or none)
    #[error("{kind} {id} does not belong to array {requested}")]
    OwnershipMismatch {
        kind: ChildKind,
        id: VolumeId,
        owner: Option<ArrayId>,
        requested: ArrayId,
    },

    /// The direction policy forbids this operation for the resource kind
    #[error("{operation} is not permitted for {kind} resources")]
    OperationNotPermitted {
        kind: ChildKind,
        operation: &'static str,
    },
}

impl DomainError {
    pub fn ownership_mismatch(
        kind: ChildKind,
        id: VolumeId,
        owner: Option<ArrayId>,
        requested: ArrayId,
    ) -> Self {
        Self::OwnershipMismatch {
            kind,
            id,
            owner,
            requested,
        }
    }

    pub fn not_permitted(kind: ChildKind, operation: &'static str) -> Self {
        Self::OperationNotPermitted { kind, operation }
    }
}
