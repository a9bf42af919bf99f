//! Domain module
//!
//! Core domain types: identifiers, storage records, the child direction
//! policy and request context.

pub mod context;
pub mod direction;
pub mod error;
pub mod ids;
pub mod records;

pub use context::OperationContext;
pub use direction::{ChildKind, Direction};
pub use error::DomainError;
pub use ids::{ArrayId, InstanceTypeId, InvalidId, VolumeId};
pub use records::{
    ArrayRecord, ArrayStatus, InstanceType, NewArray, NewVolume, VolumeChanges, VolumeRecord,
};
