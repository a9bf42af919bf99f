//! Ownership validation
//!
//! A child resource addressed as `/arrays/{P}/<kind>/{C}` must be linked to
//! array `P` through the link column its kind's direction names. This check
//! runs before every id-scoped child operation.

use crate::domain::{ArrayId, ChildKind, DomainError, VolumeId, VolumeRecord};
use crate::error::{AppError, AppResult};
use crate::store::VolumeStore;

/// Confirm that `record` belongs to `array_id` under `kind`'s direction
pub fn validate_ownership(
    kind: ChildKind,
    array_id: ArrayId,
    record: &VolumeRecord,
) -> Result<(), DomainError> {
    let owner = kind.direction().owner(record);
    if owner == Some(array_id) {
        return Ok(());
    }

    tracing::error!(
        kind = %kind,
        id = %record.id,
        owner = ?owner.map(ArrayId::value),
        requested = %array_id,
        "{} with ID {} belongs to array {:?} and not to array {}",
        kind,
        record.id,
        owner.map(ArrayId::value),
        array_id
    );

    Err(DomainError::ownership_mismatch(
        kind, record.id, owner, array_id,
    ))
}

/// Load a child record and confirm it belongs to `array_id`
pub async fn load_owned(
    volumes: &dyn VolumeStore,
    kind: ChildKind,
    array_id: ArrayId,
    id: VolumeId,
) -> AppResult<VolumeRecord> {
    let record = volumes.get_volume(id).await.map_err(|e| {
        if e.is_not_found() {
            tracing::error!(kind = %kind, id = %id, "{} with ID {} not found", kind, id);
        }
        AppError::from_child_store(kind, e)
    })?;

    validate_ownership(kind, array_id, &record)?;
    Ok(record)
}
