//! Postgres store
//!
//! sqlx-backed implementation of the store traits. Deletes are soft: rows get
//! a `deleted_at` timestamp and every read filters them out.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::records::array_name;
use crate::domain::{
    ArrayId, ArrayRecord, ArrayStatus, Direction, InstanceType, InstanceTypeId, NewArray,
    NewVolume, VolumeChanges, VolumeId, VolumeRecord,
};

use super::{ArrayStore, InstanceTypeCatalog, StoreError, StoreResult, VolumeStore};

const ARRAY_SELECT: &str = r#"
    SELECT a.id, a.display_name, a.display_description, a.status, a.vc_count,
           a.availability_zone, a.storage, a.shared, a.created_at,
           t.id AS type_id, t.name AS type_name, t.memory_mb, t.vcpus, t.local_gb,
           (SELECT COUNT(*) FROM volumes v
             WHERE v.to_array_id = a.id AND v.deleted_at IS NULL) AS drive_count
    FROM virtual_storage_arrays a
    LEFT JOIN instance_types t ON t.id = a.instance_type_id
    WHERE a.deleted_at IS NULL
"#;

const VOLUME_SELECT: &str = r#"
    SELECT id, display_name, display_description, size, status, availability_zone,
           created_at, from_array_id, to_array_id, provider_location, provider_auth,
           instance_id, mountpoint
    FROM volumes
    WHERE deleted_at IS NULL
"#;

/// Store backed by a Postgres pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =========================================================================
// Row mapping
// =========================================================================

fn array_from_row(row: &PgRow) -> StoreResult<ArrayRecord> {
    let id = ArrayId(row.try_get("id")?);
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<ArrayStatus>()
        .map_err(StoreError::InvalidData)?;

    let type_id: Option<i64> = row.try_get("type_id")?;
    let instance_type = match type_id {
        Some(type_id) => Some(InstanceType {
            id: InstanceTypeId(type_id),
            name: row.try_get("type_name")?,
            memory_mb: row.try_get("memory_mb")?,
            vcpus: row.try_get("vcpus")?,
            local_gb: row.try_get("local_gb")?,
        }),
        None => None,
    };

    Ok(ArrayRecord {
        id,
        name: array_name(id),
        display_name: row.try_get("display_name")?,
        display_description: row.try_get("display_description")?,
        created_at: row.try_get("created_at")?,
        status,
        instance_type,
        vc_count: row.try_get("vc_count")?,
        drive_count: row.try_get("drive_count")?,
        availability_zone: row.try_get("availability_zone")?,
        storage: row.try_get("storage")?,
        shared: row.try_get("shared")?,
    })
}

fn volume_from_row(row: &PgRow) -> StoreResult<VolumeRecord> {
    let from_array_id: Option<i64> = row.try_get("from_array_id")?;
    let to_array_id: Option<i64> = row.try_get("to_array_id")?;

    Ok(VolumeRecord {
        id: VolumeId(row.try_get("id")?),
        display_name: row.try_get("display_name")?,
        display_description: row.try_get("display_description")?,
        size: row.try_get("size")?,
        status: row.try_get("status")?,
        availability_zone: row.try_get("availability_zone")?,
        created_at: row.try_get("created_at")?,
        from_array_id: from_array_id.map(ArrayId),
        to_array_id: to_array_id.map(ArrayId),
        provider_location: row.try_get("provider_location")?,
        provider_auth: row.try_get("provider_auth")?,
        instance_id: row.try_get("instance_id")?,
        mountpoint: row.try_get("mountpoint")?,
    })
}

// =========================================================================
// Arrays
// =========================================================================

#[async_trait]
impl ArrayStore for PgStore {
    async fn list_arrays(&self) -> StoreResult<Vec<ArrayRecord>> {
        let rows = sqlx::query(&format!("{} ORDER BY a.id", ARRAY_SELECT))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(array_from_row).collect()
    }

    async fn get_array(&self, id: ArrayId) -> StoreResult<ArrayRecord> {
        let row = sqlx::query(&format!("{} AND a.id = $1", ARRAY_SELECT))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::ArrayNotFound(id))?;

        array_from_row(&row)
    }

    async fn create_array(&self, new: NewArray) -> StoreResult<ArrayRecord> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO virtual_storage_arrays (
                display_name, display_description, status, instance_type_id,
                vc_count, availability_zone, storage, shared
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&new.display_name)
        .bind(&new.display_description)
        .bind(ArrayStatus::Creating.as_str())
        .bind(new.instance_type.id.value())
        .bind(new.vc_count)
        .bind(&new.availability_zone)
        .bind(&new.storage)
        .bind(new.shared)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(array_id = id, "Array row inserted");

        self.get_array(ArrayId(id)).await
    }

    async fn delete_array(&self, id: ArrayId) -> StoreResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE virtual_storage_arrays
            SET status = $2, deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.value())
        .bind(ArrayStatus::Deleting.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::ArrayNotFound(id));
        }
        Ok(())
    }
}

// =========================================================================
// Instance types
// =========================================================================

#[async_trait]
impl InstanceTypeCatalog for PgStore {
    async fn instance_type_by_name(&self, name: &str) -> StoreResult<InstanceType> {
        let row: Option<(i64, String, i32, i32, i32)> = sqlx::query_as(
            r#"
            SELECT id, name, memory_mb, vcpus, local_gb
            FROM instance_types
            WHERE name = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        let (id, name, memory_mb, vcpus, local_gb) =
            row.ok_or_else(|| StoreError::InstanceTypeNotFound(name.to_string()))?;

        Ok(InstanceType {
            id: InstanceTypeId(id),
            name,
            memory_mb,
            vcpus,
            local_gb,
        })
    }
}

// =========================================================================
// Volumes
// =========================================================================

#[async_trait]
impl VolumeStore for PgStore {
    async fn get_volume(&self, id: VolumeId) -> StoreResult<VolumeRecord> {
        let row = sqlx::query(&format!("{} AND id = $1", VOLUME_SELECT))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::VolumeNotFound(id))?;

        volume_from_row(&row)
    }

    async fn list_by_array(
        &self,
        array_id: ArrayId,
        direction: Direction,
    ) -> StoreResult<Vec<VolumeRecord>> {
        let query = format!(
            "{} AND {} = $1 ORDER BY id",
            VOLUME_SELECT,
            direction.link_column()
        );
        let rows = sqlx::query(&query)
            .bind(array_id.value())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(volume_from_row).collect()
    }

    async fn create_volume(&self, new: NewVolume) -> StoreResult<VolumeRecord> {
        let query = format!(
            r#"
            INSERT INTO volumes (size, display_name, display_description, status, {})
            VALUES ($1, $2, $3, 'creating', $4)
            RETURNING id
            "#,
            new.direction.link_column()
        );
        let id: i64 = sqlx::query_scalar(&query)
            .bind(new.size)
            .bind(&new.display_name)
            .bind(&new.display_description)
            .bind(new.array_id.value())
            .fetch_one(&self.pool)
            .await?;

        self.get_volume(VolumeId(id)).await
    }

    async fn update_volume(&self, id: VolumeId, changes: VolumeChanges) -> StoreResult<()> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE volumes SET updated_at = NOW()");

        if let Some(value) = changes.display_name {
            builder.push(", display_name = ").push_bind(value);
        }
        if let Some(value) = changes.display_description {
            builder.push(", display_description = ").push_bind(value);
        }
        if let Some(value) = changes.status {
            builder.push(", status = ").push_bind(value);
        }
        if let Some(value) = changes.provider_location {
            builder.push(", provider_location = ").push_bind(value);
        }
        if let Some(value) = changes.provider_auth {
            builder.push(", provider_auth = ").push_bind(value);
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id.value())
            .push(" AND deleted_at IS NULL");

        let rows_affected = builder
            .build()
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::VolumeNotFound(id));
        }
        Ok(())
    }

    async fn delete_volume(&self, id: VolumeId) -> StoreResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE volumes
            SET status = 'deleting', deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.value())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::VolumeNotFound(id));
        }
        Ok(())
    }
}
