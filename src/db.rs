//! Database module
//!
//! Connectivity and schema checks for the postgres backend.

use sqlx::PgPool;

/// Tables the postgres store reads and writes
const REQUIRED_TABLES: &[&str] = &["instance_types", "virtual_storage_arrays", "volumes"];

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for table in REQUIRED_TABLES {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    let instance_types: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM instance_types")
        .fetch_one(pool)
        .await?;
    if instance_types == 0 {
        tracing::warn!("No instance types are defined; array creation will fail");
    }

    Ok(true)
}
