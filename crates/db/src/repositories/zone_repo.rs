//! Repository for the `zones` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::zone::{CreateZone, UpdateZone, Zone, ZoneOccupancy};

const COLUMNS: &str = "id, name, capacity";

/// Provides CRUD operations and occupancy counts for storage zones.
pub struct ZoneRepo;

impl ZoneRepo {
    pub async fn create(pool: &PgPool, input: &CreateZone) -> Result<Zone, sqlx::Error> {
        let query =
            format!("INSERT INTO zones (name, capacity) VALUES ($1, $2) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Zone>(&query)
            .bind(&input.name)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Zone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zones WHERE id = $1");
        sqlx::query_as::<_, Zone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Zone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zones WHERE name = $1");
        sqlx::query_as::<_, Zone>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Zone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM zones ORDER BY name, id");
        sqlx::query_as::<_, Zone>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateZone,
    ) -> Result<Option<Zone>, sqlx::Error> {
        let query = format!(
            "UPDATE zones SET
                name = COALESCE($2, name),
                capacity = COALESCE($3, capacity)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Zone>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.capacity)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a zone's slots per occupancy state.
    ///
    /// Returns `None` if the zone does not exist. A zone without slots
    /// reports zero for every count.
    pub async fn occupancy(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ZoneOccupancy>, sqlx::Error> {
        sqlx::query_as::<_, ZoneOccupancy>(
            "SELECT z.id AS zone_id, z.name, z.capacity, \
                    COUNT(s.id) AS total, \
                    COUNT(s.id) FILTER (WHERE s.state = 'Disponible') AS available, \
                    COUNT(s.id) FILTER (WHERE s.state = 'Ocupado') AS occupied, \
                    COUNT(s.id) FILTER (WHERE s.state = 'Mantenimiento') AS maintenance \
             FROM zones z \
             LEFT JOIN slots s ON s.zone_id = z.id \
             WHERE z.id = $1 \
             GROUP BY z.id, z.name, z.capacity",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
