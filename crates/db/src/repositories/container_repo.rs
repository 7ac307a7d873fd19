//! Repository for the `containers` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::container::{Container, CreateContainer, UpdateContainer};

/// Select list for [`Container`], joined with the vessel's name.
const SELECT: &str = "SELECT c.id, c.barcode, c.container_number, c.dimensions, \
        c.container_type, c.weight, c.vessel_id, v.name AS vessel_name, c.appointment_id \
     FROM containers c \
     JOIN vessels v ON v.id = c.vessel_id";

/// Provides CRUD operations for containers.
pub struct ContainerRepo;

impl ContainerRepo {
    pub async fn create(pool: &PgPool, input: &CreateContainer) -> Result<Container, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO containers (barcode, container_number, dimensions, container_type, \
                                     weight, vessel_id, appointment_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&input.barcode)
        .bind(&input.container_number)
        .bind(&input.dimensions)
        .bind(&input.container_type)
        .bind(input.weight)
        .bind(input.vessel_id)
        .bind(input.appointment_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Container>, sqlx::Error> {
        let query = format!("{SELECT} WHERE c.id = $1");
        sqlx::query_as::<_, Container>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_barcode(
        pool: &PgPool,
        barcode: &str,
    ) -> Result<Option<Container>, sqlx::Error> {
        let query = format!("{SELECT} WHERE c.barcode = $1");
        sqlx::query_as::<_, Container>(&query)
            .bind(barcode)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Container>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY c.id");
        sqlx::query_as::<_, Container>(&query).fetch_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateContainer,
    ) -> Result<Option<Container>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE containers SET
                barcode = COALESCE($2, barcode),
                container_number = COALESCE($3, container_number),
                dimensions = COALESCE($4, dimensions),
                container_type = COALESCE($5, container_type),
                weight = COALESCE($6, weight),
                vessel_id = COALESCE($7, vessel_id),
                appointment_id = COALESCE($8, appointment_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.barcode)
        .bind(&input.container_number)
        .bind(&input.dimensions)
        .bind(&input.container_type)
        .bind(input.weight)
        .bind(input.vessel_id)
        .bind(input.appointment_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM containers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
