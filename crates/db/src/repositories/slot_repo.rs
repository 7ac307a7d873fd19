//! Repository for the `slots` table.
//!
//! Occupancy writes (`claim`, `occupy`, `release`) run on a connection the
//! caller already holds inside a transaction; everything else takes the pool.

use sqlx::{PgConnection, PgPool};
use yard_core::slot::SlotState;
use yard_core::types::DbId;

use crate::models::slot::{CreateSlot, Slot, UpdateSlot};

const COLUMNS: &str = "id, slot_row, slot_column, slot_level, state, zone_id";

/// Provides CRUD and occupancy operations for yard slots.
pub struct SlotRepo;

impl SlotRepo {
    /// Insert a new slot. A missing state defaults to `Disponible`.
    pub async fn create(pool: &PgPool, input: &CreateSlot) -> Result<Slot, sqlx::Error> {
        let query = format!(
            "INSERT INTO slots (slot_row, slot_column, slot_level, state, zone_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(input.row)
            .bind(input.column)
            .bind(input.level)
            .bind(input.state.unwrap_or(SlotState::Available).as_str())
            .bind(input.zone_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the slots with the given ids. Unknown ids are skipped; the
    /// result is in id order, not in the order of `ids`.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Slot>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List slots, optionally restricted to one zone and/or one state.
    pub async fn list(
        pool: &PgPool,
        zone_id: Option<DbId>,
        state: Option<SlotState>,
    ) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots
             WHERE ($1::BIGINT IS NULL OR zone_id = $1)
               AND ($2::TEXT IS NULL OR state = $2)
             ORDER BY zone_id, slot_level, slot_row, slot_column"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(zone_id)
            .bind(state.map(SlotState::as_str))
            .fetch_all(pool)
            .await
    }

    /// Every slot of a zone in allocation order: lowest level first, then
    /// row, then column.
    pub async fn list_by_zone(pool: &PgPool, zone_id: DbId) -> Result<Vec<Slot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slots WHERE zone_id = $1
             ORDER BY slot_level, slot_row, slot_column, id"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(zone_id)
            .fetch_all(pool)
            .await
    }

    /// Lock a slot row for the rest of the transaction.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slots WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Apply coordinate, zone and state changes. Only non-`None` fields are
    /// applied; state rules are the caller's responsibility.
    pub async fn update_fields(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateSlot,
    ) -> Result<Option<Slot>, sqlx::Error> {
        let query = format!(
            "UPDATE slots SET
                slot_row = COALESCE($2, slot_row),
                slot_column = COALESCE($3, slot_column),
                slot_level = COALESCE($4, slot_level),
                state = COALESCE($5, state),
                zone_id = COALESCE($6, zone_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slot>(&query)
            .bind(id)
            .bind(input.row)
            .bind(input.column)
            .bind(input.level)
            .bind(input.state.map(SlotState::as_str))
            .bind(input.zone_id)
            .fetch_optional(conn)
            .await
    }

    /// Compare-and-swap `Disponible -> Ocupado`.
    ///
    /// Returns `false` when the slot was not available at the moment of the
    /// write, i.e. a concurrent allocation won it.
    pub async fn claim(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE slots SET state = 'Ocupado' WHERE id = $1 AND state = 'Disponible'",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn occupy(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE slots SET state = 'Ocupado' WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Return an occupied slot to `Disponible`. Slots in any other state are
    /// left alone.
    pub async fn release(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE slots SET state = 'Disponible' WHERE id = $1 AND state = 'Ocupado'")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Fails with a foreign-key violation while tickets reference the slot.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
