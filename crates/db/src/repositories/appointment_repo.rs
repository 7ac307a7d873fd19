//! Repository for the `appointments` table.

use sqlx::PgPool;
use yard_core::types::DbId;

use crate::models::appointment::{
    Appointment, CreateAppointment, UpdateAppointment, DEFAULT_APPOINTMENT_STATE,
};

/// Select list for [`Appointment`], joined with the client's name and email.
const SELECT: &str = "SELECT ap.id, ap.shipped_on, ap.pickup_on, ap.travel_days, ap.state, \
        ap.client_id, u.name AS client_name, u.email AS client_email, ap.created_at \
     FROM appointments ap \
     LEFT JOIN users u ON u.id = ap.client_id";

/// Provides CRUD operations for pickup appointments.
pub struct AppointmentRepo;

impl AppointmentRepo {
    /// Insert an appointment and return it with the client fields resolved.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAppointment,
    ) -> Result<Appointment, sqlx::Error> {
        let id: DbId = sqlx::query_scalar(
            "INSERT INTO appointments (shipped_on, pickup_on, travel_days, state, client_id)
             VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, $5), $6)
             RETURNING id",
        )
        .bind(input.shipped_on)
        .bind(input.pickup_on)
        .bind(input.travel_days)
        .bind(&input.state)
        .bind(DEFAULT_APPOINTMENT_STATE)
        .bind(input.client_id)
        .fetch_one(pool)
        .await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Appointment>, sqlx::Error> {
        let query = format!("{SELECT} WHERE ap.id = $1");
        sqlx::query_as::<_, Appointment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List appointments, soonest pickup first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Appointment>, sqlx::Error> {
        let query = format!("{SELECT} ORDER BY ap.pickup_on NULLS LAST, ap.id");
        sqlx::query_as::<_, Appointment>(&query)
            .fetch_all(pool)
            .await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAppointment,
    ) -> Result<Option<Appointment>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE appointments SET
                shipped_on = COALESCE($2, shipped_on),
                pickup_on = COALESCE($3, pickup_on),
                travel_days = COALESCE($4, travel_days),
                state = COALESCE($5, state),
                client_id = COALESCE($6, client_id)
             WHERE id = $1",
        )
        .bind(id)
        .bind(input.shipped_on)
        .bind(input.pickup_on)
        .bind(input.travel_days)
        .bind(&input.state)
        .bind(input.client_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
