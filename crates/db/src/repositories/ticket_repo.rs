//! Repository for the `tickets` table.
//!
//! Tickets are never deleted and only change through [`TicketRepo::apply`],
//! which the Postgres store calls inside the transaction that locked the row.

use sqlx::{PgConnection, PgPool};
use yard_core::ticket::{TicketState, TransitionPlan};
use yard_core::types::{DbId, Timestamp};

use crate::models::ticket::{NewTicket, Ticket, TicketDetail, TicketFilter};

const COLUMNS: &str =
    "id, entered_at, exited_at, state, slot_id, user_id, container_id, updated_at";

/// Select list for [`TicketDetail`]: the ticket joined with its slot, zone,
/// user and container.
const DETAIL_SELECT: &str = "SELECT t.id, t.entered_at, t.exited_at, t.state, t.slot_id, \
        s.slot_row, s.slot_column, s.slot_level, z.name AS zone_name, s.zone_id, \
        t.user_id, u.name AS user_name, \
        t.container_id, c.barcode, c.container_number, c.container_type, c.dimensions, c.weight, \
        t.updated_at \
     FROM tickets t \
     JOIN slots s ON s.id = t.slot_id \
     JOIN zones z ON z.id = s.zone_id \
     JOIN users u ON u.id = t.user_id \
     JOIN containers c ON c.id = t.container_id";

/// Provides read access and transactional writes for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a ticket in the initial state with no exit time.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewTicket,
        now: Timestamp,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (entered_at, state, slot_id, user_id, container_id, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.entered_at)
            .bind(TicketState::INITIAL.as_str())
            .bind(input.slot_id)
            .bind(input.user_id)
            .bind(input.container_id)
            .bind(now)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<TicketDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE t.id = $1");
        sqlx::query_as::<_, TicketDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ticket representations matching `filter`, in creation order.
    pub async fn list_details(
        pool: &PgPool,
        filter: &TicketFilter,
    ) -> Result<Vec<TicketDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE ($1::TEXT IS NULL OR t.state = $1)
               AND ($2::BIGINT IS NULL OR t.user_id = $2)
             ORDER BY t.id"
        );
        sqlx::query_as::<_, TicketDetail>(&query)
            .bind(filter.state.map(TicketState::as_str))
            .bind(filter.user_id)
            .fetch_all(pool)
            .await
    }

    /// Lock a ticket row for the rest of the transaction.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Write the state and exit time a plan decided on.
    pub async fn apply(
        conn: &mut PgConnection,
        id: DbId,
        plan: &TransitionPlan,
        now: Timestamp,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET state = $2, exited_at = $3, updated_at = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(plan.to.as_str())
            .bind(plan.exited_at)
            .bind(now)
            .fetch_one(conn)
            .await
    }

    /// Whether a container has a ticket that is not yet completed.
    pub async fn has_active_for_container(
        conn: &mut PgConnection,
        container_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM tickets WHERE container_id = $1 AND state <> 'Completado'
             )",
        )
        .bind(container_id)
        .fetch_one(conn)
        .await
    }

    /// States of every ticket ever opened on a slot.
    pub async fn states_for_slot(
        conn: &mut PgConnection,
        slot_id: DbId,
    ) -> Result<Vec<TicketState>, sqlx::Error> {
        let labels: Vec<String> =
            sqlx::query_scalar("SELECT state FROM tickets WHERE slot_id = $1")
                .bind(slot_id)
                .fetch_all(conn)
                .await?;
        labels
            .into_iter()
            .map(|label| {
                TicketState::try_from(label).map_err(|e| sqlx::Error::Decode(Box::new(e)))
            })
            .collect()
    }
}
