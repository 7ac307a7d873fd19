//! `yard-seed`: load the initial reference and demo data.
//!
//! Safe to run repeatedly; rows that already exist (matched by name, email,
//! coordinates or barcode) are left alone. Tickets are opened through the
//! slot allocator and advanced through the lifecycle so the seeded yard
//! obeys the same occupancy rules as live traffic.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::{Duration, Utc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yard_api::auth::password::hash_password;
use yard_api::config::ServerConfig;
use yard_api::engine::{SlotAllocator, TicketEntry, TicketLifecycle};
use yard_core::roles::{
    LEVEL_BASIC, LEVEL_FULL, LEVEL_OPERATIONAL, ROLE_ADMIN, ROLE_CLIENT, ROLE_OPERATOR,
};
use yard_core::ticket::TicketState;
use yard_core::types::DbId;
use yard_db::models::access_level::CreateAccessLevel;
use yard_db::models::appointment::CreateAppointment;
use yard_db::models::container::CreateContainer;
use yard_db::models::role::CreateRole;
use yard_db::models::slot::CreateSlot;
use yard_db::models::ticket::TicketFilter;
use yard_db::models::user::CreateUser;
use yard_db::models::vessel::CreateVessel;
use yard_db::models::zone::CreateZone;
use yard_db::repositories::{
    AccessLevelRepo, AppointmentRepo, ContainerRepo, RoleRepo, SlotRepo, UserRepo, VesselRepo,
    ZoneRepo,
};
use yard_db::store::{PgStore, YardStore};
use yard_db::DbPool;

const ROLES: [&str; 3] = [ROLE_ADMIN, ROLE_OPERATOR, ROLE_CLIENT];
const ACCESS_LEVELS: [&str; 3] = [LEVEL_FULL, LEVEL_OPERATIONAL, LEVEL_BASIC];

struct SeedUser {
    name: &'static str,
    email: &'static str,
    password: &'static str,
    phone: &'static str,
    company: &'static str,
    /// Index into `ROLES` and `ACCESS_LEVELS`.
    profile: usize,
}

const USERS: [SeedUser; 3] = [
    SeedUser {
        name: "Juan Administrador",
        email: "admin@enapu.com",
        password: "admin123",
        phone: "999888777",
        company: "ENAPU",
        profile: 0,
    },
    SeedUser {
        name: "Carlos López",
        email: "operario@enapu.com",
        password: "operario123",
        phone: "999777666",
        company: "ENAPU",
        profile: 1,
    },
    SeedUser {
        name: "María García",
        email: "cliente@empresa.com",
        password: "cliente123",
        phone: "999666555",
        company: "Transportes García SAC",
        profile: 2,
    },
];

const ZONES: [(&str, i32); 3] = [("Zona A", 100), ("Zona B", 150), ("Zona C", 120)];
const ROWS: i32 = 5;
const COLUMNS: i32 = 10;
const LEVELS: i32 = 3;

const VESSELS: [(&str, &str); 3] = [
    ("MSC MAYA", "MSC"),
    ("MAERSK ESSEX", "MAERSK"),
    ("EVERGREEN HARMONY", "EVERGREEN"),
];

const CONTAINER_TYPES: [&str; 3] = ["20FT", "40FT", "40HC"];
const APPOINTMENTS: usize = 10;
const CONTAINERS: usize = 20;
const TICKETS: usize = 10;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yard_seed=info,yard_api=info,yard_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = yard_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    yard_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let store: Arc<dyn YardStore> = Arc::new(PgStore::new(pool.clone()));
    let allocator = SlotAllocator::new(Arc::clone(&store));
    let lifecycle = TicketLifecycle::new(store, config.slot_release_policy);

    let (role_ids, level_ids) = seed_profiles(&pool).await?;
    let operator_id = seed_users(&pool, &role_ids, &level_ids).await?;
    let client_id = UserRepo::find_by_email(&pool, USERS[2].email)
        .await?
        .map(|u| u.id);
    let zone_ids = seed_zones(&pool).await?;
    let vessel_ids = seed_vessels(&pool).await?;
    let container_ids = seed_containers(&pool, &vessel_ids, client_id).await?;
    seed_tickets(
        &allocator,
        &lifecycle,
        operator_id,
        &zone_ids,
        &container_ids,
    )
    .await?;

    tracing::info!("Initial data loaded");
    for user in &USERS {
        tracing::info!(email = user.email, "Seed account");
    }
    Ok(())
}

async fn seed_profiles(pool: &DbPool) -> anyhow::Result<(Vec<DbId>, Vec<DbId>)> {
    let mut role_ids = Vec::with_capacity(ROLES.len());
    for name in ROLES {
        let role = match RoleRepo::find_by_name(pool, name).await? {
            Some(role) => role,
            None => {
                tracing::info!(role = name, "Creating role");
                RoleRepo::create(pool, &CreateRole { name: name.into() }).await?
            }
        };
        role_ids.push(role.id);
    }

    let mut level_ids = Vec::with_capacity(ACCESS_LEVELS.len());
    for name in ACCESS_LEVELS {
        let level = match AccessLevelRepo::find_by_name(pool, name).await? {
            Some(level) => level,
            None => {
                tracing::info!(level = name, "Creating access level");
                AccessLevelRepo::create(pool, &CreateAccessLevel { name: name.into() }).await?
            }
        };
        level_ids.push(level.id);
    }

    Ok((role_ids, level_ids))
}

/// Returns the id of the operator account that seeded tickets belong to.
async fn seed_users(
    pool: &DbPool,
    role_ids: &[DbId],
    level_ids: &[DbId],
) -> anyhow::Result<DbId> {
    let mut operator_id = None;
    for seed in &USERS {
        let user = match UserRepo::find_by_email(pool, seed.email).await? {
            Some(user) => user,
            None => {
                let password_hash =
                    hash_password(seed.password).map_err(|e| anyhow!("Hashing failed: {e}"))?;
                let input = CreateUser {
                    name: seed.name.into(),
                    email: seed.email.into(),
                    password_hash,
                    phone: Some(seed.phone.into()),
                    company: Some(seed.company.into()),
                    role_id: role_ids[seed.profile],
                    access_level_id: level_ids[seed.profile],
                    is_active: Some(true),
                };
                tracing::info!(email = seed.email, "Creating user");
                UserRepo::create(pool, &input).await?
            }
        };
        if ROLES[seed.profile] == ROLE_OPERATOR {
            operator_id = Some(user.id);
        }
    }
    operator_id.ok_or_else(|| anyhow!("No operator account was seeded"))
}

async fn seed_zones(pool: &DbPool) -> anyhow::Result<Vec<DbId>> {
    let mut zone_ids = Vec::with_capacity(ZONES.len());
    for (name, capacity) in ZONES {
        let zone = match ZoneRepo::find_by_name(pool, name).await? {
            Some(zone) => zone,
            None => {
                tracing::info!(zone = name, capacity, "Creating zone");
                let input = CreateZone {
                    name: name.into(),
                    capacity,
                };
                ZoneRepo::create(pool, &input).await?
            }
        };

        let existing: HashSet<(i32, i32, i32)> = SlotRepo::list_by_zone(pool, zone.id)
            .await?
            .into_iter()
            .map(|s| (s.row, s.column, s.level))
            .collect();

        let mut created = 0;
        for row in 1..=ROWS {
            for column in 1..=COLUMNS {
                for level in 1..=LEVELS {
                    if existing.contains(&(row, column, level)) {
                        continue;
                    }
                    let input = CreateSlot {
                        row,
                        column,
                        level,
                        state: None,
                        zone_id: zone.id,
                    };
                    SlotRepo::create(pool, &input).await?;
                    created += 1;
                }
            }
        }
        if created > 0 {
            tracing::info!(zone = name, created, "Created slots");
        }
        zone_ids.push(zone.id);
    }
    Ok(zone_ids)
}

async fn seed_vessels(pool: &DbPool) -> anyhow::Result<Vec<DbId>> {
    let mut vessel_ids = Vec::with_capacity(VESSELS.len());
    for (name, line) in VESSELS {
        let vessel = match VesselRepo::find_by_name(pool, name).await? {
            Some(vessel) => vessel,
            None => {
                tracing::info!(vessel = name, "Creating vessel");
                let input = CreateVessel {
                    name: name.into(),
                    shipping_line: line.into(),
                };
                VesselRepo::create(pool, &input).await?
            }
        };
        vessel_ids.push(vessel.id);
    }
    Ok(vessel_ids)
}

fn barcode(index: usize) -> String {
    format!("CONT-{:04}", index + 1)
}

/// Containers carry `CONT-0001`.. barcodes; a full set means the demo
/// appointments and containers are already in place.
async fn seed_containers(
    pool: &DbPool,
    vessel_ids: &[DbId],
    client_id: Option<DbId>,
) -> anyhow::Result<Vec<DbId>> {
    let mut container_ids = Vec::with_capacity(CONTAINERS);
    let mut missing = Vec::new();
    for index in 0..CONTAINERS {
        match ContainerRepo::find_by_barcode(pool, &barcode(index)).await? {
            Some(container) => container_ids.push(container.id),
            None => missing.push(index),
        }
    }
    if missing.is_empty() {
        return Ok(container_ids);
    }

    let today = Utc::now().date_naive();
    let mut appointment_ids = Vec::with_capacity(APPOINTMENTS);
    for _ in 0..APPOINTMENTS {
        let input = CreateAppointment {
            shipped_on: Some(today),
            pickup_on: Some(today + Duration::days(7)),
            travel_days: Some(7),
            state: None,
            client_id,
        };
        appointment_ids.push(AppointmentRepo::create(pool, &input).await?.id);
    }
    tracing::info!(count = APPOINTMENTS, "Created appointments");

    for index in missing {
        let kind = CONTAINER_TYPES[index % CONTAINER_TYPES.len()];
        let input = CreateContainer {
            barcode: Some(barcode(index)),
            container_number: Some(format!("ENAU{:07}", index + 1)),
            dimensions: kind.into(),
            container_type: kind.into(),
            weight: 15_000.0 + index as f64 * 500.0,
            vessel_id: vessel_ids[index % vessel_ids.len()],
            appointment_id: Some(appointment_ids[index % appointment_ids.len()]),
        };
        let container = ContainerRepo::create(pool, &input).await?;
        tracing::info!(barcode = %barcode(index), container_id = container.id, "Created container");
        container_ids.push(container.id);
    }
    Ok(container_ids)
}

/// Open one ticket for each of the first containers and walk it forward to
/// a spread of states, one legal step at a time.
async fn seed_tickets(
    allocator: &SlotAllocator,
    lifecycle: &TicketLifecycle,
    operator_id: DbId,
    zone_ids: &[DbId],
    container_ids: &[DbId],
) -> anyhow::Result<()> {
    let ticketed: HashSet<DbId> = lifecycle
        .list(&TicketFilter::default())
        .await?
        .into_iter()
        .map(|t| t.container_id)
        .collect();

    let now = Utc::now();
    for (index, container_id) in container_ids.iter().take(TICKETS).enumerate() {
        if ticketed.contains(container_id) {
            continue;
        }
        let entry = TicketEntry {
            entered_at: now - Duration::hours(index as i64),
            user_id: operator_id,
            container_id: *container_id,
        };
        let zone_id = zone_ids[index % zone_ids.len()];
        let ticket = allocator.allocate_in_zone(&entry, zone_id).await?;

        let mut state = TicketState::Pending;
        for _ in 0..index % TicketState::ALL.len() {
            let Some(next) = state.next() else { break };
            lifecycle.change_state(ticket.id, Some(next.as_str())).await?;
            state = next;
        }
        tracing::info!(ticket_id = ticket.id, state = %state, "Seeded ticket");
    }
    Ok(())
}
