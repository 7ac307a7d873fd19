//! Handlers for the `/usuarios` resource, including login.
//!
//! Passwords are write-only: they are hashed on the way in and never
//! returned.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use yard_core::error::CoreError;
use yard_core::types::DbId;
use yard_db::models::user::{CreateUser, RoleFilterParams, UpdateUser, UserResponse};
use yard_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nombre: String,
    pub email: String,
    pub password: String,
    pub telefono: Option<String>,
    pub empresa: Option<String>,
    pub id_rol: DbId,
    pub id_nivel_acceso: DbId,
    pub activo: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub nombre: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub telefono: Option<String>,
    pub empresa: Option<String>,
    pub id_rol: Option<DbId>,
    pub id_nivel_acceso: Option<DbId>,
    pub activo: Option<bool>,
}

/// Both fields are optional so that a missing one is reported by the
/// credential check rather than by JSON decoding.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub message: &'static str,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}

fn hash(password: &str) -> AppResult<String> {
    validate_password_strength(password)?;
    hash_password(password).map_err(|e| AppError::InternalError(format!("Hashing failed: {e}")))
}

async fn load_response(state: &AppState, id: DbId) -> AppResult<UserResponse> {
    UserRepo::find_response_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/usuarios
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let password_hash = hash(&input.password)?;
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.nombre,
            email: input.email,
            password_hash,
            phone: input.telefono,
            company: input.empresa,
            role_id: input.id_rol,
            access_level_id: input.id_nivel_acceso,
            is_active: input.activo,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role_id = user.role_id, "User created");
    Ok((StatusCode::CREATED, Json(load_response(&state, user.id).await?)))
}

/// GET /api/usuarios
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(Json(UserRepo::list_responses(&state.pool).await?))
}

/// GET /api/usuarios/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<UserResponse>> {
    Ok(Json(load_response(&state, id).await?))
}

/// PUT|PATCH /api/usuarios/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let password_hash = input.password.as_deref().map(hash).transpose()?;
    let changes = UpdateUser {
        name: input.nombre,
        email: input.email,
        password_hash,
        phone: input.telefono,
        company: input.empresa,
        role_id: input.id_rol,
        access_level_id: input.id_nivel_acceso,
        is_active: input.activo,
    };

    if !UserRepo::update(&state.pool, id, &changes).await? {
        return Err(not_found(id));
    }
    Ok(Json(load_response(&state, id).await?))
}

/// DELETE /api/usuarios/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<StatusCode> {
    if UserRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// GET /api/usuarios/by_role?role=OPERARIO
///
/// Active users holding the named role.
pub async fn by_role(
    State(state): State<AppState>,
    Query(params): Query<RoleFilterParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let role = params
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter 'role' is required".into()))?;
    Ok(Json(UserRepo::list_active_by_role(&state.pool, role).await?))
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// POST /api/usuarios/login
///
/// Checks the credentials only; no session or token is issued.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = state
        .credentials
        .verify_credentials(input.email.as_deref(), input.password.as_deref())
        .await?;

    let user = state
        .store
        .find_user_response(user.id)
        .await?
        .ok_or_else(|| not_found(user.id))?;

    Ok(Json(LoginResponse {
        user,
        message: "Login successful",
    }))
}
