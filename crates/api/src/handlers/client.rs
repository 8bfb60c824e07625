//! Handlers for the `/clients` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use margin_core::error::CoreError;
use margin_core::types::DbId;
use margin_core::validation::validate_name;
use margin_db::models::client::{Client, CreateClient, UpdateClient};
use margin_db::repositories::ClientRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Client",
        id,
    })
}

/// POST /api/clients
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    validate_name("name", &input.name)?;

    let client = ClientRepo::create(&state.pool, &input).await?;
    tracing::info!(client_id = client.id, name = %client.name, "Client created");
    Ok((StatusCode::CREATED, Json(client)))
}

/// GET /api/clients
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    let clients = ClientRepo::list(&state.pool).await?;
    Ok(Json(clients))
}

/// GET /api/clients/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = ClientRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// PUT /api/clients/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    if let Some(name) = &input.name {
        validate_name("name", name)?;
    }

    let client = ClientRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(client_id = id, "Client updated");
    Ok(Json(client))
}

/// DELETE /api/clients/{id}
///
/// Removes the client's projects and their allocations too.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if ClientRepo::delete(&state.pool, id).await? {
        tracing::info!(client_id = id, "Client deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
