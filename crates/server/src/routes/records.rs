use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use service::storage::document::Record;

use crate::errors::ApiError;
use crate::routes::ServerState;

/// List all scenarios in stored order.
pub async fn list_scenarios(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.scenarios.list().await?))
}

/// Create a scenario; the body is stored as-is with a freshly assigned id.
pub async fn create_scenario(
    State(state): State<ServerState>,
    Json(body): Json<Record>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let record = state.scenarios.create(body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Merge the body into the scenario with the given id.
pub async fn update_scenario(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.scenarios.update(&id, body).await?))
}

/// Delete the scenario with the given id; succeeds whether or not it exists.
pub async fn delete_scenario(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.scenarios.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List all vehicles in stored order.
pub async fn list_vehicles(
    State(state): State<ServerState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    Ok(Json(state.vehicles.list().await?))
}

/// Create a vehicle; the body is stored as-is with a freshly assigned id.
pub async fn create_vehicle(
    State(state): State<ServerState>,
    Json(body): Json<Record>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    let record = state.vehicles.create(body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Merge the body into the vehicle with the given id.
pub async fn update_vehicle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<Record>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(state.vehicles.update(&id, body).await?))
}

/// Delete the vehicle with the given id; succeeds whether or not it exists.
pub async fn delete_vehicle(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.vehicles.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
