use axum::{
    extract::{Path, State},
    response::Response,
};

use crate::{
    error::AppError,
    models::vehicle::{
        Vehicle, VehicleDetails, VehiclePayload, VehicleStatus, VehicleStatusPayload,
    },
    response::{created, ApiResponse},
    store::vehicles::VehicleInput,
    validation::{trim_optional, ValidatedJson},
    AppState,
};

const DUPLICATE_VIN: &str = "Vehicle with this VIN already exists";

fn not_found() -> AppError {
    AppError::NotFound("Vehicle not found".into())
}

impl From<VehiclePayload> for VehicleInput {
    fn from(payload: VehiclePayload) -> Self {
        Self {
            make: payload.make.trim().to_string(),
            model: payload.model.trim().to_string(),
            year: payload.year,
            vin: payload.vin.trim().to_uppercase(),
            license_plate: trim_optional(payload.license_plate),
            color: trim_optional(payload.color),
            mileage: payload.mileage,
            customer_id: payload.customer_id.trim().to_string(),
        }
    }
}

async fn ensure_customer(state: &AppState, customer_id: &str) -> Result<(), AppError> {
    if !state.store.customer_exists(customer_id).await? {
        return Err(AppError::BadRequest("Customer does not exist".into()));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<VehicleDetails>>, AppError> {
    Ok(ApiResponse::ok(state.store.list_vehicles().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<VehicleDetails>, AppError> {
    let vehicle = state.store.get_vehicle(&id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(vehicle))
}

pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VehiclePayload>,
) -> Result<Response, AppError> {
    let input = VehicleInput::from(payload);
    ensure_customer(&state, &input.customer_id).await?;

    let vehicle = state
        .store
        .create_vehicle(&input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_VIN))?;
    Ok(created("Vehicle created successfully", vehicle))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<VehiclePayload>,
) -> Result<ApiResponse<Vehicle>, AppError> {
    let input = VehicleInput::from(payload);
    ensure_customer(&state, &input.customer_id).await?;

    let vehicle = state
        .store
        .update_vehicle(&id, &input)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_VIN))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Vehicle updated successfully", vehicle))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<VehicleStatusPayload>,
) -> Result<ApiResponse<Vehicle>, AppError> {
    let status: VehicleStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".into()))?;

    let vehicle = state
        .store
        .update_vehicle_status(&id, status)
        .await?
        .ok_or_else(not_found)?;
    tracing::info!(vehicle_id = %vehicle.id, status = status.as_str(), "vehicle status changed");
    Ok(ApiResponse::with_message("Vehicle status updated successfully", vehicle))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if !state.store.delete_vehicle(&id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Vehicle deleted successfully"))
}
