use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::service::{
        Service, ServiceDetails, ServicePayload, ServiceStatus, ServiceStatusPayload,
    },
    response::{created, ApiResponse},
    store::services::ServiceInput,
    validation::{trim_optional, ValidatedJson},
    AppState,
};

fn not_found() -> AppError {
    AppError::NotFound("Service not found".into())
}

impl From<ServicePayload> for ServiceInput {
    fn from(payload: ServicePayload) -> Self {
        Self {
            service_type: payload.service_type.trim().to_string(),
            description: trim_optional(payload.description),
            cost: payload.cost,
            scheduled_at: payload.scheduled_at,
            customer_id: payload.customer_id.trim().to_string(),
            vehicle_id: payload.vehicle_id.trim().to_string(),
        }
    }
}

/// Both referenced rows must exist and the vehicle must belong to the customer.
///
/// Checked before the write with no transaction; a concurrent delete between
/// the check and the insert is caught by the foreign keys instead.
async fn ensure_references(state: &AppState, input: &ServiceInput) -> Result<(), AppError> {
    if !state.store.customer_exists(&input.customer_id).await? {
        return Err(AppError::BadRequest("Customer does not exist".into()));
    }
    let vehicle = state
        .store
        .find_vehicle(&input.vehicle_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Vehicle does not exist".into()))?;
    if vehicle.customer_id != input.customer_id {
        return Err(AppError::BadRequest(
            "Vehicle does not belong to customer".into(),
        ));
    }
    Ok(())
}

pub async fn list(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<ServiceDetails>>, AppError> {
    Ok(ApiResponse::ok(state.store.list_services().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ServiceDetails>, AppError> {
    let service = state.store.get_service(&id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(service))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ServicePayload>,
) -> Result<Response, AppError> {
    let input = ServiceInput::from(payload);
    ensure_references(&state, &input).await?;

    let service = state.store.create_service(&user.user_id, &input).await?;
    Ok(created("Service created successfully", service))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ServicePayload>,
) -> Result<ApiResponse<Service>, AppError> {
    let input = ServiceInput::from(payload);
    ensure_references(&state, &input).await?;

    let service = state
        .store
        .update_service(&id, &input)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Service updated successfully", service))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ServiceStatusPayload>,
) -> Result<ApiResponse<Service>, AppError> {
    let status: ServiceStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".into()))?;

    let service = state
        .store
        .update_service_status(&id, status)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Service status updated successfully", service))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if !state.store.delete_service(&id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Service deleted successfully"))
}
