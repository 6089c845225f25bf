use axum::{
    extract::{Path, State},
    response::Response,
    Extension,
};

use crate::{
    auth::AuthUser,
    error::AppError,
    models::customer::{Customer, CustomerPayload},
    response::{created, ApiResponse},
    store::customers::CustomerInput,
    validation::{trim_optional, ValidatedJson},
    AppState,
};

const DUPLICATE_EMAIL: &str = "Customer with this email already exists";

fn not_found() -> AppError {
    AppError::NotFound("Customer not found".into())
}

impl From<CustomerPayload> for CustomerInput {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_lowercase(),
            phone: trim_optional(payload.phone),
            address: trim_optional(payload.address),
        }
    }
}

pub async fn list(State(state): State<AppState>) -> Result<ApiResponse<Vec<Customer>>, AppError> {
    Ok(ApiResponse::ok(state.store.list_customers().await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Customer>, AppError> {
    let customer = state.store.get_customer(&id).await?.ok_or_else(not_found)?;
    Ok(ApiResponse::ok(customer))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<CustomerPayload>,
) -> Result<Response, AppError> {
    let customer = state
        .store
        .create_customer(&user.user_id, &payload.into())
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?;
    Ok(created("Customer created successfully", customer))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<CustomerPayload>,
) -> Result<ApiResponse<Customer>, AppError> {
    let customer = state
        .store
        .update_customer(&id, &payload.into())
        .await
        .map_err(|e| AppError::conflict_on_unique(e, DUPLICATE_EMAIL))?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::with_message("Customer updated successfully", customer))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    if !state.store.delete_customer(&id).await? {
        return Err(not_found());
    }
    Ok(ApiResponse::message("Customer deleted successfully"))
}
