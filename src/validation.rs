use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    error::AppError,
    models::{service::ServiceStatus, vehicle::VehicleStatus},
};

/// JSON body that has passed its `Validate` rules.
///
/// Both malformed JSON and failed validation reject with a 400 envelope
/// carrying a single human-readable message.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;
        value
            .validate()
            .map_err(|errors| AppError::Validation(first_message(&errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// Picks the first message in field-name order so responses are stable.
pub fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| errs.iter().map(move |e| (field, e)))
        .map(|(field, e)| match &e.message {
            Some(message) => message.to_string(),
            None => format!("Invalid value for {field}"),
        })
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

macro_rules! required_field {
    ($name:ident, $message:literal) => {
        pub fn $name(value: &str) -> Result<(), ValidationError> {
            if value.trim().is_empty() {
                return Err(invalid("required", $message));
            }
            Ok(())
        }
    };
}

required_field!(validate_make, "Make is required");
required_field!(validate_model, "Model is required");
required_field!(validate_service_type, "Service type is required");

pub fn validate_customer_id(value: &str) -> Result<(), ValidationError> {
    uuid_field(value, "Valid customer ID is required")
}

pub fn validate_vehicle_id(value: &str) -> Result<(), ValidationError> {
    uuid_field(value, "Valid vehicle ID is required")
}

fn uuid_field(value: &str, message: &'static str) -> Result<(), ValidationError> {
    Uuid::parse_str(value.trim())
        .map(|_| ())
        .map_err(|_| invalid("uuid", message))
}

pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() < 2 {
        return Err(invalid("length", "Name must be at least 2 characters"));
    }
    Ok(())
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
    let digits = value.chars().filter(char::is_ascii_digit).count();
    if !allowed || !(7..=20).contains(&value.len()) || digits < 7 {
        return Err(invalid("phone", "Please provide a valid phone number"));
    }
    Ok(())
}

pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.chars().count() != 17 || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid("vin", "VIN must be 17 characters"));
    }
    Ok(())
}

/// Model years run from 1900 to next year's models.
pub fn validate_year(year: i64) -> Result<(), ValidationError> {
    let max = i64::from(Utc::now().year()) + 1;
    if !(1900..=max).contains(&year) {
        return Err(invalid("year", "Please provide a valid year"));
    }
    Ok(())
}

pub fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(invalid("cost", "Cost must be a positive number"));
    }
    Ok(())
}

pub fn validate_vehicle_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<VehicleStatus>()
        .map(|_| ())
        .map_err(|_| invalid("status", "Invalid status"))
}

pub fn validate_service_status(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<ServiceStatus>()
        .map(|_| ())
        .map_err(|_| invalid("status", "Invalid status"))
}

/// Trims an optional free-text field, treating blank input as absent.
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
