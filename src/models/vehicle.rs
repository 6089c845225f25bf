use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use validator::{Validate, ValidationError};

use super::{customer::CustomerSummary, UnknownStatus};
use crate::validation::{
    validate_customer_id, validate_make, validate_model, validate_vehicle_status, validate_vin,
    validate_year,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Active,
    InService,
    Inactive,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Active => "ACTIVE",
            VehicleStatus::InService => "IN_SERVICE",
            VehicleStatus::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for VehicleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(VehicleStatus::Active),
            "IN_SERVICE" => Ok(VehicleStatus::InService),
            "INACTIVE" => Ok(VehicleStatus::Inactive),
            _ => Err(UnknownStatus),
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub vin: String,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub status: VehicleStatus,
    pub customer_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A vehicle joined with its owning customer.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleDetails {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub customer: CustomerSummary,
}

impl<'r> FromRow<'r, SqliteRow> for VehicleDetails {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            vehicle: Vehicle::from_row(row)?,
            customer: CustomerSummary {
                id: row.try_get("customer_id")?,
                name: row.try_get("customer_name")?,
                email: row.try_get("customer_email")?,
            },
        })
    }
}

/// Vehicle fields embedded in service listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VehicleSummary {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub vin: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_vehicle_year", skip_on_field_errors = false))]
pub struct VehiclePayload {
    #[validate(custom(function = "validate_make"))]
    pub make: String,
    #[validate(custom(function = "validate_model"))]
    pub model: String,
    pub year: i64,
    #[validate(custom(function = "validate_vin"))]
    pub vin: String,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 0, message = "Mileage must be a positive number"))]
    pub mileage: Option<i64>,
    #[validate(custom(function = "validate_customer_id"))]
    pub customer_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VehicleStatusPayload {
    #[validate(custom(function = "validate_vehicle_status"))]
    pub status: String,
}

fn validate_vehicle_year(payload: &VehiclePayload) -> Result<(), ValidationError> {
    validate_year(payload.year)
}
