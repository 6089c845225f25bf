use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use validator::Validate;

use super::{
    customer::CustomerSummary, user::UserSummary, vehicle::VehicleSummary, UnknownStatus,
};
use crate::validation::{
    validate_cost, validate_customer_id, validate_service_status, validate_service_type,
    validate_vehicle_id,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl FromStr for ServiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(ServiceStatus::Scheduled),
            "IN_PROGRESS" => Ok(ServiceStatus::InProgress),
            "COMPLETED" => Ok(ServiceStatus::Completed),
            "CANCELLED" => Ok(ServiceStatus::Cancelled),
            _ => Err(UnknownStatus),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub description: Option<String>,
    pub cost: Decimal,
    pub scheduled_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: ServiceStatus,
    pub customer_id: String,
    pub vehicle_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, SqliteRow> for Service {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            service_type: row.try_get("service_type")?,
            description: row.try_get("description")?,
            cost: decimal_column(row, "cost")?,
            scheduled_at: row.try_get("scheduled_at")?,
            completed_at: row.try_get("completed_at")?,
            status: row.try_get("status")?,
            customer_id: row.try_get("customer_id")?,
            vehicle_id: row.try_get("vehicle_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Costs live in a TEXT column so that sums never pass through a float.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// A service joined with its customer, vehicle and creating user.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetails {
    #[serde(flatten)]
    pub service: Service,
    pub customer: CustomerSummary,
    pub vehicle: VehicleSummary,
    pub user: UserSummary,
}

impl<'r> FromRow<'r, SqliteRow> for ServiceDetails {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let service = Service::from_row(row)?;
        Ok(Self {
            customer: CustomerSummary {
                id: service.customer_id.clone(),
                name: row.try_get("customer_name")?,
                email: row.try_get("customer_email")?,
            },
            vehicle: VehicleSummary {
                id: service.vehicle_id.clone(),
                make: row.try_get("vehicle_make")?,
                model: row.try_get("vehicle_model")?,
                year: row.try_get("vehicle_year")?,
                vin: row.try_get("vehicle_vin")?,
            },
            user: UserSummary {
                id: service.user_id.clone(),
                name: row.try_get("user_name")?,
                email: row.try_get("user_email")?,
            },
            service,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_service_type"))]
    pub service_type: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_cost"))]
    pub cost: Decimal,
    pub scheduled_at: DateTime<Utc>,
    #[validate(custom(function = "validate_customer_id"))]
    pub customer_id: String,
    #[validate(custom(function = "validate_vehicle_id"))]
    pub vehicle_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ServiceStatusPayload {
    #[validate(custom(function = "validate_service_status"))]
    pub status: String,
}
