use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::service::ServiceStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Customer,
    Vehicle,
    Service,
}

/// One row of an activity feed, whatever entity it came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerActivityRow {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VehicleActivityRow {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServiceActivityRow {
    pub id: String,
    pub service_type: String,
    pub status: ServiceStatus,
    pub scheduled_at: DateTime<Utc>,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicStats {
    pub customer_count: i64,
    pub active_vehicle_count: i64,
    pub service_count: i64,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicServiceRow {
    pub id: String,
    pub service_type: String,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
}
