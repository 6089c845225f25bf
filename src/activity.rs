//! Owner-scoped recent-activity feed.
//!
//! Pulls the newest customers, vehicles and services belonging to one user,
//! maps them to [`ActivityItem`]s and merges them newest first. Store failures
//! degrade to an empty feed: the dashboard widget never surfaces an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    activity::{
        ActivityItem, ActivityKind, CustomerActivityRow, ServiceActivityRow, VehicleActivityRow,
    },
    service::ServiceStatus,
};

/// Rows fetched per entity kind.
pub const PER_KIND_LIMIT: i64 = 10;
/// Items kept after the merge.
pub const FEED_LIMIT: usize = 15;

/// Read side the aggregator needs; implemented by [`crate::store::Store`].
#[async_trait]
pub trait ActivitySource: Send + Sync {
    /// Customers owned by `user_id`, newest first.
    async fn recent_customers(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CustomerActivityRow>, sqlx::Error>;

    /// Vehicles whose owning customer belongs to `user_id`, newest first.
    async fn recent_vehicles(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<VehicleActivityRow>, sqlx::Error>;

    /// Services created by `user_id`, newest first.
    async fn recent_services(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ServiceActivityRow>, sqlx::Error>;
}

/// Recent activity for `user_id`, or an empty feed for anonymous callers and
/// on any store error.
pub async fn recent_activity<S>(source: &S, user_id: Option<&str>) -> Vec<ActivityItem>
where
    S: ActivitySource + ?Sized,
{
    let Some(user_id) = user_id else {
        return Vec::new();
    };

    match fetch_and_merge(source, user_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, user_id, "recent activity unavailable, returning empty feed");
            Vec::new()
        }
    }
}

async fn fetch_and_merge<S>(source: &S, user_id: &str) -> Result<Vec<ActivityItem>, sqlx::Error>
where
    S: ActivitySource + ?Sized,
{
    let (customers, vehicles, services) = tokio::try_join!(
        source.recent_customers(user_id, PER_KIND_LIMIT),
        source.recent_vehicles(user_id, PER_KIND_LIMIT),
        source.recent_services(user_id, PER_KIND_LIMIT),
    )?;

    let items = customers
        .into_iter()
        .map(customer_item)
        .chain(vehicles.into_iter().map(vehicle_item))
        .chain(services.into_iter().map(service_item))
        .collect();

    Ok(merge(items))
}

/// Newest first; equal timestamps keep their input order.
pub fn merge(mut items: Vec<ActivityItem>) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(FEED_LIMIT);
    items
}

fn customer_item(row: CustomerActivityRow) -> ActivityItem {
    ActivityItem {
        id: row.id,
        kind: ActivityKind::Customer,
        title: "New customer".to_string(),
        description: row.name,
        timestamp: row.created_at,
    }
}

fn vehicle_item(row: VehicleActivityRow) -> ActivityItem {
    ActivityItem {
        id: row.id,
        kind: ActivityKind::Vehicle,
        title: "Vehicle added".to_string(),
        description: format!(
            "{} {} {} for {}",
            row.year, row.make, row.model, row.customer_name
        ),
        timestamp: row.created_at,
    }
}

fn service_item(row: ServiceActivityRow) -> ActivityItem {
    let title = if row.status == ServiceStatus::Completed {
        "Service completed"
    } else {
        "Service scheduled"
    };
    ActivityItem {
        id: row.id,
        kind: ActivityKind::Service,
        title: title.to_string(),
        description: format!(
            "{} for {} on {}",
            row.service_type,
            row.customer_name,
            human_date(row.scheduled_at)
        ),
        timestamp: row.created_at,
    }
}

/// e.g. `Mar 5, 2025`
pub fn human_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}
