use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::Store;
use crate::{
    activity::ActivitySource,
    dashboard::StatsSource,
    models::{
        activity::{CustomerActivityRow, PublicServiceRow, ServiceActivityRow, VehicleActivityRow},
        vehicle::VehicleStatus,
    },
};

#[async_trait]
impl ActivitySource for Store {
    async fn recent_customers(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<CustomerActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, CustomerActivityRow>(
            "SELECT id, name, created_at FROM customers \
             WHERE owner_user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }

    async fn recent_vehicles(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<VehicleActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, VehicleActivityRow>(
            "SELECT v.id, v.make, v.model, v.year, c.name AS customer_name, v.created_at \
             FROM vehicles v JOIN customers c ON c.id = v.customer_id \
             WHERE c.owner_user_id = ? ORDER BY v.created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }

    async fn recent_services(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<ServiceActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, ServiceActivityRow>(
            "SELECT s.id, s.service_type, s.status, s.scheduled_at, \
             c.name AS customer_name, s.created_at \
             FROM services s JOIN customers c ON c.id = s.customer_id \
             WHERE s.user_id = ? ORDER BY s.created_at DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }
}

#[async_trait]
impl StatsSource for Store {
    async fn customer_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool())
            .await
    }

    async fn vehicle_statuses(&self) -> Result<Vec<VehicleStatus>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM vehicles")
            .fetch_all(self.pool())
            .await
    }

    async fn service_costs(&self) -> Result<Vec<Decimal>, sqlx::Error> {
        let raw: Vec<String> = sqlx::query_scalar("SELECT cost FROM services")
            .fetch_all(self.pool())
            .await?;
        raw.iter()
            .map(|cost| {
                Decimal::from_str(cost).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "cost".to_string(),
                    source: Box::new(e),
                })
            })
            .collect()
    }

    async fn latest_services(&self, limit: i64) -> Result<Vec<PublicServiceRow>, sqlx::Error> {
        sqlx::query_as::<_, PublicServiceRow>(
            "SELECT s.id, s.service_type, c.name AS customer_name, s.created_at \
             FROM services s \
             JOIN vehicles v ON v.id = s.vehicle_id \
             JOIN customers c ON c.id = v.customer_id \
             ORDER BY s.created_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await
    }
}
