use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{new_id, Store};
use crate::models::service::{Service, ServiceDetails, ServiceStatus};

#[derive(Debug, Clone)]
pub struct ServiceInput {
    pub service_type: String,
    pub description: Option<String>,
    pub cost: Decimal,
    pub scheduled_at: DateTime<Utc>,
    pub customer_id: String,
    pub vehicle_id: String,
}

const DETAILS_SELECT: &str = "SELECT s.*, \
     c.name AS customer_name, c.email AS customer_email, \
     v.make AS vehicle_make, v.model AS vehicle_model, v.year AS vehicle_year, v.vin AS vehicle_vin, \
     u.name AS user_name, u.email AS user_email \
     FROM services s \
     JOIN customers c ON c.id = s.customer_id \
     JOIN vehicles v ON v.id = s.vehicle_id \
     JOIN users u ON u.id = s.user_id";

impl Store {
    pub async fn list_services(&self) -> Result<Vec<ServiceDetails>, sqlx::Error> {
        sqlx::query_as::<_, ServiceDetails>(&format!(
            "{DETAILS_SELECT} ORDER BY s.scheduled_at DESC"
        ))
        .fetch_all(self.pool())
        .await
    }

    pub async fn get_service(&self, id: &str) -> Result<Option<ServiceDetails>, sqlx::Error> {
        sqlx::query_as::<_, ServiceDetails>(&format!("{DETAILS_SELECT} WHERE s.id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    pub async fn create_service(
        &self,
        user_id: &str,
        input: &ServiceInput,
    ) -> Result<Service, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Service>(
            "INSERT INTO services \
             (id, service_type, description, cost, scheduled_at, status, customer_id, vehicle_id, \
              user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_id())
        .bind(&input.service_type)
        .bind(&input.description)
        .bind(input.cost.normalize().to_string())
        .bind(input.scheduled_at)
        .bind(ServiceStatus::Scheduled)
        .bind(&input.customer_id)
        .bind(&input.vehicle_id)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
    }

    pub async fn update_service(
        &self,
        id: &str,
        input: &ServiceInput,
    ) -> Result<Option<Service>, sqlx::Error> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET service_type = ?, description = ?, cost = ?, scheduled_at = ?, \
             customer_id = ?, vehicle_id = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&input.service_type)
        .bind(&input.description)
        .bind(input.cost.normalize().to_string())
        .bind(input.scheduled_at)
        .bind(&input.customer_id)
        .bind(&input.vehicle_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await
    }

    /// Moving to `COMPLETED` stamps `completed_at`; other moves leave it as is.
    pub async fn update_service_status(
        &self,
        id: &str,
        status: ServiceStatus,
    ) -> Result<Option<Service>, sqlx::Error> {
        let now = Utc::now();
        let completed_at = (status == ServiceStatus::Completed).then_some(now);
        sqlx::query_as::<_, Service>(
            "UPDATE services SET status = ?, completed_at = COALESCE(?, completed_at), \
             updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(completed_at)
        .bind(now)
        .bind(id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn delete_service(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
