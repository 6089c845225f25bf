use chrono::Utc;

use super::{new_id, Store};
use crate::models::vehicle::{Vehicle, VehicleDetails, VehicleStatus};

#[derive(Debug, Clone)]
pub struct VehicleInput {
    pub make: String,
    pub model: String,
    pub year: i64,
    pub vin: String,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub mileage: Option<i64>,
    pub customer_id: String,
}

const DETAILS_SELECT: &str = "SELECT v.*, c.name AS customer_name, c.email AS customer_email \
     FROM vehicles v JOIN customers c ON c.id = v.customer_id";

impl Store {
    pub async fn list_vehicles(&self) -> Result<Vec<VehicleDetails>, sqlx::Error> {
        sqlx::query_as::<_, VehicleDetails>(&format!(
            "{DETAILS_SELECT} ORDER BY v.created_at DESC"
        ))
        .fetch_all(self.pool())
        .await
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<Option<VehicleDetails>, sqlx::Error> {
        sqlx::query_as::<_, VehicleDetails>(&format!("{DETAILS_SELECT} WHERE v.id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    pub async fn find_vehicle(&self, id: &str) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    pub async fn create_vehicle(&self, input: &VehicleInput) -> Result<Vehicle, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles \
             (id, make, model, year, vin, license_plate, color, mileage, status, customer_id, \
              created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_id())
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.vin)
        .bind(&input.license_plate)
        .bind(&input.color)
        .bind(input.mileage)
        .bind(VehicleStatus::Active)
        .bind(&input.customer_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
    }

    pub async fn update_vehicle(
        &self,
        id: &str,
        input: &VehicleInput,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET make = ?, model = ?, year = ?, vin = ?, license_plate = ?, \
             color = ?, mileage = ?, customer_id = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.vin)
        .bind(&input.license_plate)
        .bind(&input.color)
        .bind(input.mileage)
        .bind(&input.customer_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn update_vehicle_status(
        &self,
        id: &str,
        status: VehicleStatus,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET status = ?, updated_at = ? WHERE id = ? RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
