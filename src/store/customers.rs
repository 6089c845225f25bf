use chrono::Utc;

use super::{new_id, Store};
use crate::models::customer::Customer;

/// Trimmed customer fields ready for storage.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Store {
    pub async fn list_customers(&self) -> Result<Vec<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY created_at DESC")
            .fetch_all(self.pool())
            .await
    }

    pub async fn get_customer(&self, id: &str) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await
    }

    pub async fn customer_exists(&self, id: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool())
            .await?;
        Ok(count > 0)
    }

    pub async fn create_customer(
        &self,
        owner_user_id: &str,
        input: &CustomerInput,
    ) -> Result<Customer, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Customer>(
            "INSERT INTO customers \
             (id, name, email, phone, address, owner_user_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(new_id())
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(owner_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await
    }

    pub async fn update_customer(
        &self,
        id: &str,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, sqlx::Error> {
        sqlx::query_as::<_, Customer>(
            "UPDATE customers SET name = ?, email = ?, phone = ?, address = ?, updated_at = ? \
             WHERE id = ? RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool())
        .await
    }

    /// Returns `false` when no customer had this id.
    pub async fn delete_customer(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
