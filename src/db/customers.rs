use anyhow::Result;

use super::{constraint_error, ensure_found, Database, Write};
use crate::models::Customer;

impl Database {
    pub async fn load_customers(&self) -> Result<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, full_name, phone, email, national_id, address, notes \
             FROM customers ORDER BY full_name ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(customers)
    }

    pub async fn get_customer(&self, id: i32) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, full_name, phone, email, national_id, address, notes \
             FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(customer)
    }

    pub async fn create_customer(&self, customer: &Customer) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO customers (full_name, phone, email, national_id, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.national_id)
        .bind(&customer.address)
        .bind(&customer.notes)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_customer(&self, customer: &Customer) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET full_name = $1, phone = $2, email = $3, national_id = $4, address = $5, notes = $6
            WHERE id = $7
            "#,
        )
        .bind(&customer.full_name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.national_id)
        .bind(&customer.address)
        .bind(&customer.notes)
        .bind(customer.id)
        .execute(self.get_pool())
        .await?;

        ensure_found(result.rows_affected(), "Customer", customer.id)
    }

    /// Customers with contracts are kept; the database refuses the delete.
    pub async fn delete_customer(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await
            .map_err(|e| constraint_error(e, Write::Delete("This customer")))?;

        ensure_found(result.rows_affected(), "Customer", id)
    }
}
