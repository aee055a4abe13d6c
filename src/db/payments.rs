use anyhow::Result;

use super::{ensure_found, Database};
use crate::models::{DownPayment, DownPaymentDetails};

impl Database {
    pub async fn load_down_payments(&self) -> Result<Vec<DownPayment>> {
        let payments = sqlx::query_as::<_, DownPayment>(
            "SELECT id, contract_id, amount, payment_date, status, notes \
             FROM down_payments ORDER BY payment_date DESC, id DESC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(payments)
    }

    pub async fn load_down_payments_by_contract(&self, contract_id: i32) -> Result<Vec<DownPayment>> {
        let payments = sqlx::query_as::<_, DownPayment>(
            "SELECT id, contract_id, amount, payment_date, status, notes \
             FROM down_payments WHERE contract_id = $1 ORDER BY payment_date ASC, id ASC",
        )
        .bind(contract_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(payments)
    }

    pub async fn load_down_payment_details(&self) -> Result<Vec<DownPaymentDetails>> {
        let payments = sqlx::query_as::<_, DownPaymentDetails>(
            r#"
            SELECT d.id, d.contract_id, d.amount, d.payment_date, d.status, d.notes,
                   c.contract_number,
                   cu.full_name AS customer_name,
                   c.amount AS contract_amount
            FROM down_payments d
            JOIN contracts c ON c.id = d.contract_id
            JOIN customers cu ON cu.id = c.customer_id
            ORDER BY d.payment_date DESC, d.id DESC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(payments)
    }

    pub async fn get_down_payment(&self, id: i32) -> Result<DownPayment> {
        let payment = sqlx::query_as::<_, DownPayment>(
            "SELECT id, contract_id, amount, payment_date, status, notes \
             FROM down_payments WHERE id = $1",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(payment)
    }

    pub async fn create_down_payment(&self, payment: &DownPayment) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO down_payments (contract_id, amount, payment_date, status, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(payment.contract_id)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(payment.status.as_str())
        .bind(&payment.notes)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_down_payment(&self, payment: &DownPayment) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE down_payments
            SET contract_id = $1, amount = $2, payment_date = $3, status = $4, notes = $5
            WHERE id = $6
            "#,
        )
        .bind(payment.contract_id)
        .bind(payment.amount)
        .bind(payment.payment_date)
        .bind(payment.status.as_str())
        .bind(&payment.notes)
        .bind(payment.id)
        .execute(self.get_pool())
        .await?;

        ensure_found(result.rows_affected(), "Down payment", payment.id)
    }

    pub async fn delete_down_payment(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM down_payments WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        ensure_found(result.rows_affected(), "Down payment", id)
    }
}
