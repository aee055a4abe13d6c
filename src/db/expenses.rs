use anyhow::Result;

use super::{ensure_found, Database};
use crate::models::Expense;

impl Database {
    pub async fn load_expenses(&self) -> Result<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            "SELECT id, category, amount, expense_date, description, employee_id, property_id \
             FROM expenses ORDER BY expense_date DESC, id DESC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(expenses)
    }

    pub async fn get_expense(&self, id: i32) -> Result<Expense> {
        let expense = sqlx::query_as::<_, Expense>(
            "SELECT id, category, amount, expense_date, description, employee_id, property_id \
             FROM expenses WHERE id = $1",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(expense)
    }

    pub async fn create_expense(&self, expense: &Expense) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO expenses (category, amount, expense_date, description, employee_id, property_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(expense.category.as_str())
        .bind(expense.amount)
        .bind(expense.expense_date)
        .bind(&expense.description)
        .bind(expense.employee_id)
        .bind(expense.property_id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(id)
    }

    pub async fn update_expense(&self, expense: &Expense) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE expenses
            SET category = $1, amount = $2, expense_date = $3, description = $4,
                employee_id = $5, property_id = $6
            WHERE id = $7
            "#,
        )
        .bind(expense.category.as_str())
        .bind(expense.amount)
        .bind(expense.expense_date)
        .bind(&expense.description)
        .bind(expense.employee_id)
        .bind(expense.property_id)
        .bind(expense.id)
        .execute(self.get_pool())
        .await?;

        ensure_found(result.rows_affected(), "Expense", expense.id)
    }

    pub async fn delete_expense(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        ensure_found(result.rows_affected(), "Expense", id)
    }
}
