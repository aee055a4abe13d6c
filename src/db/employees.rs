use anyhow::Result;

use super::{constraint_error, ensure_found, Database, Write};
use crate::models::Employee;

const EMPLOYEE: Write<'static> = Write::Save {
    duplicate: "An employee linked to this user",
    record: "employee",
};

impl Database {
    pub async fn load_employees(&self) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            "SELECT id, full_name, position, phone, email, salary, hire_date, user_id \
             FROM employees ORDER BY full_name ASC",
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(employees)
    }

    pub async fn get_employee(&self, id: i32) -> Result<Employee> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, full_name, position, phone, email, salary, hire_date, user_id \
             FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(employee)
    }

    pub async fn create_employee(&self, employee: &Employee) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO employees (full_name, position, phone, email, salary, hire_date, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.position)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .bind(employee.user_id)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, EMPLOYEE))?;

        Ok(id)
    }

    pub async fn update_employee(&self, employee: &Employee) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET full_name = $1, position = $2, phone = $3, email = $4, salary = $5,
                hire_date = $6, user_id = $7
            WHERE id = $8
            "#,
        )
        .bind(&employee.full_name)
        .bind(&employee.position)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(employee.salary)
        .bind(employee.hire_date)
        .bind(employee.user_id)
        .bind(employee.id)
        .execute(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, EMPLOYEE))?;

        ensure_found(result.rows_affected(), "Employee", employee.id)
    }

    /// Listings, contracts and expenses referencing the employee lose the link.
    pub async fn delete_employee(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        ensure_found(result.rows_affected(), "Employee", id)
    }
}
