use anyhow::Result;

use super::{constraint_error, ensure_found, Database, Write};
use crate::models::{Contract, ContractDetails};

const CONTRACT_COLUMNS: &str = "id, contract_number, kind, customer_id, property_id, employee_id, \
     amount, sign_date, notes";

const CONTRACT: Write<'static> = Write::Save {
    duplicate: "A contract with this number",
    record: "contract",
};

impl Database {
    pub async fn load_contracts(&self) -> Result<Vec<Contract>> {
        let contracts = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts ORDER BY sign_date DESC, id DESC"
        ))
        .fetch_all(self.get_pool())
        .await?;

        Ok(contracts)
    }

    /// Contracts with the customer, listing and agent names resolved
    pub async fn load_contract_details(&self) -> Result<Vec<ContractDetails>> {
        let contracts = sqlx::query_as::<_, ContractDetails>(
            r#"
            SELECT c.id, c.contract_number, c.kind, c.customer_id, c.property_id, c.employee_id,
                   c.amount, c.sign_date, c.notes,
                   cu.full_name AS customer_name,
                   p.listing_code AS property_code,
                   e.full_name AS employee_name
            FROM contracts c
            JOIN customers cu ON cu.id = c.customer_id
            JOIN properties p ON p.id = c.property_id
            LEFT JOIN employees e ON e.id = c.employee_id
            ORDER BY c.sign_date DESC, c.id DESC
            "#,
        )
        .fetch_all(self.get_pool())
        .await?;

        Ok(contracts)
    }

    pub async fn get_contract(&self, id: i32) -> Result<Contract> {
        let contract = sqlx::query_as::<_, Contract>(&format!(
            "SELECT {CONTRACT_COLUMNS} FROM contracts WHERE id = $1"
        ))
        .bind(id)
        .fetch_one(self.get_pool())
        .await?;

        Ok(contract)
    }

    pub async fn create_contract(&self, contract: &Contract) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO contracts
                (contract_number, kind, customer_id, property_id, employee_id, amount, sign_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&contract.contract_number)
        .bind(contract.kind.as_str())
        .bind(contract.customer_id)
        .bind(contract.property_id)
        .bind(contract.employee_id)
        .bind(contract.amount)
        .bind(contract.sign_date)
        .bind(&contract.notes)
        .fetch_one(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, CONTRACT))?;

        Ok(id)
    }

    pub async fn update_contract(&self, contract: &Contract) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE contracts
            SET contract_number = $1, kind = $2, customer_id = $3, property_id = $4,
                employee_id = $5, amount = $6, sign_date = $7, notes = $8
            WHERE id = $9
            "#,
        )
        .bind(&contract.contract_number)
        .bind(contract.kind.as_str())
        .bind(contract.customer_id)
        .bind(contract.property_id)
        .bind(contract.employee_id)
        .bind(contract.amount)
        .bind(contract.sign_date)
        .bind(&contract.notes)
        .bind(contract.id)
        .execute(self.get_pool())
        .await
        .map_err(|e| constraint_error(e, CONTRACT))?;

        ensure_found(result.rows_affected(), "Contract", contract.id)
    }

    /// Down payments go with the contract.
    pub async fn delete_contract(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        ensure_found(result.rows_affected(), "Contract", id)
    }
}
