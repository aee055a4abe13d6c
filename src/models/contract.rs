use super::text_enum;

text_enum!(ContractKind, "contract kind", {
    Sale => "sale",
    Rent => "rent",
});

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Contract {
    pub id: i32,
    pub contract_number: String,
    #[sqlx(try_from = "String")]
    pub kind: ContractKind,
    pub customer_id: i32,
    pub property_id: i32,
    pub employee_id: Option<i32>,
    pub amount: f64,
    pub sign_date: chrono::NaiveDate,
    pub notes: Option<String>,
}

/// Contract joined with the names shown in listings.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ContractDetails {
    #[sqlx(flatten)]
    pub contract: Contract,
    pub customer_name: String,
    pub property_code: String,
    pub employee_name: Option<String>,
}
