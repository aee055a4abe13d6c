use super::text_enum;

text_enum!(ExpenseCategory, "expense category", {
    Salary => "salary",
    Commission => "commission",
    Maintenance => "maintenance",
    Marketing => "marketing",
    Utilities => "utilities",
    Office => "office",
    Other => "other",
});

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Expense {
    pub id: i32,
    #[sqlx(try_from = "String")]
    pub category: ExpenseCategory,
    pub amount: f64,
    pub expense_date: chrono::NaiveDate,
    pub description: String,
    pub employee_id: Option<i32>,
    pub property_id: Option<i32>,
}
