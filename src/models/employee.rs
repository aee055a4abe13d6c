#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub position: String,
    pub phone: String,
    pub email: Option<String>,
    pub salary: f64,
    pub hire_date: chrono::NaiveDate,
    /// Login account, when the employee uses the application
    pub user_id: Option<i32>,
}
