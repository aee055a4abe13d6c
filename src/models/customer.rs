#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub national_id: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}
