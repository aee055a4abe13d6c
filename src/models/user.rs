#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub full_name: String,
    pub is_admin: bool,
}
