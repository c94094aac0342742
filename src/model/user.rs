use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub department_id: Option<u64>,
    pub designation_id: Option<u64>,
    pub is_active: bool,
}
