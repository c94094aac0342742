use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicHoliday {
    pub id: u64,
    pub holiday_date: NaiveDate,
    pub year: i32,
    pub name: String,
    pub is_active: bool,
}
