use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per user; insert-once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct DesiredLeaveMonths {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 3, minimum = 1, maximum = 12)]
    pub month_one: u32,
    #[schema(example = 7, minimum = 1, maximum = 12)]
    pub month_two: u32,
    #[schema(format = "date-time", value_type = String)]
    pub submitted_at: DateTime<Utc>,
    #[schema(example = true)]
    pub is_locked: bool,
}

impl DesiredLeaveMonths {
    pub fn months(&self) -> [u32; 2] {
        [self.month_one, self.month_two]
    }
}
