use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per (user, leave_type, year).
///
/// Invariant: `available_days == allocated_days - used_days - pending_days`
/// after every ledger operation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 30)]
    pub allocated_days: i64,
    #[schema(example = 4)]
    pub used_days: i64,
    #[schema(example = 0)]
    pub pending_days: i64,
    #[schema(example = 26)]
    pub available_days: i64,
}
