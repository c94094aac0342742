use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    PendingDirector,
    PendingHr,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveApplication {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "LA-2026-9f3a21")]
    pub application_number: String,
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = "annual", value_type = String)]
    pub leave_type: String,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-06", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = 5)]
    pub working_days: i64,
    #[schema(example = "Family visit")]
    pub reason: String,
    #[schema(example = "msc", value_type = Option<String>)]
    pub study_program: Option<String>,
    #[schema(example = "pending_director", value_type = String)]
    pub status: String,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub submitted_at: Option<DateTime<Utc>>,
    pub director_approved_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub director_approved_at: Option<DateTime<Utc>>,
    pub director_comments: Option<String>,
    pub hr_approved_by: Option<u64>,
    #[schema(format = "date-time", value_type = Option<String>)]
    pub hr_approved_at: Option<DateTime<Utc>>,
    pub hr_comments: Option<String>,
}
