use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
    ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Casual,
    Sick,
    Maternity,
    Paternity,
    Study,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudyProgram {
    Bsc,
    Msc,
    Phd,
}

impl StudyProgram {
    pub fn duration_years(&self) -> u32 {
        match self {
            StudyProgram::Bsc => 4,
            StudyProgram::Msc => 2,
            StudyProgram::Phd => 4,
        }
    }
}

/// Per-type leave policy. Immutable reference data, so a static table
/// rather than a database lookup.
#[derive(Debug, Copy, Clone)]
pub struct LeaveTypeConfig {
    pub leave_type: LeaveType,
    pub annual_days: u32,
    pub min_notice_days: i64,
    /// Sick leave allotment may be topped up outside the yearly cycle.
    pub reapplicable: bool,
}

impl LeaveTypeConfig {
    pub fn for_type(leave_type: LeaveType) -> LeaveTypeConfig {
        match leave_type {
            LeaveType::Annual => LeaveTypeConfig {
                leave_type,
                annual_days: 30,
                min_notice_days: 14,
                reapplicable: false,
            },
            LeaveType::Casual => LeaveTypeConfig {
                leave_type,
                annual_days: 7,
                min_notice_days: 14,
                reapplicable: false,
            },
            LeaveType::Sick => LeaveTypeConfig {
                leave_type,
                annual_days: 10,
                min_notice_days: 0,
                reapplicable: true,
            },
            LeaveType::Maternity => LeaveTypeConfig {
                leave_type,
                annual_days: 112,
                min_notice_days: 28,
                reapplicable: false,
            },
            LeaveType::Paternity => LeaveTypeConfig {
                leave_type,
                annual_days: 14,
                min_notice_days: 14,
                reapplicable: false,
            },
            // Duration comes from the study program, not a yearly allotment.
            LeaveType::Study => LeaveTypeConfig {
                leave_type,
                annual_days: 0,
                min_notice_days: 0,
                reapplicable: false,
            },
        }
    }

    /// Study leave is exempt from balance and notice checks; its dates are
    /// derived from the program duration instead.
    pub fn is_balance_tracked(&self) -> bool {
        self.leave_type != LeaveType::Study
    }
}
