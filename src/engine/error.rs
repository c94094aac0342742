use thiserror::Error;

use crate::model::leave_application::LeaveStatus;

/// Ledger arithmetic failures. `ConcurrentModification` means a racing
/// operation already moved the days this one expected to find in `pending`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance: requested {requested} days, {available} available")]
    InsufficientBalance { requested: i64, available: i64 },
    #[error("concurrent modification: {0}")]
    ConcurrentModification(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DesiredMonthsError {
    #[error("exactly 2 distinct months between 1 and 12 must be selected")]
    InvalidMonthSelection,
    #[error("desired leave months have already been submitted and are locked")]
    AlreadySubmitted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("application in status {current} cannot accept this action")]
    InvalidTransition { current: LeaveStatus },
    #[error("role {role} is not authorized to act on a {status} application")]
    Unauthorized { role: String, status: LeaveStatus },
    #[error("a rejection requires a comment")]
    CommentRequired,
}
