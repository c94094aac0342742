use crate::engine::error::WorkflowError;
use crate::model::leave_application::LeaveStatus;
use crate::model::role::Role;

/// Approval stage whose fields (approved_by/at/comments) a transition fills.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Director,
    Hr,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Balance movement that must happen in the same transaction as the status
/// change. `None` for the director approval, which only advances the chain.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LedgerEffect {
    Commit,
    Release,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionOutcome {
    pub next_status: LeaveStatus,
    pub stage: Stage,
    pub ledger_effect: Option<LedgerEffect>,
}

/// Entry state resolved once from the applicant's role. A director's own
/// application skips the director stage, so its only approval path is
/// pending_hr -> approved.
pub fn initial_status(role: Role) -> LeaveStatus {
    match role {
        Role::Director => LeaveStatus::PendingHr,
        Role::Staff | Role::Hr | Role::Admin => LeaveStatus::PendingDirector,
    }
}

/// Resolve an approve/reject action against the current status.
///
/// Acting on an application outside the expected state is
/// `InvalidTransition`, which also makes retries idempotency-safe: a second
/// approve of an approved application fails here before any ledger write.
pub fn transition(
    current: LeaveStatus,
    actor_role: Role,
    decision: Decision,
    comments: Option<&str>,
) -> Result<TransitionOutcome, WorkflowError> {
    if decision == Decision::Reject && comments.map_or(true, |c| c.trim().is_empty()) {
        return Err(WorkflowError::CommentRequired);
    }

    let stage = match current {
        LeaveStatus::PendingDirector => Stage::Director,
        LeaveStatus::PendingHr => Stage::Hr,
        LeaveStatus::Approved | LeaveStatus::Rejected => {
            return Err(WorkflowError::InvalidTransition { current });
        }
    };

    let authorized = match stage {
        Stage::Director => actor_role == Role::Director,
        Stage::Hr => matches!(actor_role, Role::Hr | Role::Admin),
    };
    if !authorized {
        return Err(WorkflowError::Unauthorized {
            role: actor_role.to_string(),
            status: current,
        });
    }

    let outcome = match (stage, decision) {
        (Stage::Director, Decision::Approve) => TransitionOutcome {
            next_status: LeaveStatus::PendingHr,
            stage,
            ledger_effect: None,
        },
        (Stage::Director, Decision::Reject) => TransitionOutcome {
            next_status: LeaveStatus::Rejected,
            stage,
            ledger_effect: Some(LedgerEffect::Release),
        },
        (Stage::Hr, Decision::Approve) => TransitionOutcome {
            next_status: LeaveStatus::Approved,
            stage,
            ledger_effect: Some(LedgerEffect::Commit),
        },
        (Stage::Hr, Decision::Reject) => TransitionOutcome {
            next_status: LeaveStatus::Rejected,
            stage,
            ledger_effect: Some(LedgerEffect::Release),
        },
    };
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_and_hr_applications_start_at_director_stage() {
        assert_eq!(initial_status(Role::Staff), LeaveStatus::PendingDirector);
        assert_eq!(initial_status(Role::Hr), LeaveStatus::PendingDirector);
        assert_eq!(initial_status(Role::Admin), LeaveStatus::PendingDirector);
    }

    #[test]
    fn director_applications_skip_straight_to_hr() {
        assert_eq!(initial_status(Role::Director), LeaveStatus::PendingHr);
    }

    #[test]
    fn director_approval_advances_to_hr_without_ledger_effect() {
        let outcome = transition(
            LeaveStatus::PendingDirector,
            Role::Director,
            Decision::Approve,
            Some("fine by me"),
        )
        .unwrap();
        assert_eq!(outcome.next_status, LeaveStatus::PendingHr);
        assert_eq!(outcome.stage, Stage::Director);
        assert_eq!(outcome.ledger_effect, None);
    }

    #[test]
    fn hr_approval_is_final_and_commits() {
        let outcome =
            transition(LeaveStatus::PendingHr, Role::Hr, Decision::Approve, None).unwrap();
        assert_eq!(outcome.next_status, LeaveStatus::Approved);
        assert_eq!(outcome.ledger_effect, Some(LedgerEffect::Commit));
    }

    #[test]
    fn admin_may_act_at_the_hr_stage() {
        let outcome =
            transition(LeaveStatus::PendingHr, Role::Admin, Decision::Approve, None).unwrap();
        assert_eq!(outcome.next_status, LeaveStatus::Approved);
    }

    #[test]
    fn rejection_releases_reserved_balance() {
        let outcome = transition(
            LeaveStatus::PendingDirector,
            Role::Director,
            Decision::Reject,
            Some("conflicts with project deadline"),
        )
        .unwrap();
        assert_eq!(outcome.next_status, LeaveStatus::Rejected);
        assert_eq!(outcome.ledger_effect, Some(LedgerEffect::Release));
    }

    #[test]
    fn rejection_without_comment_is_refused() {
        let err = transition(
            LeaveStatus::PendingHr,
            Role::Hr,
            Decision::Reject,
            Some("   "),
        )
        .unwrap_err();
        assert_eq!(err, WorkflowError::CommentRequired);
        let err =
            transition(LeaveStatus::PendingHr, Role::Hr, Decision::Reject, None).unwrap_err();
        assert_eq!(err, WorkflowError::CommentRequired);
    }

    #[test]
    fn director_cannot_act_on_an_hr_stage_application() {
        let err = transition(
            LeaveStatus::PendingHr,
            Role::Director,
            Decision::Approve,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Unauthorized { .. }));
    }

    #[test]
    fn staff_cannot_approve_anything() {
        for status in [LeaveStatus::PendingDirector, LeaveStatus::PendingHr] {
            let err = transition(status, Role::Staff, Decision::Approve, None).unwrap_err();
            assert!(matches!(err, WorkflowError::Unauthorized { .. }));
        }
    }

    #[test]
    fn approving_twice_is_an_error_not_a_double_commit() {
        let first =
            transition(LeaveStatus::PendingHr, Role::Hr, Decision::Approve, None).unwrap();
        assert_eq!(first.next_status, LeaveStatus::Approved);
        let second = transition(first.next_status, Role::Hr, Decision::Approve, None);
        assert_eq!(
            second,
            Err(WorkflowError::InvalidTransition {
                current: LeaveStatus::Approved
            })
        );
    }

    #[test]
    fn terminal_states_accept_no_action() {
        for status in [LeaveStatus::Approved, LeaveStatus::Rejected] {
            assert!(transition(status, Role::Admin, Decision::Approve, None).is_err());
            assert!(
                transition(status, Role::Admin, Decision::Reject, Some("late")).is_err()
            );
        }
    }
}
