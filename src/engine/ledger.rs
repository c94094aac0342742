use crate::engine::error::LedgerError;
use crate::model::leave_balance::LeaveBalance;

/// Pure reserve/commit/release arithmetic on a balance row.
///
/// Callers load the row under a `SELECT ... FOR UPDATE` lock, apply one of
/// these operations, and write all four columns back in the same
/// transaction, so racing operations on the same (user, leave_type, year)
/// serialize on the row lock instead of corrupting the invariant.
pub fn reserve(balance: &LeaveBalance, days: i64) -> Result<LeaveBalance, LedgerError> {
    if days > balance.available_days {
        return Err(LedgerError::InsufficientBalance {
            requested: days,
            available: balance.available_days,
        });
    }
    let mut next = balance.clone();
    next.available_days -= days;
    next.pending_days += days;
    Ok(next)
}

/// Final approval: pending -> used. Allocated is unchanged.
pub fn commit(balance: &LeaveBalance, days: i64) -> Result<LeaveBalance, LedgerError> {
    if days > balance.pending_days {
        return Err(LedgerError::ConcurrentModification(format!(
            "cannot commit {} days, only {} pending",
            days, balance.pending_days
        )));
    }
    let mut next = balance.clone();
    next.pending_days -= days;
    next.used_days += days;
    Ok(next)
}

/// Rejection: pending -> available.
pub fn release(balance: &LeaveBalance, days: i64) -> Result<LeaveBalance, LedgerError> {
    if days > balance.pending_days {
        return Err(LedgerError::ConcurrentModification(format!(
            "cannot release {} days, only {} pending",
            days, balance.pending_days
        )));
    }
    let mut next = balance.clone();
    next.pending_days -= days;
    next.available_days += days;
    Ok(next)
}

/// Reapplicable top-up: extra allotment granted outside the yearly
/// allocation cycle (sick leave). Used and pending days are untouched.
pub fn top_up(balance: &LeaveBalance, days: i64) -> LeaveBalance {
    let mut next = balance.clone();
    next.allocated_days += days;
    next.available_days += days;
    next
}

pub fn invariant_holds(balance: &LeaveBalance) -> bool {
    balance.available_days == balance.allocated_days - balance.used_days - balance.pending_days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance(allocated: i64, used: i64, pending: i64) -> LeaveBalance {
        LeaveBalance {
            id: 1,
            user_id: 1000,
            leave_type: "annual".to_string(),
            year: 2026,
            allocated_days: allocated,
            used_days: used,
            pending_days: pending,
            available_days: allocated - used - pending,
        }
    }

    #[test]
    fn reserve_moves_available_to_pending() {
        let b = balance(30, 4, 0);
        let next = reserve(&b, 5).unwrap();
        assert_eq!(next.available_days, 21);
        assert_eq!(next.pending_days, 5);
        assert_eq!(next.used_days, 4);
        assert!(invariant_holds(&next));
    }

    #[test]
    fn reserve_fails_when_days_exceed_available() {
        let b = balance(30, 25, 0);
        let err = reserve(&b, 10).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                requested: 10,
                available: 5
            }
        );
    }

    #[test]
    fn commit_moves_pending_to_used_and_keeps_allocated() {
        let b = balance(30, 4, 5);
        let next = commit(&b, 5).unwrap();
        assert_eq!(next.pending_days, 0);
        assert_eq!(next.used_days, 9);
        assert_eq!(next.allocated_days, 30);
        assert!(invariant_holds(&next));
    }

    #[test]
    fn release_returns_pending_to_available() {
        let b = balance(30, 4, 5);
        let next = release(&b, 5).unwrap();
        assert_eq!(next.pending_days, 0);
        assert_eq!(next.available_days, 26);
        assert_eq!(next.used_days, 4);
        assert!(invariant_holds(&next));
    }

    #[test]
    fn commit_more_than_pending_is_a_conflict() {
        let b = balance(30, 0, 3);
        assert!(matches!(
            commit(&b, 5),
            Err(LedgerError::ConcurrentModification(_))
        ));
    }

    #[test]
    fn release_more_than_pending_is_a_conflict() {
        let b = balance(30, 0, 3);
        assert!(matches!(
            release(&b, 5),
            Err(LedgerError::ConcurrentModification(_))
        ));
    }

    #[test]
    fn top_up_raises_allocation_and_availability_together() {
        let b = balance(10, 6, 2);
        let next = top_up(&b, 5);
        assert_eq!(next.allocated_days, 15);
        assert_eq!(next.available_days, 7);
        assert_eq!(next.used_days, 6);
        assert_eq!(next.pending_days, 2);
        assert!(invariant_holds(&next));
    }

    #[test]
    fn invariant_holds_across_a_full_cycle() {
        let b = balance(30, 0, 0);
        let reserved = reserve(&b, 7).unwrap();
        assert!(invariant_holds(&reserved));
        let committed = commit(&reserved, 7).unwrap();
        assert!(invariant_holds(&committed));
        assert_eq!(committed.used_days, 7);
        assert_eq!(committed.available_days, 23);
    }
}
