use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::error::DesiredMonthsError;

/// Normalize a submitted month selection: dedupe, then require exactly two
/// distinct values in 1..=12. `[3, 3]` therefore fails rather than
/// collapsing to a single month. The result is sorted ascending.
pub fn normalize_selection(months: &[u32]) -> Result<[u32; 2], DesiredMonthsError> {
    if months.iter().any(|m| !(1..=12).contains(m)) {
        return Err(DesiredMonthsError::InvalidMonthSelection);
    }
    let mut unique: Vec<u32> = months.to_vec();
    unique.sort_unstable();
    unique.dedup();
    match unique.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(DesiredMonthsError::InvalidMonthSelection),
    }
}

/// Calendar months spanned by the inclusive range `[start, end]`, in order.
pub fn months_spanned(start: NaiveDate, end: NaiveDate) -> Vec<u32> {
    let mut months = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    while (year, month) <= (end.year(), end.month()) {
        months.push(month);
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    months
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DesiredMonthsCheck {
    pub is_valid: bool,
    pub desired_months: [u32; 2],
    pub leave_months: Vec<u32>,
    pub message: String,
}

/// Every month spanned by the leave range must be one of the user's two
/// desired months. Applies to annual leave only; the caller exempts other
/// leave types.
pub fn validate_range(desired: [u32; 2], start: NaiveDate, end: NaiveDate) -> DesiredMonthsCheck {
    let leave_months = months_spanned(start, end);
    let outside: Vec<u32> = leave_months
        .iter()
        .copied()
        .filter(|m| !desired.contains(m))
        .collect();
    let is_valid = outside.is_empty();
    let message = if is_valid {
        "Leave dates fall within your desired months".to_string()
    } else {
        format!(
            "Leave spans month(s) {:?} outside your desired months {:?}",
            outside, desired
        )
    };
    DesiredMonthsCheck {
        is_valid,
        desired_months: desired,
        leave_months,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn selection_is_sorted_and_deduped() {
        assert_eq!(normalize_selection(&[7, 3]).unwrap(), [3, 7]);
    }

    #[test]
    fn duplicate_months_fail_instead_of_collapsing() {
        assert_eq!(
            normalize_selection(&[3, 3]),
            Err(DesiredMonthsError::InvalidMonthSelection)
        );
    }

    #[test]
    fn wrong_count_or_out_of_range_fails() {
        assert!(normalize_selection(&[3]).is_err());
        assert!(normalize_selection(&[1, 2, 3]).is_err());
        assert!(normalize_selection(&[0, 7]).is_err());
        assert!(normalize_selection(&[3, 13]).is_err());
    }

    #[test]
    fn months_spanned_within_one_month() {
        assert_eq!(months_spanned(d(2026, 3, 5), d(2026, 3, 20)), vec![3]);
    }

    #[test]
    fn months_spanned_across_boundary_and_year() {
        assert_eq!(months_spanned(d(2026, 3, 20), d(2026, 4, 2)), vec![3, 4]);
        assert_eq!(
            months_spanned(d(2026, 12, 20), d(2027, 1, 5)),
            vec![12, 1]
        );
    }

    #[test]
    fn range_inside_desired_months_passes() {
        let check = validate_range([3, 7], d(2026, 3, 5), d(2026, 3, 20));
        assert!(check.is_valid);
        assert_eq!(check.leave_months, vec![3]);
    }

    #[test]
    fn range_leaking_into_undesired_month_fails() {
        let check = validate_range([3, 7], d(2026, 3, 20), d(2026, 4, 2));
        assert!(!check.is_valid);
        assert_eq!(check.leave_months, vec![3, 4]);
        assert_eq!(check.desired_months, [3, 7]);
    }
}
