use chrono::{Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::engine::desired_months::{self, DesiredMonthsCheck};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_type::{LeaveType, LeaveTypeConfig, StudyProgram};

/// Machine-readable reason attached to a failed check.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckFailure {
    InsufficientBalance,
    DateOverlap,
    InsufficientNotice,
    DesiredMonthsRequired,
    DesiredMonthsViolation,
    MissingStudyProgram,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<CheckFailure>,
    pub message: String,
}

impl CheckResult {
    fn pass(message: impl Into<String>) -> Self {
        CheckResult {
            valid: true,
            failure: None,
            message: message.into(),
        }
    }

    fn fail(failure: CheckFailure, message: impl Into<String>) -> Self {
        CheckResult {
            valid: false,
            failure: Some(failure),
            message: message.into(),
        }
    }
}

/// An existing application of the same user considered for overlap.
#[derive(Debug, Clone)]
pub struct ExistingLeave {
    pub application_number: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Everything the engine needs, gathered by the caller. `balance` is the
/// row for (user, leave_type, start year); `None` when no row exists.
/// `desired_months` is `None` when the user has never submitted a choice.
#[derive(Debug)]
pub struct ValidationInput<'a> {
    pub leave_type: LeaveType,
    pub study_program: Option<StudyProgram>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_days: i64,
    pub today: NaiveDate,
    pub balance: Option<&'a LeaveBalance>,
    pub existing: &'a [ExistingLeave],
    pub desired_months: Option<[u32; 2]>,
}

/// Aggregated verdict. All applicable checks run; nothing short-circuits,
/// so a submitter sees every problem at once.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_program: Option<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sufficient_balance: Option<CheckResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_months: Option<CheckResult>,
    pub no_overlap: CheckResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_notice: Option<CheckResult>,
    pub warnings: Vec<String>,
}

impl LeaveValidation {
    pub fn failures(&self) -> Vec<&CheckResult> {
        [
            self.study_program.as_ref(),
            self.sufficient_balance.as_ref(),
            self.desired_months.as_ref(),
            Some(&self.no_overlap),
            self.minimum_notice.as_ref(),
        ]
        .into_iter()
        .flatten()
        .filter(|c| !c.valid)
        .collect()
    }
}

/// End date of a study leave: start + program duration - 1 day. Derived,
/// never user-supplied.
pub fn study_end_date(start: NaiveDate, program: StudyProgram) -> NaiveDate {
    start
        .checked_add_months(Months::new(12 * program.duration_years()))
        .and_then(|d| d.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

const LOW_BALANCE_THRESHOLD: i64 = 5;

pub fn validate(input: &ValidationInput<'_>) -> LeaveValidation {
    let config = LeaveTypeConfig::for_type(input.leave_type);
    let is_study = input.leave_type == LeaveType::Study;

    let study_program = is_study.then(|| match input.study_program {
        Some(program) => CheckResult::pass(format!(
            "{} program, {} year duration",
            program,
            program.duration_years()
        )),
        None => CheckResult::fail(
            CheckFailure::MissingStudyProgram,
            "A study program (bsc, msc or phd) is required for study leave",
        ),
    });

    // Balance and notice are policy-exempt for study leave.
    let sufficient_balance = (!is_study).then(|| check_balance(input));
    let minimum_notice = (!is_study).then(|| check_notice(input, &config));

    // Annual leave only; fails closed when no choice was ever submitted.
    let desired_months = (input.leave_type == LeaveType::Annual).then(|| {
        match input.desired_months {
            None => CheckResult::fail(
                CheckFailure::DesiredMonthsRequired,
                "Submit your desired leave months before applying for annual leave",
            ),
            Some(desired) => {
                let check: DesiredMonthsCheck =
                    desired_months::validate_range(desired, input.start_date, input.end_date);
                if check.is_valid {
                    CheckResult::pass(check.message)
                } else {
                    CheckResult::fail(CheckFailure::DesiredMonthsViolation, check.message)
                }
            }
        }
    });

    let no_overlap = check_overlap(input);

    let mut warnings = Vec::new();
    if let (Some(balance), Some(check)) = (input.balance, sufficient_balance.as_ref()) {
        if check.valid && balance.available_days - input.working_days < LOW_BALANCE_THRESHOLD {
            warnings.push(format!(
                "Only {} {} day(s) would remain after this request",
                balance.available_days - input.working_days,
                input.leave_type
            ));
        }
    }

    let is_valid = [
        study_program.as_ref(),
        sufficient_balance.as_ref(),
        desired_months.as_ref(),
        Some(&no_overlap),
        minimum_notice.as_ref(),
    ]
    .into_iter()
    .flatten()
    .all(|c| c.valid);

    LeaveValidation {
        is_valid,
        study_program,
        sufficient_balance,
        desired_months,
        no_overlap,
        minimum_notice,
        warnings,
    }
}

fn check_balance(input: &ValidationInput<'_>) -> CheckResult {
    let available = input.balance.map(|b| b.available_days).unwrap_or(0);
    if input.working_days <= available {
        CheckResult::pass(format!(
            "{} day(s) available, {} requested",
            available, input.working_days
        ))
    } else {
        CheckResult::fail(
            CheckFailure::InsufficientBalance,
            format!(
                "Insufficient {} balance: {} day(s) requested, {} available",
                input.leave_type, input.working_days, available
            ),
        )
    }
}

fn check_notice(input: &ValidationInput<'_>, config: &LeaveTypeConfig) -> CheckResult {
    let provided = (input.start_date - input.today).num_days();
    if provided >= config.min_notice_days {
        CheckResult::pass(format!("{} day(s) notice provided", provided))
    } else {
        CheckResult::fail(
            CheckFailure::InsufficientNotice,
            format!(
                "{} leave requires {} day(s) notice, {} provided",
                input.leave_type, config.min_notice_days, provided
            ),
        )
    }
}

// Inclusive-date interval intersection; adjacent ranges do not conflict.
fn check_overlap(input: &ValidationInput<'_>) -> CheckResult {
    let conflict = input
        .existing
        .iter()
        .find(|e| input.start_date <= e.end_date && e.start_date <= input.end_date);
    match conflict {
        None => CheckResult::pass("No overlapping applications"),
        Some(existing) => CheckResult::fail(
            CheckFailure::DateOverlap,
            format!(
                "Dates overlap application {} ({} to {})",
                existing.application_number, existing.start_date, existing.end_date
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn balance(available: i64) -> LeaveBalance {
        LeaveBalance {
            id: 1,
            user_id: 1000,
            leave_type: "annual".to_string(),
            year: 2026,
            allocated_days: 30,
            used_days: 30 - available,
            pending_days: 0,
            available_days: available,
        }
    }

    fn input<'a>(
        leave_type: LeaveType,
        balance: Option<&'a LeaveBalance>,
        existing: &'a [ExistingLeave],
    ) -> ValidationInput<'a> {
        ValidationInput {
            leave_type,
            study_program: None,
            start_date: d(2026, 3, 2),
            end_date: d(2026, 3, 6),
            working_days: 5,
            today: d(2026, 2, 2),
            balance,
            existing,
            desired_months: Some([3, 7]),
        }
    }

    #[test]
    fn clean_annual_request_passes_all_checks() {
        let b = balance(20);
        let result = validate(&input(LeaveType::Annual, Some(&b), &[]));
        assert!(result.is_valid);
        assert!(result.failures().is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn all_failures_are_reported_at_once() {
        let b = balance(2);
        let existing = [ExistingLeave {
            application_number: "LA-2026-aaaa".to_string(),
            start_date: d(2026, 3, 4),
            end_date: d(2026, 3, 10),
        }];
        let mut inp = input(LeaveType::Annual, Some(&b), &existing);
        inp.today = d(2026, 2, 25); // only 5 days notice
        inp.desired_months = Some([6, 7]);
        let result = validate(&inp);
        assert!(!result.is_valid);
        let failures: Vec<_> = result.failures().iter().map(|c| c.failure).collect();
        assert_eq!(
            failures,
            vec![
                Some(CheckFailure::InsufficientBalance),
                Some(CheckFailure::DesiredMonthsViolation),
                Some(CheckFailure::DateOverlap),
                Some(CheckFailure::InsufficientNotice),
            ]
        );
    }

    #[test]
    fn insufficient_balance_with_exact_message() {
        let b = balance(5);
        let mut inp = input(LeaveType::Annual, Some(&b), &[]);
        inp.working_days = 10;
        let result = validate(&inp);
        let check = result.sufficient_balance.unwrap();
        assert!(!check.valid);
        assert_eq!(check.failure, Some(CheckFailure::InsufficientBalance));
    }

    #[test]
    fn missing_desired_months_blocks_annual_leave() {
        let b = balance(20);
        let mut inp = input(LeaveType::Annual, Some(&b), &[]);
        inp.desired_months = None;
        let result = validate(&inp);
        assert!(!result.is_valid);
        assert_eq!(
            result.desired_months.unwrap().failure,
            Some(CheckFailure::DesiredMonthsRequired)
        );
    }

    #[test]
    fn non_annual_leave_skips_desired_months() {
        let b = balance(7);
        let mut inp = input(LeaveType::Casual, Some(&b), &[]);
        inp.desired_months = None;
        let result = validate(&inp);
        assert!(result.desired_months.is_none());
        assert!(result.is_valid);
    }

    #[test]
    fn sick_leave_has_no_notice_requirement() {
        let b = balance(10);
        let mut inp = input(LeaveType::Sick, Some(&b), &[]);
        inp.desired_months = None;
        inp.today = inp.start_date; // same-day submission
        let result = validate(&inp);
        assert!(result.minimum_notice.unwrap().valid);
    }

    #[test]
    fn maternity_requires_four_weeks_notice() {
        let b = balance(112);
        let mut inp = input(LeaveType::Maternity, Some(&b), &[]);
        inp.today = d(2026, 2, 10); // 20 days notice, 28 required
        let result = validate(&inp);
        let check = result.minimum_notice.unwrap();
        assert_eq!(check.failure, Some(CheckFailure::InsufficientNotice));
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let b = balance(20);
        let existing = [ExistingLeave {
            application_number: "LA-2026-bbbb".to_string(),
            start_date: d(2026, 2, 23),
            end_date: d(2026, 3, 1),
        }];
        let result = validate(&input(LeaveType::Annual, Some(&b), &existing));
        assert!(result.no_overlap.valid);
    }

    #[test]
    fn shared_boundary_day_is_an_overlap() {
        let b = balance(20);
        let existing = [ExistingLeave {
            application_number: "LA-2026-cccc".to_string(),
            start_date: d(2026, 2, 23),
            end_date: d(2026, 3, 2),
        }];
        let result = validate(&input(LeaveType::Annual, Some(&b), &existing));
        assert_eq!(
            result.no_overlap.failure,
            Some(CheckFailure::DateOverlap)
        );
    }

    #[test]
    fn study_leave_skips_balance_and_notice() {
        let mut inp = input(LeaveType::Study, None, &[]);
        inp.study_program = Some(StudyProgram::Msc);
        inp.today = inp.start_date;
        inp.desired_months = None;
        let result = validate(&inp);
        assert!(result.is_valid);
        assert!(result.sufficient_balance.is_none());
        assert!(result.minimum_notice.is_none());
        assert!(result.study_program.unwrap().valid);
    }

    #[test]
    fn study_leave_without_program_fails() {
        let mut inp = input(LeaveType::Study, None, &[]);
        inp.desired_months = None;
        let result = validate(&inp);
        assert!(!result.is_valid);
        assert_eq!(
            result.study_program.unwrap().failure,
            Some(CheckFailure::MissingStudyProgram)
        );
    }

    #[test]
    fn msc_study_leave_end_date_is_two_years_minus_a_day() {
        assert_eq!(
            study_end_date(d(2025, 1, 1), StudyProgram::Msc),
            d(2026, 12, 31)
        );
        assert_eq!(
            study_end_date(d(2025, 6, 15), StudyProgram::Bsc),
            d(2029, 6, 14)
        );
    }

    #[test]
    fn low_remaining_balance_produces_a_warning() {
        let b = balance(8);
        let result = validate(&input(LeaveType::Annual, Some(&b), &[]));
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("3"));
    }
}
