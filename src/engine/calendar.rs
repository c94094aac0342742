use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Active public-holiday dates, injected per invocation. Callers scope the
/// set to the years a computation may touch (the start year plus the next,
/// when a range can cross a year boundary).
pub type HolidaySet = HashSet<NaiveDate>;

/// Longest single request accepted, in working days. 365 working days span
/// fewer than two calendar years, so the computed end date never leaves a
/// holiday window of the start year plus the two following years.
pub const MAX_REQUEST_WORKING_DAYS: u32 = 365;

pub fn is_working_day(date: NaiveDate, holidays: &HolidaySet) -> bool {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => false,
        _ => !holidays.contains(&date),
    }
}

/// Date reached after counting exactly `count` working days forward from
/// `start`, with `start` itself counted as day 1 when it is a working day.
/// Weekends and holidays are skipped without consuming the count.
///
/// `count` must be >= 1.
pub fn add_working_days(start: NaiveDate, count: u32, holidays: &HolidaySet) -> NaiveDate {
    debug_assert!(count >= 1);
    let mut current = start;
    let mut counted = 0u32;
    loop {
        if is_working_day(current, holidays) {
            counted += 1;
            if counted == count {
                return current;
            }
        }
        current = current
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
    }
}

/// First working day strictly after `end`. A weekend or holiday is never a
/// valid resumption day.
pub fn next_resumption_day(end: NaiveDate, holidays: &HolidaySet) -> NaiveDate {
    let mut current = end
        .checked_add_days(Days::new(1))
        .unwrap_or(NaiveDate::MAX);
    while !is_working_day(current, holidays) {
        current = current
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekends_are_not_working_days() {
        let holidays = HolidaySet::new();
        // 2026-03-07 is a Saturday, 2026-03-08 a Sunday
        assert!(!is_working_day(d(2026, 3, 7), &holidays));
        assert!(!is_working_day(d(2026, 3, 8), &holidays));
        assert!(is_working_day(d(2026, 3, 9), &holidays));
    }

    #[test]
    fn active_holiday_is_not_a_working_day() {
        let holidays = HolidaySet::from([d(2026, 3, 9)]);
        assert!(!is_working_day(d(2026, 3, 9), &holidays));
    }

    #[test]
    fn monday_plus_five_working_days_is_friday() {
        let holidays = HolidaySet::new();
        // 2026-03-02 is a Monday
        let end = add_working_days(d(2026, 3, 2), 5, &holidays);
        assert_eq!(end, d(2026, 3, 6));
        let resumption = next_resumption_day(end, &holidays);
        assert_eq!(resumption, d(2026, 3, 9)); // next Monday
    }

    #[test]
    fn holiday_mid_week_pushes_end_date_out() {
        // Wednesday is a holiday, so 5 working days from Monday land on the
        // following Monday.
        let holidays = HolidaySet::from([d(2026, 3, 4)]);
        let end = add_working_days(d(2026, 3, 2), 5, &holidays);
        assert_eq!(end, d(2026, 3, 9));
    }

    #[test]
    fn start_on_weekend_does_not_count_as_day_one() {
        let holidays = HolidaySet::new();
        // Saturday start: day 1 is the following Monday
        let end = add_working_days(d(2026, 3, 7), 1, &holidays);
        assert_eq!(end, d(2026, 3, 9));
    }

    #[test]
    fn resumption_skips_weekend_and_holiday() {
        // Friday end, following Monday is a holiday -> resume Tuesday
        let holidays = HolidaySet::from([d(2026, 3, 9)]);
        assert_eq!(next_resumption_day(d(2026, 3, 6), &holidays), d(2026, 3, 10));
    }

    #[test]
    fn resumption_of_computed_end_is_always_a_working_day() {
        let holidays = HolidaySet::from([d(2026, 1, 1), d(2026, 4, 14), d(2026, 12, 25)]);
        let mut start = d(2026, 1, 1);
        for n in 1..=30 {
            let end = add_working_days(start, n, &holidays);
            let resumption = next_resumption_day(end, &holidays);
            assert!(is_working_day(resumption, &holidays));
            assert!(resumption > end);
            start = start.succ_opt().unwrap();
        }
    }

    #[test]
    fn longest_request_stays_within_a_three_year_holiday_window() {
        let holidays = HolidaySet::new();
        // Worst case: a start on the last day of the year.
        let start = d(2026, 12, 31);
        let end = add_working_days(start, MAX_REQUEST_WORKING_DAYS, &holidays);
        assert!(end.year() <= start.year() + 2);
    }
}
