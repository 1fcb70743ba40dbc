//! Date resolution: relative phrases and intelligent period ranges
//!
//! Date strings resolve against a caller-supplied reference moment, never the
//! ambient clock, so compilation stays reproducible. A resolved value keeps
//! datetime precision when the phrase has one (`now`, `3 days ago`) and date
//! precision otherwise (`today`, `2020-01-01`); the transformer adapts the
//! value to the column it is compared against.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::ast::surface::{RangeOffset, RangeUnit};

/// A resolved date value at the precision the source phrase carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateValue {
    Date(NaiveDate),
    Moment(NaiveDateTime),
}

impl DateValue {
    pub fn date(self) -> NaiveDate {
        match self {
            DateValue::Date(d) => d,
            DateValue::Moment(m) => m.date(),
        }
    }
}

/// Resolve a date string: ISO dates/datetimes, `today`, `now`, `yesterday`,
/// `tomorrow`, and `N <unit>[s] [ago]` for day/week/month/year units.
/// Returns `None` for anything else (including `N days from now`).
pub fn resolve_date_phrase(phrase: &str, reference: NaiveDateTime) -> Option<DateValue> {
    let trimmed = phrase.trim();
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(DateValue::Date(d));
    }
    if let Ok(m) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(DateValue::Moment(m));
    }
    if let Ok(m) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Some(DateValue::Moment(m));
    }

    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "today" => return Some(DateValue::Date(reference.date())),
        "now" => return Some(DateValue::Moment(reference)),
        "yesterday" => return Some(DateValue::Date(reference.date() - Duration::days(1))),
        "tomorrow" => return Some(DateValue::Date(reference.date() + Duration::days(1))),
        _ => {}
    }

    // "N day(s) [ago]" and friends; the trailing "ago" is optional
    let mut words = lowered.split_whitespace();
    let count: i64 = words.next()?.parse().ok()?;
    let unit = words.next()?;
    let tail = words.next();
    let well_formed = tail.is_none() || (tail == Some("ago") && words.next().is_none());
    if !well_formed {
        return None;
    }
    let moment = match unit.trim_end_matches('s') {
        "day" => reference - Duration::days(count),
        "week" => reference - Duration::weeks(count),
        "month" => shift_months_datetime(reference, -(count as i32)),
        "year" => shift_months_datetime(reference, -(count as i32) * 12),
        _ => return None,
    };
    Some(DateValue::Moment(moment))
}

/// Compute the period covered by an intelligent date range, as inclusive
/// date bounds. The offset shifts the reference by one period before the
/// bounds are taken.
pub fn period_range(offset: RangeOffset, unit: RangeUnit, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let shift = |d: NaiveDate, months: i32, days: i64| match offset {
        RangeOffset::Previous => {
            if days != 0 {
                d - Duration::days(days)
            } else {
                shift_months(d, -months)
            }
        }
        RangeOffset::Next => {
            if days != 0 {
                d + Duration::days(days)
            } else {
                shift_months(d, months)
            }
        }
        RangeOffset::Current => d,
    };

    // TODO: add a week unit
    match unit {
        RangeUnit::Year => {
            let d = shift(today, 12, 0);
            (ymd(d.year(), 1, 1), ymd(d.year(), 12, 31))
        }
        RangeUnit::Ytd => {
            let d = shift(today, 12, 0);
            (ymd(d.year(), 1, 1), d)
        }
        RangeUnit::Qtr => {
            let d = shift(today, 3, 0);
            let qtr = (d.month0()) / 3; // 0..=3
            let start = ymd(d.year(), qtr * 3 + 1, 1);
            let end = shift_months(start, 3) - Duration::days(1);
            (start, end)
        }
        RangeUnit::Month => {
            let d = shift(today, 1, 0);
            let start = ymd(d.year(), d.month(), 1);
            (start, shift_months(start, 1) - Duration::days(1))
        }
        RangeUnit::Mtd => {
            let d = shift(today, 1, 0);
            (ymd(d.year(), d.month(), 1), d)
        }
        RangeUnit::Day => {
            let d = shift(today, 0, 1);
            (d, d)
        }
    }
}

pub fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// The last representable moment of the day, `23:59:59.999999`.
pub fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    start_of_day(d + Duration::days(1)) - Duration::microseconds(1)
}

/// Promote a moment to the end of its day, but only if it is exactly
/// midnight; moments with a real time-of-day stay untouched.
pub fn promote_to_end_of_day(m: NaiveDateTime) -> NaiveDateTime {
    if m.hour() == 0 && m.minute() == 0 && m.second() == 0 && m.nanosecond() == 0 {
        end_of_day(m.date())
    } else {
        m
    }
}

/// Shift by whole months, clamping the day to the target month's length
/// (Jan 31 minus one month is Dec 31; Mar 31 minus one month is Feb 28/29).
pub(crate) fn shift_months(d: NaiveDate, months: i32) -> NaiveDate {
    let total = d.year() * 12 + d.month0() as i32 + months;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    let day = d.day().min(days_in_month(year, month));
    ymd(year, month, day)
}

fn shift_months_datetime(m: NaiveDateTime, months: i32) -> NaiveDateTime {
    shift_months(m.date(), months).and_time(m.time())
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        ymd(year + 1, 1, 1)
    } else {
        ymd(year, month + 1, 1)
    };
    (next - Duration::days(1)).day()
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDateTime {
        ymd(2020, 1, 14).and_hms_opt(9, 21, 34).unwrap()
    }

    #[test]
    fn resolves_iso_and_keywords() {
        let r = reference();
        assert_eq!(
            resolve_date_phrase("2020-01-01", r),
            Some(DateValue::Date(ymd(2020, 1, 1)))
        );
        assert_eq!(
            resolve_date_phrase("today", r),
            Some(DateValue::Date(ymd(2020, 1, 14)))
        );
        assert_eq!(resolve_date_phrase("now", r), Some(DateValue::Moment(r)));
    }

    #[test]
    fn resolves_relative_phrases_keeping_time() {
        let r = reference();
        let expected = ymd(2020, 1, 13).and_hms_opt(9, 21, 34).unwrap();
        for phrase in ["1 day ago", "1 days ago", "1 day", "1 days"] {
            assert_eq!(resolve_date_phrase(phrase, r), Some(DateValue::Moment(expected)));
        }
        assert_eq!(
            resolve_date_phrase("30 days ago", r),
            Some(DateValue::Moment(ymd(2019, 12, 15).and_hms_opt(9, 21, 34).unwrap()))
        );
    }

    #[test]
    fn rejects_unknown_phrases() {
        let r = reference();
        assert_eq!(resolve_date_phrase("potato", r), None);
        assert_eq!(resolve_date_phrase("1 day from now", r), None);
        assert_eq!(resolve_date_phrase("1 fortnight ago", r), None);
    }

    #[test]
    fn year_ranges() {
        let today = ymd(2020, 1, 14);
        assert_eq!(
            period_range(RangeOffset::Previous, RangeUnit::Year, today),
            (ymd(2019, 1, 1), ymd(2019, 12, 31))
        );
        assert_eq!(
            period_range(RangeOffset::Current, RangeUnit::Year, today),
            (ymd(2020, 1, 1), ymd(2020, 12, 31))
        );
        assert_eq!(
            period_range(RangeOffset::Next, RangeUnit::Year, today),
            (ymd(2021, 1, 1), ymd(2021, 12, 31))
        );
    }

    #[test]
    fn ytd_and_mtd_end_at_the_shifted_date() {
        let today = ymd(2020, 3, 14);
        assert_eq!(
            period_range(RangeOffset::Previous, RangeUnit::Ytd, today),
            (ymd(2019, 1, 1), ymd(2019, 3, 14))
        );
        assert_eq!(
            period_range(RangeOffset::Current, RangeUnit::Mtd, today),
            (ymd(2020, 3, 1), ymd(2020, 3, 14))
        );
    }

    #[test]
    fn quarter_and_month_ranges() {
        let today = ymd(2020, 5, 20);
        assert_eq!(
            period_range(RangeOffset::Current, RangeUnit::Qtr, today),
            (ymd(2020, 4, 1), ymd(2020, 6, 30))
        );
        assert_eq!(
            period_range(RangeOffset::Previous, RangeUnit::Qtr, today),
            (ymd(2020, 1, 1), ymd(2020, 3, 31))
        );
        assert_eq!(
            period_range(RangeOffset::Previous, RangeUnit::Month, today),
            (ymd(2020, 4, 1), ymd(2020, 4, 30))
        );
        assert_eq!(
            period_range(RangeOffset::Next, RangeUnit::Day, today),
            (ymd(2020, 5, 21), ymd(2020, 5, 21))
        );
    }

    #[test]
    fn month_shifts_clamp_the_day() {
        assert_eq!(shift_months(ymd(2020, 1, 31), -1), ymd(2019, 12, 31));
        assert_eq!(shift_months(ymd(2020, 3, 31), -1), ymd(2020, 2, 29));
        assert_eq!(shift_months(ymd(2019, 1, 31), 1), ymd(2019, 2, 28));
    }

    #[test]
    fn end_of_day_is_last_microsecond() {
        let eod = end_of_day(ymd(2019, 12, 31));
        assert_eq!(eod.to_string(), "2019-12-31 23:59:59.999999");
    }

    #[test]
    fn promotion_only_touches_midnight() {
        let midnight = start_of_day(ymd(2020, 1, 30));
        assert_eq!(
            promote_to_end_of_day(midnight),
            end_of_day(ymd(2020, 1, 30))
        );
        let afternoon = ymd(2020, 1, 30).and_hms_opt(9, 21, 34).unwrap();
        assert_eq!(promote_to_end_of_day(afternoon), afternoon);
    }
}
