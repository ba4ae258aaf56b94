use chrono::{DateTime, Days, Local, Months, NaiveDate};

use super::rule::*;
use crate::core::CalcError;

/// Default cap on the number of generated billing dates.
pub const DEFAULT_MAX_DATES: usize = 12;

/// The billing date following `start` under `rule`.
///
/// Months and years use calendar arithmetic that clamps to the end of the
/// month (Jan 31 + 1 month = Feb 29 in 2024). Unrecognized recurrence types
/// and custom periods fall back to monthly steps.
///
/// ```
/// use chrono::NaiveDate;
/// use invoice_calc::recurring::*;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// let next = calculate_next_billing_date(start, &RecurrenceRule::monthly());
/// assert_eq!(next, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
/// ```
pub fn calculate_next_billing_date(start: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
    checked_next_billing_date(start, rule).unwrap_or_else(|| {
        tracing::warn!(%start, "billing date out of range, saturating");
        NaiveDate::MAX
    })
}

/// Like [`calculate_next_billing_date`], but `None` when the next date
/// falls outside the supported calendar range.
pub fn checked_next_billing_date(start: NaiveDate, rule: &RecurrenceRule) -> Option<NaiveDate> {
    match &rule.recurring_type {
        RecurringType::Weekly => add_days(start, 7),
        RecurringType::Monthly => add_months(start, 1),
        RecurringType::Quarterly => add_months(start, 3),
        RecurringType::Yearly => add_months(start, 12),
        RecurringType::Custom => {
            let every = rule.every();
            match rule.period() {
                CustomPeriod::Days => add_days(start, u64::from(every)),
                CustomPeriod::Weeks => add_days(start, u64::from(every) * 7),
                CustomPeriod::Months => add_months(start, every),
                CustomPeriod::Years => add_months(start, every.saturating_mul(12)),
                CustomPeriod::Other(raw) => {
                    tracing::debug!(
                        custom_period = %raw,
                        "unrecognized custom period, stepping in months"
                    );
                    add_months(start, every)
                }
            }
        }
        RecurringType::Other(raw) => {
            tracing::debug!(recurring_type = %raw, "unrecognized recurring type, using monthly");
            add_months(start, 1)
        }
    }
}

/// Billing dates starting at `start` (inclusive).
///
/// Produces `min(occurrences, max_dates)` dates for a limited schedule and
/// exactly `max_dates` for an unlimited one. Each date is derived from the
/// previous one, so month-end clamping carries forward
/// (Jan 31 → Feb 29 → Mar 29). The schedule ends early if the next date
/// would fall outside the supported calendar range.
pub fn calculate_future_billing_dates(
    start: NaiveDate,
    rule: &RecurrenceRule,
    occurrences: Occurrences,
    max_dates: usize,
) -> Vec<NaiveDate> {
    let count = match occurrences {
        Occurrences::Unlimited => max_dates,
        Occurrences::Limited(n) => usize::try_from(n).unwrap_or(usize::MAX).min(max_dates),
    };

    let dates: Vec<NaiveDate> =
        std::iter::successors(Some(start), |date| checked_next_billing_date(*date, rule))
            .take(count)
            .collect();
    if dates.len() < count {
        tracing::debug!(
            requested = count,
            produced = dates.len(),
            "schedule reached the end of the calendar range"
        );
    }
    dates
}

/// Whether a recurring invoice should still be issued on `today`.
///
/// Inactive once `current_occurrence` reaches a limited `occurrences`
/// count, or once the end date has begun: `end_date` is read as the start
/// of that day, so the schedule is already inactive on the end date itself.
pub fn is_recurring_active_on(
    occurrences: Occurrences,
    current_occurrence: u32,
    end_date: Option<NaiveDate>,
    today: NaiveDate,
) -> bool {
    if let Occurrences::Limited(limit) = occurrences {
        if current_occurrence >= limit {
            return false;
        }
    }
    if let Some(end) = end_date {
        if today >= end {
            return false;
        }
    }
    true
}

/// [`is_recurring_active_on`] evaluated against the local clock.
pub fn is_recurring_active(
    occurrences: Occurrences,
    current_occurrence: u32,
    end_date: Option<NaiveDate>,
) -> bool {
    let today = Local::now().date_naive();
    is_recurring_active_on(occurrences, current_occurrence, end_date, today)
}

/// Parse a billing date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_billing_date(value: &str) -> Result<NaiveDate, CalcError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|e| CalcError::InvalidDate(format!("'{value}': {e}")))
}

fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn next(start: NaiveDate, rule: RecurrenceRule) -> NaiveDate {
        calculate_next_billing_date(start, &rule)
    }

    #[test]
    fn fixed_frequencies() {
        let start = date(2024, 1, 15);
        assert_eq!(next(start, RecurrenceRule::weekly()), date(2024, 1, 22));
        assert_eq!(next(start, RecurrenceRule::monthly()), date(2024, 2, 15));
        assert_eq!(next(start, RecurrenceRule::quarterly()), date(2024, 4, 15));
        assert_eq!(next(start, RecurrenceRule::yearly()), date(2025, 1, 15));
    }

    #[test]
    fn custom_periods() {
        let start = date(2024, 1, 15);
        assert_eq!(next(start, RecurrenceRule::custom(10, "days")), date(2024, 1, 25));
        assert_eq!(next(start, RecurrenceRule::custom(2, "WEEKS")), date(2024, 1, 29));
        assert_eq!(next(start, RecurrenceRule::custom(6, "Months")), date(2024, 7, 15));
        assert_eq!(next(start, RecurrenceRule::custom(2, "years")), date(2026, 1, 15));
    }

    #[test]
    fn unrecognized_custom_period_steps_months() {
        let rule = RecurrenceRule::custom(2, "fortnights");
        assert_eq!(next(date(2024, 1, 15), rule), date(2024, 3, 15));
    }

    #[test]
    fn unrecognized_type_is_monthly() {
        let rule = RecurrenceRule::new("biweekly");
        assert_eq!(next(date(2024, 3, 10), rule), date(2024, 4, 10));
    }

    #[test]
    fn month_end_clamps() {
        assert_eq!(
            next(date(2024, 1, 31), RecurrenceRule::custom(1, "months")),
            date(2024, 2, 29)
        );
        assert_eq!(next(date(2023, 1, 31), RecurrenceRule::monthly()), date(2023, 2, 28));
        assert_eq!(next(date(2024, 2, 29), RecurrenceRule::yearly()), date(2025, 2, 28));
    }

    #[test]
    fn overflow_saturates() {
        assert_eq!(next(NaiveDate::MAX, RecurrenceRule::weekly()), NaiveDate::MAX);
        assert_eq!(checked_next_billing_date(NaiveDate::MAX, &RecurrenceRule::weekly()), None);
    }

    #[test]
    fn schedule_stops_at_end_of_calendar() {
        let start = NaiveDate::MAX.checked_sub_days(Days::new(10)).unwrap();
        let dates = calculate_future_billing_dates(
            start,
            &RecurrenceRule::weekly(),
            Occurrences::Unlimited,
            DEFAULT_MAX_DATES,
        );
        assert_eq!(dates, vec![start, start + Days::new(7)]);
    }

    #[test]
    fn future_dates_include_start() {
        let dates = calculate_future_billing_dates(
            date(2024, 1, 1),
            &RecurrenceRule::monthly(),
            Occurrences::Limited(3),
            DEFAULT_MAX_DATES,
        );
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn zero_occurrences_or_cap_gives_nothing() {
        let rule = RecurrenceRule::monthly();
        let dates = |occurrences, max_dates| {
            calculate_future_billing_dates(date(2024, 1, 1), &rule, occurrences, max_dates)
        };
        assert!(dates(Occurrences::Limited(0), 12).is_empty());
        assert!(dates(Occurrences::Unlimited, 0).is_empty());
    }

    #[test]
    fn active_until_occurrences_exhausted() {
        let today = date(2024, 6, 1);
        assert!(is_recurring_active_on(Occurrences::Limited(3), 2, None, today));
        assert!(!is_recurring_active_on(Occurrences::Limited(3), 3, None, today));
        assert!(is_recurring_active_on(Occurrences::Unlimited, 1000, None, today));
    }

    #[test]
    fn inactive_from_the_start_of_the_end_date() {
        let end = Some(date(2024, 6, 1));
        assert!(is_recurring_active_on(Occurrences::Unlimited, 0, end, date(2024, 5, 31)));
        assert!(!is_recurring_active_on(Occurrences::Unlimited, 0, end, date(2024, 6, 1)));
        assert!(!is_recurring_active_on(Occurrences::Unlimited, 0, end, date(2024, 6, 2)));
    }

    #[test]
    fn occurrence_limit_checked_before_end_date() {
        let end = Some(date(2099, 1, 1));
        assert!(!is_recurring_active_on(Occurrences::Limited(1), 1, end, date(2024, 1, 1)));
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_billing_date("2024-01-15").unwrap(), date(2024, 1, 15));
        assert_eq!(parse_billing_date(" 2024-01-15T10:30:00Z ").unwrap(), date(2024, 1, 15));
        assert!(matches!(parse_billing_date("15/01/2024"), Err(CalcError::InvalidDate(_))));
    }
}
