use chrono::NaiveDate;

use super::rule::*;

/// Human-readable frequency label ("Monthly", "Every 2 weeks").
///
/// An unrecognized recurrence type is echoed unchanged, unlike the date
/// calculators which treat it as monthly.
pub fn get_recurring_frequency_label(rule: &RecurrenceRule) -> String {
    match &rule.recurring_type {
        RecurringType::Weekly => "Weekly".to_string(),
        RecurringType::Monthly => "Monthly".to_string(),
        RecurringType::Quarterly => "Quarterly".to_string(),
        RecurringType::Yearly => "Yearly".to_string(),
        RecurringType::Custom => {
            let every = rule.every();
            let period = rule.period();
            if every == 1 {
                format!("Every {}", period.singular())
            } else {
                format!("Every {every} {}", period.as_str())
            }
        }
        RecurringType::Other(raw) => raw.clone(),
    }
}

/// One-line description of a whole schedule.
///
/// ```
/// use chrono::NaiveDate;
/// use invoice_calc::recurring::*;
///
/// let rule = RecurrenceRule::monthly();
/// let limited = format_recurring_schedule(&rule, Occurrences::Limited(12), None);
/// assert_eq!(limited, "Monthly, 12 times");
///
/// let end = NaiveDate::from_ymd_opt(2024, 12, 31);
/// let until = format_recurring_schedule(&rule, Occurrences::Unlimited, end);
/// assert_eq!(until, "Monthly until Dec 31, 2024");
/// ```
pub fn format_recurring_schedule(
    rule: &RecurrenceRule,
    occurrences: Occurrences,
    end_date: Option<NaiveDate>,
) -> String {
    let label = get_recurring_frequency_label(rule);
    match (occurrences, end_date) {
        (Occurrences::Limited(1), _) => format!("{label}, once"),
        (Occurrences::Limited(n), _) => format!("{label}, {n} times"),
        (Occurrences::Unlimited, Some(end)) => {
            format!("{label} until {}", end.format("%b %-d, %Y"))
        }
        (Occurrences::Unlimited, None) => format!("{label}, no end date"),
    }
}

/// Approximate length of one billing interval in days.
///
/// A month counts as 30 days, a quarter as 90 and a year as 365. Only meant
/// for sorting and estimates; billing dates themselves use calendar math.
/// Unrecognized types and custom periods count as months.
pub fn get_recurring_interval_days(rule: &RecurrenceRule) -> u32 {
    match &rule.recurring_type {
        RecurringType::Weekly => 7,
        RecurringType::Monthly => 30,
        RecurringType::Quarterly => 90,
        RecurringType::Yearly => 365,
        RecurringType::Custom => {
            let unit = match rule.period() {
                CustomPeriod::Days => 1,
                CustomPeriod::Weeks => 7,
                CustomPeriod::Months | CustomPeriod::Other(_) => 30,
                CustomPeriod::Years => 365,
            };
            rule.every().saturating_mul(unit)
        }
        RecurringType::Other(_) => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(rule: RecurrenceRule) -> String {
        get_recurring_frequency_label(&rule)
    }

    #[test]
    fn fixed_labels() {
        assert_eq!(label(RecurrenceRule::weekly()), "Weekly");
        assert_eq!(label(RecurrenceRule::new("QUARTERLY")), "Quarterly");
    }

    #[test]
    fn custom_labels() {
        assert_eq!(label(RecurrenceRule::custom(1, "weeks")), "Every week");
        assert_eq!(label(RecurrenceRule::custom(3, "Months")), "Every 3 months");
        assert_eq!(label(RecurrenceRule::new("custom")), "Every month");
    }

    #[test]
    fn unrecognized_type_label_is_echoed() {
        assert_eq!(label(RecurrenceRule::new("Bi-Weekly")), "Bi-Weekly");
    }

    #[test]
    fn schedule_descriptions() {
        let rule = RecurrenceRule::weekly();
        let describe = |occurrences, end| format_recurring_schedule(&rule, occurrences, end);
        assert_eq!(describe(Occurrences::Limited(1), None), "Weekly, once");
        assert_eq!(describe(Occurrences::Unlimited, None), "Weekly, no end date");
        assert_eq!(
            describe(Occurrences::Unlimited, NaiveDate::from_ymd_opt(2025, 3, 5)),
            "Weekly until Mar 5, 2025"
        );
    }

    #[test]
    fn interval_days() {
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::weekly()), 7);
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::quarterly()), 90);
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::custom(2, "weeks")), 14);
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::custom(2, "years")), 730);
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::custom(5, "hours")), 150);
        assert_eq!(get_recurring_interval_days(&RecurrenceRule::new("daily")), 30);
    }
}
