use invoice_calc::recurring::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let start = match parse_billing_date("2024-01-31") {
        Ok(date) => date,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    let rules = [
        (RecurrenceRule::monthly(), Occurrences::Limited(6), None),
        (RecurrenceRule::custom(2, "weeks"), Occurrences::Unlimited, None),
        (
            RecurrenceRule::quarterly(),
            Occurrences::Unlimited,
            parse_billing_date("2024-12-31").ok(),
        ),
        (RecurrenceRule::new("Semi-Monthly"), Occurrences::Limited(3), None),
    ];

    for (rule, occurrences, end_date) in &rules {
        println!(
            "{} (~{} days): {}",
            get_recurring_frequency_label(rule),
            get_recurring_interval_days(rule),
            format_recurring_schedule(rule, *occurrences, *end_date)
        );
        let dates = calculate_future_billing_dates(start, rule, *occurrences, DEFAULT_MAX_DATES);
        for date in dates {
            println!("  {}", date.format("%Y-%m-%d"));
        }
        println!("  active: {}", is_recurring_active(*occurrences, 0, *end_date));
    }
}
