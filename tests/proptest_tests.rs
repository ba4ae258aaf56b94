//! Property-based tests for totals and schedules.
//!
//! Run with: `cargo test --test proptest_tests`

use chrono::NaiveDate;
use invoice_calc::core::*;
use invoice_calc::recurring::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// Generate a reasonable amount (0.00 to 99999.99).
fn arb_money() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Generate a quantity (0 to 100, up to 2 decimals).
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0u32..=10_000u32).prop_map(|hundredths| Decimal::new(i64::from(hundredths), 2))
}

/// Generate a tax rate in percent (0 to 30, up to 2 decimals).
fn arb_rate() -> impl Strategy<Value = Decimal> {
    (0u32..=3_000u32).prop_map(|bp| Decimal::new(i64::from(bp), 2))
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    (
        arb_quantity(),
        arb_money(),
        prop::option::of(prop_oneof![Just("VAT"), Just("GST"), Just("Eco")]),
        arb_rate(),
    )
        .prop_map(|(qty, price, tax, rate)| {
            let builder = LineItemBuilder::new(qty, price);
            match tax {
                Some(name) => builder.tax(name, rate).build(),
                None => builder.build(),
            }
        })
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(arb_line(), 0..=8)
}

fn arb_document_taxes() -> impl Strategy<Value = DocumentTaxInput> {
    prop_oneof![
        Just(DocumentTaxInput::None),
        arb_rate().prop_map(DocumentTaxInput::LegacyRate),
        prop::collection::vec(arb_rate(), 0..=3).prop_map(|rates| {
            DocumentTaxInput::Taxes(
                rates
                    .into_iter()
                    .enumerate()
                    .map(|(i, rate)| DocumentTax::new(format!("T{i}"), rate))
                    .collect(),
            )
        }),
    ]
}

fn arb_discount() -> impl Strategy<Value = (DiscountType, Decimal)> {
    prop_oneof![
        arb_rate().prop_map(|pct| (DiscountType::Percentage, pct * Decimal::from(4))),
        arb_money().prop_map(|amount| (DiscountType::Fixed, amount)),
    ]
}

fn arb_rule() -> impl Strategy<Value = RecurrenceRule> {
    prop_oneof![
        Just(RecurrenceRule::weekly()),
        Just(RecurrenceRule::monthly()),
        Just(RecurrenceRule::quarterly()),
        Just(RecurrenceRule::yearly()),
        (1i64..=6, prop_oneof![Just("days"), Just("weeks"), Just("months"), Just("years")])
            .prop_map(|(every, period)| RecurrenceRule::custom(every, period)),
    ]
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2000i32..=2100, 1u32..=12, 1u32..=31)
        .prop_filter_map("valid date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
}

// ── Property Tests ──────────────────────────────────────────────────────────

proptest! {
    /// The subtotal is the sum of quantity × price, whatever the taxes.
    #[test]
    fn subtotal_is_additive(lines in arb_lines()) {
        let expected: Decimal = lines.iter().map(|l| l.quantity * l.price).sum();
        prop_assert_eq!(calculate_subtotal(&lines), expected);
    }

    /// The discounted subtotal is never negative.
    #[test]
    fn discounted_subtotal_is_non_negative(
        lines in arb_lines(),
        taxes in arb_document_taxes(),
        (discount_type, value) in arb_discount(),
    ) {
        let totals = calculate_invoice_total(&lines, &taxes, discount_type, value);
        prop_assert!(totals.subtotal_after_discount >= Decimal::ZERO);
        prop_assert!(totals.total >= Decimal::ZERO);
    }

    /// Document tax equals the sum of its (rounded) breakdown entries.
    #[test]
    fn document_tax_matches_breakdown(
        lines in arb_lines(),
        taxes in arb_document_taxes(),
        (discount_type, value) in arb_discount(),
    ) {
        let totals = calculate_invoice_total(&lines, &taxes, discount_type, value);
        let sum: Decimal = totals.document_tax_breakdown.iter().map(|e| e.tax_amount).sum();
        prop_assert_eq!(totals.document_tax, sum);
        prop_assert_eq!(totals.tax, totals.item_level_tax + totals.document_tax);
    }

    /// Every returned amount has at most 2 decimal places.
    #[test]
    fn amounts_are_rounded_to_cents(
        lines in arb_lines(),
        taxes in arb_document_taxes(),
        (discount_type, value) in arb_discount(),
    ) {
        let t = calculate_invoice_total(&lines, &taxes, discount_type, value);
        for amount in [t.subtotal, t.discount, t.subtotal_after_discount, t.item_level_tax,
                       t.document_tax, t.tax, t.total] {
            prop_assert_eq!(amount, amount.round_dp(2));
        }
        for entry in &t.tax_breakdown {
            prop_assert_eq!(entry.tax_amount, entry.tax_amount.round_dp(2));
        }
    }

    /// Identical inputs give identical outputs.
    #[test]
    fn totals_are_idempotent(
        lines in arb_lines(),
        taxes in arb_document_taxes(),
        (discount_type, value) in arb_discount(),
    ) {
        let first = calculate_invoice_total(&lines, &taxes, discount_type, value);
        let second = calculate_invoice_total(&lines.clone(), &taxes.clone(), discount_type, value);
        prop_assert_eq!(first, second);
    }

    /// The legacy bare rate behaves exactly like one tax named "Tax".
    #[test]
    fn legacy_rate_equals_named_tax(lines in arb_lines(), rate in arb_rate()) {
        prop_assume!(rate > Decimal::ZERO);
        let legacy = calculate_invoice_total(
            &lines, &DocumentTaxInput::LegacyRate(rate), DiscountType::Percentage, Decimal::ZERO);
        let named = calculate_invoice_total(
            &lines, &DocumentTaxInput::Taxes(vec![DocumentTax::new(LEGACY_TAX_NAME, rate)]),
            DiscountType::Percentage, Decimal::ZERO);
        prop_assert_eq!(legacy, named);
    }

    /// Schedules have the bounded length, start at the start date and increase.
    #[test]
    fn schedules_are_bounded_and_increasing(
        start in arb_date(),
        rule in arb_rule(),
        raw_occurrences in -1i64..=30,
        max_dates in 0usize..=24,
    ) {
        let occurrences = Occurrences::from_raw(raw_occurrences);
        let dates = calculate_future_billing_dates(start, &rule, occurrences, max_dates);

        let expected_len = match occurrences {
            Occurrences::Unlimited => max_dates,
            Occurrences::Limited(n) => (n as usize).min(max_dates),
        };
        prop_assert_eq!(dates.len(), expected_len);
        if let Some(first) = dates.first() {
            prop_assert_eq!(*first, start);
        }
        for pair in dates.windows(2) {
            prop_assert!(pair[1] > pair[0]);
            prop_assert_eq!(pair[1], calculate_next_billing_date(pair[0], &rule));
        }
    }

    /// The permissive parser never panics and gives zero for non-numeric text.
    #[test]
    fn parser_is_total(input in "\\PC*") {
        let value = parse_numeric_or_zero(&input);
        let trimmed = input.trim_start();
        let starts_numeric = trimmed
            .trim_start_matches(['+', '-'])
            .trim_start_matches('.')
            .starts_with(|c: char| c.is_ascii_digit());
        if !starts_numeric {
            prop_assert_eq!(value, Decimal::ZERO);
        }
    }
}
