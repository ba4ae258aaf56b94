use invoice_calc::core::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A quote with item-level VAT, two sales taxes on the discounted subtotal
    // and a 10% discount.
    let totals = TotalsBuilder::new()
        .add_line(
            LineItemBuilder::new(dec!(10), dec!(12.50))
                .description("Consulting (hours)")
                .tax("VAT", dec!(20))
                .build(),
        )
        .add_line(
            LineItemBuilder::new(dec!(1), dec!(75))
                .description("Hosting (monthly)")
                .tax("VAT", dec!(20))
                .build(),
        )
        .document_tax("State", dec!(6))
        .document_tax("City", dec!(1.5))
        .percentage_discount(dec!(10))
        .calculate();

    let money = |amount| format_currency(amount, "USD");

    println!("Subtotal:        {}", money(totals.subtotal));
    println!("Discount:       -{}", money(totals.discount));
    println!("After discount:  {}", money(totals.subtotal_after_discount));
    println!("---");
    for entry in &totals.tax_breakdown {
        println!(
            "  {} {}%: {}",
            entry.tax_name,
            entry.tax_rate.normalize(),
            money(entry.tax_amount)
        );
    }
    for entry in &totals.document_tax_breakdown {
        println!(
            "  {} {}%: {}",
            entry.tax_name,
            entry.tax_rate.normalize(),
            money(entry.tax_amount)
        );
    }
    println!("---");
    println!("Tax:             {}", money(totals.tax));
    println!("Total:           {}", money(totals.total));
    println!(
        "Total (EUR):     {}",
        format_currency(convert_amount(totals.total, dec!(0.92)), "EUR")
    );
}
