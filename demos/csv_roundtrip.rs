use invoice_calc::core::*;
use invoice_calc::csv::*;
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

const INPUT: &str = "\
description,quantity,price,tax_rate
Design,12,95,20
Review,3 hrs,110,20
Licence,1,abc,0
";

fn main() -> Result<(), CalcError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let items = import_line_items_csv(INPUT)?;
    let totals = TotalsBuilder::new()
        .lines(items.clone())
        .legacy_tax_rate(dec!(20))
        .fixed_discount(dec!(50))
        .calculate();

    print!("{}", export_line_items_csv(&items)?);
    println!();
    print!("{}", export_totals_csv(&totals)?);
    Ok(())
}
