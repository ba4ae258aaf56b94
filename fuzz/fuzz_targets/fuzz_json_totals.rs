#![no_main]

use invoice_calc::core::{DiscountType, DocumentTaxInput, LineItem, calculate_invoice_total};
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    // Whatever the numbers look like, totals must be computed without panicking.
    if let Ok(items) = serde_json::from_slice::<Vec<LineItem>>(data) {
        let taxes = DocumentTaxInput::LegacyRate(Decimal::TEN);
        let totals =
            calculate_invoice_total(&items, &taxes, DiscountType::Percentage, Decimal::TEN);
        assert!(totals.subtotal_after_discount >= Decimal::ZERO);
    }
});
