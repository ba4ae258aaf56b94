#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Import → totals → export must not panic at any step.
        if let Ok(items) = invoice_calc::csv::import_line_items_csv(s) {
            let totals = invoice_calc::core::TotalsBuilder::new()
                .lines(items.clone())
                .calculate();
            let _ = invoice_calc::csv::export_line_items_csv(&items);
            let _ = invoice_calc::csv::export_totals_csv(&totals);
        }
    }
});
