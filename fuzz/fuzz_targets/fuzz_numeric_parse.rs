#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let value = invoice_calc::core::parse_numeric_or_zero(s);
        let _ = invoice_calc::core::round_money(value);
    }
});
