//! ISO 4217 currency lookup and display formatting.
//!
//! Formatting follows the en-US conventions the dashboard widgets display:
//! symbol prefix, comma digit grouping, period decimal separator, and the
//! currency's minor units (`$1,234.56`, `¥1,235`, `CHF 99.90`).

use rust_decimal::{Decimal, RoundingStrategy};

use super::numeric::round_money;

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    lookup(code).is_some()
}

/// Display symbol for `code`, if it has one other than the code itself.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    lookup(code).and_then(|c| c.symbol)
}

/// Number of minor-unit digits for `code` (2 for unknown codes).
pub fn minor_units(code: &str) -> u32 {
    lookup(code).map_or(2, |c| c.minor_units)
}

/// Format `amount` for display in the given currency.
///
/// The code is matched case-insensitively. Unknown codes are shown as the
/// code followed by a space, with 2 decimal places.
///
/// ```
/// use invoice_calc::core::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.5), "USD"), "$1,234.50");
/// assert_eq!(format_currency(dec!(-10), "eur"), "-€10.00");
/// assert_eq!(format_currency(dec!(1234.5), "JPY"), "¥1,235");
/// ```
pub fn format_currency(amount: Decimal, code: &str) -> String {
    let code = code.trim().to_ascii_uppercase();
    let digits = minor_units(&code);

    let mut value = amount
        .round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
        .abs();
    value.rescale(digits);
    let negative = amount.is_sign_negative() && !value.is_zero();

    let text = value.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + code.len() + 4);
    if negative {
        out.push('-');
    }
    match currency_symbol(&code) {
        Some(symbol) => out.push_str(symbol),
        None => {
            out.push_str(&code);
            out.push(' ');
        }
    }
    push_grouped(&mut out, int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Convert an amount with an exchange rate, rounded to 2 places.
///
/// A zero or negative rate is treated as missing and gives zero.
pub fn convert_amount(amount: Decimal, rate: Decimal) -> Decimal {
    if rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_money(amount.saturating_mul(rate))
}

fn push_grouped(out: &mut String, digits: &str) {
    let len = digits.len();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
}

struct Currency {
    code: &'static str,
    symbol: Option<&'static str>,
    minor_units: u32,
}

fn lookup(code: &str) -> Option<&'static Currency> {
    let code = code.trim().to_ascii_uppercase();
    CURRENCIES
        .binary_search_by(|c| c.code.cmp(code.as_str()))
        .ok()
        .map(|idx| &CURRENCIES[idx])
}

const fn cur(code: &'static str, symbol: Option<&'static str>, minor_units: u32) -> Currency {
    Currency {
        code,
        symbol,
        minor_units,
    }
}

/// Sorted by code for binary search.
static CURRENCIES: &[Currency] = &[
    cur("AED", None, 2),           // UAE Dirham
    cur("AUD", Some("A$"), 2),     // Australian Dollar
    cur("BGN", None, 2),           // Bulgarian Lev
    cur("BRL", Some("R$"), 2),     // Brazilian Real
    cur("CAD", Some("CA$"), 2),    // Canadian Dollar
    cur("CHF", None, 2),           // Swiss Franc
    cur("CNY", Some("CN¥"), 2),    // Chinese Yuan
    cur("CZK", None, 2),           // Czech Koruna
    cur("DKK", None, 2),           // Danish Krone
    cur("EGP", None, 2),           // Egyptian Pound
    cur("EUR", Some("€"), 2),      // Euro
    cur("GBP", Some("£"), 2),      // Pound Sterling
    cur("HKD", Some("HK$"), 2),    // Hong Kong Dollar
    cur("HUF", None, 2),           // Hungarian Forint
    cur("IDR", None, 2),           // Indonesian Rupiah
    cur("ILS", Some("₪"), 2),      // Israeli Shekel
    cur("INR", Some("₹"), 2),      // Indian Rupee
    cur("ISK", None, 0),           // Icelandic Krona
    cur("JPY", Some("¥"), 0),      // Japanese Yen
    cur("KES", None, 2),           // Kenyan Shilling
    cur("KRW", Some("₩"), 0),      // South Korean Won
    cur("MXN", Some("MX$"), 2),    // Mexican Peso
    cur("MYR", None, 2),           // Malaysian Ringgit
    cur("NGN", None, 2),           // Nigerian Naira
    cur("NOK", None, 2),           // Norwegian Krone
    cur("NZD", Some("NZ$"), 2),    // New Zealand Dollar
    cur("PHP", Some("₱"), 2),      // Philippine Peso
    cur("PKR", None, 2),           // Pakistani Rupee
    cur("PLN", None, 2),           // Polish Zloty
    cur("RON", None, 2),           // Romanian Leu
    cur("SAR", None, 2),           // Saudi Riyal
    cur("SEK", None, 2),           // Swedish Krona
    cur("SGD", None, 2),           // Singapore Dollar
    cur("THB", None, 2),           // Thai Baht
    cur("TRY", None, 2),           // Turkish Lira
    cur("TWD", Some("NT$"), 2),    // New Taiwan Dollar
    cur("UAH", None, 2),           // Ukrainian Hryvnia
    cur("USD", Some("$"), 2),      // US Dollar
    cur("VND", Some("₫"), 0),      // Vietnamese Dong
    cur("ZAR", None, 2),           // South African Rand
];
