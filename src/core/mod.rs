//! Core billing arithmetic: line items, discounts, taxes and totals.
//!
//! The aggregator reduces line items to a subtotal and item-level taxes,
//! the composer layers discount and document-level taxes on top and
//! produces an [`InvoiceTotals`] breakdown.

mod aggregate;
mod builder;
mod compose;
pub mod currencies;
mod error;
pub mod numeric;
mod types;

pub use aggregate::*;
pub use builder::*;
pub use compose::*;
pub use currencies::{convert_amount, format_currency, is_known_currency_code};
pub use error::*;
pub use numeric::{parse_numeric_or_zero, round_money};
pub use types::*;
