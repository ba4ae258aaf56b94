//! # invoice-calc
//!
//! Billing arithmetic for CRM/finance frontends: invoice and quote totals,
//! document-level tax composition, recurring billing schedules, currency
//! formatting, and CSV import/export of line items.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every calculation is a pure function of its borrowed inputs.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoice_calc::core::*;
//! use rust_decimal_macros::dec;
//!
//! let totals = TotalsBuilder::new()
//!     .add_line(LineItemBuilder::new(dec!(2), dec!(50)).build())
//!     .add_line(LineItemBuilder::new(dec!(1), dec!(100)).build())
//!     .percentage_discount(dec!(10))
//!     .document_tax("VAT", dec!(20))
//!     .calculate();
//!
//! assert_eq!(totals.subtotal, dec!(200.00));
//! assert_eq!(totals.subtotal_after_discount, dec!(180.00));
//! assert_eq!(totals.document_tax, dec!(36.00));
//! assert_eq!(totals.total, dec!(216.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Line-item aggregation, document taxes, currency formatting |
//! | `recurring` (default) | Recurrence rules, billing dates, schedule labels |
//! | `csv` | CSV import/export of line items and totals |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "recurring")]
pub mod recurring;

#[cfg(feature = "csv")]
pub mod csv;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
