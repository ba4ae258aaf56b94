//! CSV import/export of line items and invoice totals.
//!
//! Export writes comma-separated, `\n`-terminated UTF-8 with a header row.
//! Import is header-driven and follows the permissive numeric policy:
//! unparseable cells become zero rather than failing the whole file.

mod export;
mod import;

pub use export::*;
pub use import::*;
