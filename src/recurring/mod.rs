//! Recurring billing schedules.
//!
//! A [`RecurrenceRule`] describes how often an invoice repeats. The schedule
//! functions turn a start date and a rule into billing dates using calendar
//! arithmetic (month-end dates clamp, e.g. Jan 31 + 1 month = Feb 29 in a
//! leap year). The format functions derive labels and coarse day intervals.
//!
//! Unrecognized recurrence types are handled asymmetrically, on purpose:
//! the date and interval calculators fall back to monthly behaviour, while
//! the label formatter echoes the raw type string.

mod format;
mod rule;
mod schedule;

pub use format::*;
pub use rule::*;
pub use schedule::*;
