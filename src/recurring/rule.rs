use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::numeric::{lenient_decimal, lenient_string};

/// How often a recurring invoice repeats.
///
/// Parsing is case-insensitive and total: anything unrecognized is kept
/// verbatim in [`RecurringType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecurringType {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    /// Every `custom_every` units of `custom_period`.
    Custom,
    /// Unrecognized type, kept as written.
    Other(String),
}

impl RecurringType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "yearly" => Self::Yearly,
            "custom" => Self::Custom,
            _ => Self::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Custom => "custom",
            Self::Other(raw) => raw,
        }
    }
}

/// A missing type is an unrecognized (empty) one.
impl Default for RecurringType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<&str> for RecurringType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for RecurringType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit of a custom recurrence interval.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CustomPeriod {
    Days,
    Weeks,
    #[default]
    Months,
    Years,
    /// Unrecognized unit, kept as written. Date math treats it as months.
    Other(String),
}

impl CustomPeriod {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "days" => Self::Days,
            "weeks" => Self::Weeks,
            "months" => Self::Months,
            "years" => Self::Years,
            _ => Self::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
            Self::Other(raw) => raw,
        }
    }

    /// Singular unit name for known periods ("day", "week", ...).
    pub(crate) fn singular(&self) -> &str {
        match self {
            Self::Days => "day",
            Self::Weeks => "week",
            Self::Months => "month",
            Self::Years => "year",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for CustomPeriod {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for CustomPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = lenient_string(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

string_serde!(RecurringType);
string_serde!(CustomPeriod);

/// A recurrence rule: the type plus the custom interval, if any.
///
/// `custom_every` and `custom_period` only matter for
/// [`RecurringType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    #[serde(rename = "type", default)]
    pub recurring_type: RecurringType,
    #[serde(default, deserialize_with = "lenient_count")]
    pub custom_every: Option<i64>,
    #[serde(default)]
    pub custom_period: Option<CustomPeriod>,
}

impl RecurrenceRule {
    pub fn new(recurring_type: impl Into<RecurringType>) -> Self {
        Self {
            recurring_type: recurring_type.into(),
            custom_every: None,
            custom_period: None,
        }
    }

    pub fn weekly() -> Self {
        Self::new(RecurringType::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(RecurringType::Monthly)
    }

    pub fn quarterly() -> Self {
        Self::new(RecurringType::Quarterly)
    }

    pub fn yearly() -> Self {
        Self::new(RecurringType::Yearly)
    }

    /// Every `every` units of `period`.
    pub fn custom(every: i64, period: impl Into<CustomPeriod>) -> Self {
        Self {
            recurring_type: RecurringType::Custom,
            custom_every: Some(every),
            custom_period: Some(period.into()),
        }
    }

    /// Interval multiplier; missing, zero or negative counts as 1.
    pub fn every(&self) -> u32 {
        match self.custom_every {
            Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// Interval unit; missing counts as months.
    pub fn period(&self) -> CustomPeriod {
        self.custom_period.clone().unwrap_or_default()
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(lenient_decimal(deserializer)?.trunc().to_i64())
}

/// How many times a recurring invoice is issued.
///
/// On the wire this is the raw integer, with `-1` meaning unlimited. Other
/// negative values count as zero occurrences. Reading is permissive:
/// numeric strings and fractions are truncated, anything else is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "i64")]
pub enum Occurrences {
    Unlimited,
    Limited(u32),
}

/// Raw sentinel for [`Occurrences::Unlimited`].
pub const UNLIMITED_OCCURRENCES: i64 = -1;

impl Occurrences {
    pub fn from_raw(raw: i64) -> Self {
        if raw == UNLIMITED_OCCURRENCES {
            Self::Unlimited
        } else {
            Self::Limited(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            Self::Unlimited => UNLIMITED_OCCURRENCES,
            Self::Limited(n) => i64::from(n),
        }
    }
}

impl From<i64> for Occurrences {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl<'de> Deserialize<'de> for Occurrences {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient_decimal(deserializer)?.trunc().to_i64().unwrap_or(0);
        Ok(Self::from_raw(raw))
    }
}

impl From<Occurrences> for i64 {
    fn from(occurrences: Occurrences) -> Self {
        occurrences.to_raw()
    }
}
