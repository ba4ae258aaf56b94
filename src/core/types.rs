use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::numeric::{
    collect_valid, decimal_or_zero, lenient_decimal, lenient_opt_string, lenient_string,
    lenient_vec,
};

/// Name given to the single tax of the legacy numeric document-tax form.
pub const LEGACY_TAX_NAME: &str = "Tax";

/// One billable row of an invoice or quote.
///
/// A row carries either a legacy single `tax_rate` or a list of named
/// per-item `taxes`; both forms are accepted. Numeric fields deserialize
/// permissively: invalid or missing values become zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Free-text description (display only).
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    /// Unit price.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: Decimal,
    /// Legacy single tax rate in percent (zero when unused).
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tax_rate: Decimal,
    /// Named per-item taxes with caller-computed amounts.
    #[serde(default, deserialize_with = "lenient_vec")]
    pub taxes: Vec<ItemTax>,
}

impl LineItem {
    /// quantity × price, unrounded.
    pub fn amount(&self) -> Decimal {
        self.quantity.saturating_mul(self.price)
    }
}

/// A named tax attached to a single line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemTax {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tax_name: String,
    /// Rate in percent.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tax_rate: Decimal,
    /// Tax amount for this item, computed by the caller.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tax_amount: Decimal,
}

/// A tax applied at document level, on the discounted subtotal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTax {
    #[serde(default, deserialize_with = "lenient_string")]
    pub tax_name: String,
    /// Rate in percent.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tax_rate: Decimal,
}

impl DocumentTax {
    pub fn new(tax_name: impl Into<String>, tax_rate: Decimal) -> Self {
        Self {
            tax_name: tax_name.into(),
            tax_rate,
        }
    }
}

/// The document-level tax configuration of an invoice.
///
/// Older callers pass a single bare percentage instead of a list; that form
/// is kept as the explicit [`DocumentTaxInput::LegacyRate`] variant and is
/// treated as one tax named [`LEGACY_TAX_NAME`].
///
/// Deserializes from a JSON array (malformed entries are skipped), a JSON
/// number, or `null`. Any other shape, including a numeric string, means no
/// document tax.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocumentTaxInput {
    /// No document-level tax.
    #[default]
    None,
    /// Named document taxes.
    Taxes(Vec<DocumentTax>),
    /// Legacy single unnamed rate in percent.
    LegacyRate(Decimal),
}

impl DocumentTaxInput {
    /// Normalize to a list of document taxes.
    ///
    /// A legacy rate becomes a single [`LEGACY_TAX_NAME`] entry when it is
    /// positive; zero or negative legacy rates and `None` give an empty list.
    pub fn to_taxes(&self) -> Vec<DocumentTax> {
        match self {
            Self::Taxes(taxes) => taxes.clone(),
            Self::LegacyRate(rate) if *rate > Decimal::ZERO => {
                vec![DocumentTax::new(LEGACY_TAX_NAME, *rate)]
            }
            Self::LegacyRate(_) | Self::None => Vec::new(),
        }
    }
}

impl Serialize for DocumentTaxInput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_none(),
            Self::Taxes(taxes) => taxes.serialize(serializer),
            // Must stay a JSON number to be read back as a legacy rate.
            Self::LegacyRate(rate) => serializer.serialize_f64(rate.to_f64().unwrap_or_default()),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentTaxInput {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentTaxInputVisitor)
    }
}

struct DocumentTaxInputVisitor;

impl<'de> Visitor<'de> for DocumentTaxInputVisitor {
    type Value = DocumentTaxInput;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of document taxes, a number or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::LegacyRate(Decimal::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::LegacyRate(Decimal::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::LegacyRate(decimal_or_zero(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        Ok(DocumentTaxInput::Taxes(collect_valid(seq)?))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::None)
    }

    fn visit_str<E: de::Error>(self, _v: &str) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DocumentTaxInput::None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        DocumentTaxInput::deserialize(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(DocumentTaxInput::None)
    }
}

impl From<Vec<DocumentTax>> for DocumentTaxInput {
    fn from(taxes: Vec<DocumentTax>) -> Self {
        Self::Taxes(taxes)
    }
}

impl From<Decimal> for DocumentTaxInput {
    fn from(rate: Decimal) -> Self {
        Self::LegacyRate(rate)
    }
}

impl From<Option<Vec<DocumentTax>>> for DocumentTaxInput {
    fn from(taxes: Option<Vec<DocumentTax>>) -> Self {
        taxes.map_or(Self::None, Self::Taxes)
    }
}

/// How the discount value of an invoice is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DiscountType {
    /// Discount value is a percentage of the subtotal.
    #[default]
    Percentage,
    /// Discount value is a fixed amount.
    Fixed,
}

impl DiscountType {
    /// Parse a discount type; `"percentage"` (any case) is a percentage,
    /// every other value is a fixed amount.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("percentage") {
            Self::Percentage
        } else {
            Self::Fixed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::Fixed => "fixed",
        }
    }
}

impl From<String> for DiscountType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DiscountType> for String {
    fn from(value: DiscountType) -> Self {
        value.as_str().to_string()
    }
}

/// Item-level tax total for one distinct (name, rate) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBreakdownEntry {
    pub tax_name: String,
    pub tax_rate: Decimal,
    /// Summed amount, rounded to 2 places.
    pub tax_amount: Decimal,
}

/// Amount of one document-level tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTaxBreakdownEntry {
    pub tax_name: String,
    pub tax_rate: Decimal,
    /// Discounted subtotal × rate / 100, rounded to 2 places.
    pub tax_amount: Decimal,
}

/// Totals of an invoice or quote.
///
/// Synthesized on every call and never stored by the engine. Every amount
/// is rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    /// Sum of quantity × price over all lines.
    pub subtotal: Decimal,
    /// Discount amount actually applied.
    pub discount: Decimal,
    /// Subtotal minus discount, never negative.
    pub subtotal_after_discount: Decimal,
    /// Sum of all per-item tax amounts.
    pub item_level_tax: Decimal,
    /// Sum of the (already rounded) document-level tax amounts.
    pub document_tax: Decimal,
    pub document_tax_breakdown: Vec<DocumentTaxBreakdownEntry>,
    /// `item_level_tax + document_tax`.
    pub tax: Decimal,
    /// Item-level taxes grouped by name and rate.
    pub tax_breakdown: Vec<TaxBreakdownEntry>,
    /// `subtotal_after_discount + tax`.
    pub total: Decimal,
}
