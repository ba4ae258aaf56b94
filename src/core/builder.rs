use rust_decimal::Decimal;

use super::aggregate::compute_item_taxes;
use super::compose::calculate_invoice_total;
use super::types::*;

/// Builder for calculating invoice totals from form state.
///
/// ```
/// use invoice_calc::core::*;
/// use rust_decimal_macros::dec;
///
/// let totals = TotalsBuilder::new()
///     .add_line(LineItemBuilder::new(dec!(4), dec!(25)).tax("VAT", dec!(20)).build())
///     .fixed_discount(dec!(10))
///     .calculate();
///
/// assert_eq!(totals.subtotal_after_discount, dec!(90.00));
/// assert_eq!(totals.item_level_tax, dec!(20.00));
/// assert_eq!(totals.total, dec!(110.00));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TotalsBuilder {
    lines: Vec<LineItem>,
    document_taxes: DocumentTaxInput,
    discount_type: DiscountType,
    discount_value: Decimal,
}

impl TotalsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_line(mut self, line: LineItem) -> Self {
        self.lines.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = LineItem>) -> Self {
        self.lines.extend(lines);
        self
    }

    /// Append a named document-level tax.
    ///
    /// Replaces a previously set legacy rate.
    pub fn document_tax(mut self, name: impl Into<String>, rate: Decimal) -> Self {
        let tax = DocumentTax::new(name, rate);
        match &mut self.document_taxes {
            DocumentTaxInput::Taxes(taxes) => taxes.push(tax),
            other => *other = DocumentTaxInput::Taxes(vec![tax]),
        }
        self
    }

    pub fn document_taxes(mut self, taxes: impl Into<DocumentTaxInput>) -> Self {
        self.document_taxes = taxes.into();
        self
    }

    /// Use the legacy single-rate document tax form.
    pub fn legacy_tax_rate(mut self, rate: Decimal) -> Self {
        self.document_taxes = DocumentTaxInput::LegacyRate(rate);
        self
    }

    pub fn discount(mut self, discount_type: DiscountType, value: Decimal) -> Self {
        self.discount_type = discount_type;
        self.discount_value = value;
        self
    }

    pub fn percentage_discount(self, percent: Decimal) -> Self {
        self.discount(DiscountType::Percentage, percent)
    }

    pub fn fixed_discount(self, amount: Decimal) -> Self {
        self.discount(DiscountType::Fixed, amount)
    }

    /// Calculate the totals. The builder can be cloned to recalculate with
    /// different settings.
    pub fn calculate(&self) -> InvoiceTotals {
        calculate_invoice_total(
            &self.lines,
            &self.document_taxes,
            self.discount_type,
            self.discount_value,
        )
    }
}

/// Builder for LineItem.
///
/// Named taxes added with [`LineItemBuilder::tax`] get their amounts
/// computed from the line amount on [`LineItemBuilder::build`].
#[derive(Debug, Clone)]
pub struct LineItemBuilder {
    description: Option<String>,
    quantity: Decimal,
    price: Decimal,
    tax_rate: Decimal,
    taxes: Vec<ItemTax>,
}

impl LineItemBuilder {
    pub fn new(quantity: Decimal, price: Decimal) -> Self {
        Self {
            description: None,
            quantity,
            price,
            tax_rate: Decimal::ZERO,
            taxes: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add a named per-item tax.
    pub fn tax(mut self, name: impl Into<String>, rate: Decimal) -> Self {
        self.taxes.push(ItemTax {
            tax_name: name.into(),
            tax_rate: rate,
            tax_amount: Decimal::ZERO,
        });
        self
    }

    /// Set the legacy single tax rate.
    pub fn legacy_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn build(self) -> LineItem {
        let mut item = LineItem {
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            tax_rate: self.tax_rate,
            taxes: self.taxes,
        };
        if !item.taxes.is_empty() {
            item.taxes = compute_item_taxes(&item);
        }
        item
    }
}
