use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::aggregate::{calculate_item_level_taxes, calculate_subtotal, get_tax_breakdown};
use super::numeric::round_money;
use super::types::*;

/// Calculate the full totals breakdown of an invoice or quote.
///
/// Order of operations:
/// 1. subtotal and item-level taxes from the line items;
/// 2. discount, only when `discount_value > 0`: a percentage of the subtotal
///    or a fixed amount depending on `discount_type`;
/// 3. discounted subtotal, clamped at zero;
/// 4. document taxes on the discounted subtotal, each rounded to 2 places
///    before they are summed;
/// 5. `tax = item-level + document`, `total = discounted subtotal + tax`.
///
/// Never fails: an absent or empty tax configuration means no document tax.
pub fn calculate_invoice_total(
    line_items: &[LineItem],
    document_taxes: &DocumentTaxInput,
    discount_type: DiscountType,
    discount_value: Decimal,
) -> InvoiceTotals {
    let subtotal = calculate_subtotal(line_items);
    let item_level_tax = calculate_item_level_taxes(line_items);

    let discount = if discount_value > Decimal::ZERO {
        match discount_type {
            DiscountType::Percentage => subtotal.saturating_mul(discount_value) / dec!(100),
            DiscountType::Fixed => discount_value,
        }
    } else {
        Decimal::ZERO
    };

    let subtotal_after_discount = subtotal.saturating_sub(discount).max(Decimal::ZERO);

    if matches!(document_taxes, DocumentTaxInput::LegacyRate(_)) {
        tracing::debug!("applying legacy single-rate document tax");
    }
    let document_tax_breakdown = compose_document_taxes(subtotal_after_discount, document_taxes);
    // Sum of rounded entries, so the breakdown always adds up to the total.
    let document_tax: Decimal = document_tax_breakdown
        .iter()
        .fold(Decimal::ZERO, |acc, entry| acc.saturating_add(entry.tax_amount));

    let tax = item_level_tax.saturating_add(document_tax);
    let total = subtotal_after_discount.saturating_add(tax);

    let totals = InvoiceTotals {
        subtotal: round_money(subtotal),
        discount: round_money(discount),
        subtotal_after_discount: round_money(subtotal_after_discount),
        item_level_tax: round_money(item_level_tax),
        document_tax: round_money(document_tax),
        document_tax_breakdown,
        tax: round_money(tax),
        tax_breakdown: get_tax_breakdown(line_items),
        total: round_money(total),
    };

    tracing::trace!(
        subtotal = %totals.subtotal,
        discount = %totals.discount,
        tax = %totals.tax,
        total = %totals.total,
        "calculated invoice totals"
    );

    totals
}

/// Apply document-level taxes to a (discounted) taxable base.
///
/// Each entry is `base × rate / 100` rounded to 2 places.
pub fn compose_document_taxes(
    taxable_base: Decimal,
    document_taxes: &DocumentTaxInput,
) -> Vec<DocumentTaxBreakdownEntry> {
    document_taxes
        .to_taxes()
        .into_iter()
        .map(|tax| DocumentTaxBreakdownEntry {
            tax_amount: round_money(taxable_base.saturating_mul(tax.tax_rate) / dec!(100)),
            tax_name: tax.tax_name,
            tax_rate: tax.tax_rate,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<LineItem> {
        vec![
            LineItem {
                quantity: dec!(2),
                price: dec!(50),
                ..Default::default()
            },
            LineItem {
                quantity: dec!(1),
                price: dec!(100),
                ..Default::default()
            },
        ]
    }

    #[test]
    fn no_discount_no_tax() {
        let totals = calculate_invoice_total(
            &items(),
            &DocumentTaxInput::None,
            DiscountType::Percentage,
            Decimal::ZERO,
        );
        assert_eq!(totals.subtotal, dec!(200));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.subtotal_after_discount, dec!(200));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.total, dec!(200));
        assert!(totals.document_tax_breakdown.is_empty());
        assert!(totals.tax_breakdown.is_empty());
    }

    #[test]
    fn percentage_discount_then_document_tax() {
        let taxes = DocumentTaxInput::from(vec![DocumentTax::new("VAT", dec!(20))]);
        let totals = calculate_invoice_total(&items(), &taxes, DiscountType::Percentage, dec!(10));
        assert_eq!(totals.discount, dec!(20));
        assert_eq!(totals.subtotal_after_discount, dec!(180));
        assert_eq!(totals.document_tax, dec!(36));
        assert_eq!(totals.total, dec!(216));
    }

    #[test]
    fn fixed_discount() {
        let taxes = DocumentTaxInput::None;
        let totals = calculate_invoice_total(&items(), &taxes, DiscountType::Fixed, dec!(35.5));
        assert_eq!(totals.discount, dec!(35.50));
        assert_eq!(totals.subtotal_after_discount, dec!(164.50));
    }

    #[test]
    fn negative_discount_is_ignored() {
        let taxes = DocumentTaxInput::None;
        let totals = calculate_invoice_total(&items(), &taxes, DiscountType::Fixed, dec!(-50));
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, dec!(200));
    }

    #[test]
    fn oversized_discount_clamps_at_zero() {
        let taxes = DocumentTaxInput::LegacyRate(dec!(19));
        let totals = calculate_invoice_total(&items(), &taxes, DiscountType::Fixed, dec!(500));
        assert_eq!(totals.discount, dec!(500));
        assert_eq!(totals.subtotal_after_discount, Decimal::ZERO);
        assert_eq!(totals.document_tax, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn legacy_rate_becomes_single_tax_entry() {
        let taxes = DocumentTaxInput::LegacyRate(dec!(15));
        let breakdown = compose_document_taxes(dec!(100), &taxes);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].tax_name, LEGACY_TAX_NAME);
        assert_eq!(breakdown[0].tax_amount, dec!(15));
    }

    #[test]
    fn non_positive_legacy_rate_means_no_tax() {
        for taxes in [
            DocumentTaxInput::LegacyRate(Decimal::ZERO),
            DocumentTaxInput::LegacyRate(dec!(-5)),
            DocumentTaxInput::Taxes(vec![]),
        ] {
            assert!(compose_document_taxes(dec!(100), &taxes).is_empty(), "{taxes:?}");
        }
    }

    #[test]
    fn document_tax_is_sum_of_rounded_entries() {
        // 10.05 * 5% = 0.5025 -> 0.50 each; rounding the unrounded sum would give 1.01
        let line = vec![LineItem {
            quantity: dec!(1),
            price: dec!(10.05),
            ..Default::default()
        }];
        let taxes = DocumentTaxInput::Taxes(vec![
            DocumentTax::new("A", dec!(5)),
            DocumentTax::new("B", dec!(5)),
        ]);
        let totals =
            calculate_invoice_total(&line, &taxes, DiscountType::Percentage, Decimal::ZERO);
        assert_eq!(totals.document_tax_breakdown[0].tax_amount, dec!(0.50));
        assert_eq!(totals.document_tax_breakdown[1].tax_amount, dec!(0.50));
        assert_eq!(totals.document_tax, dec!(1.00));
        assert_eq!(totals.total, dec!(11.05));
    }
}
