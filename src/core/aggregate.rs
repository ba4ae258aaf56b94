use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::numeric::round_money;
use super::types::*;

/// Sum of quantity × price over all line items.
///
/// Unparseable quantities or prices were already coerced to zero on input,
/// so such rows simply contribute nothing.
pub fn calculate_subtotal(line_items: &[LineItem]) -> Decimal {
    line_items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount()))
}

/// Sum of every caller-computed `tax_amount` in the items' `taxes` lists.
///
/// Items without named taxes contribute nothing; amounts are never
/// recomputed from rates here.
pub fn calculate_item_level_taxes(line_items: &[LineItem]) -> Decimal {
    line_items
        .iter()
        .flat_map(|item| item.taxes.iter())
        .fold(Decimal::ZERO, |acc, tax| acc.saturating_add(tax.tax_amount))
}

/// Group item-level taxes by (name, rate), in first-seen order.
///
/// Amounts are summed at full precision and rounded once per entry.
pub fn get_tax_breakdown(line_items: &[LineItem]) -> Vec<TaxBreakdownEntry> {
    let mut positions: HashMap<(&str, Decimal), usize> = HashMap::new();
    let mut breakdown: Vec<TaxBreakdownEntry> = Vec::new();

    for tax in line_items.iter().flat_map(|item| item.taxes.iter()) {
        let key = (tax.tax_name.as_str(), tax.tax_rate);
        match positions.get(&key) {
            Some(&idx) => {
                let entry = &mut breakdown[idx];
                entry.tax_amount = entry.tax_amount.saturating_add(tax.tax_amount);
            }
            None => {
                positions.insert(key, breakdown.len());
                breakdown.push(TaxBreakdownEntry {
                    tax_name: tax.tax_name.clone(),
                    tax_rate: tax.tax_rate,
                    tax_amount: tax.tax_amount,
                });
            }
        }
    }

    for entry in &mut breakdown {
        entry.tax_amount = round_money(entry.tax_amount);
    }
    breakdown
}

/// Discount amount for a subtotal.
///
/// A fixed `discount_amount`, when present, wins outright; otherwise the
/// percentage is applied to the subtotal. This lets a form keep both fields
/// filled while the user toggles between them.
pub fn calculate_discount_amount(
    subtotal: Decimal,
    discount_percentage: Option<Decimal>,
    discount_amount: Option<Decimal>,
) -> Decimal {
    if let Some(amount) = discount_amount {
        return amount;
    }
    discount_percentage
        .map(|pct| subtotal.saturating_mul(pct) / dec!(100))
        .unwrap_or(Decimal::ZERO)
}

/// Amount of a single line (quantity × price), unrounded.
pub fn calculate_line_amount(item: &LineItem) -> Decimal {
    item.amount()
}

/// Recompute the tax amounts of one line item from its rates.
///
/// Each named tax gets `amount × rate / 100`, rounded to 2 places. When the
/// item has no named taxes but a positive legacy `tax_rate`, a single entry
/// named [`LEGACY_TAX_NAME`] is produced. Forms use this to fill in the
/// `tax_amount` values the aggregator later sums.
pub fn compute_item_taxes(item: &LineItem) -> Vec<ItemTax> {
    let amount = item.amount();
    let tax_for = |rate: Decimal| round_money(amount.saturating_mul(rate) / dec!(100));

    if !item.taxes.is_empty() {
        return item
            .taxes
            .iter()
            .map(|tax| ItemTax {
                tax_name: tax.tax_name.clone(),
                tax_rate: tax.tax_rate,
                tax_amount: tax_for(tax.tax_rate),
            })
            .collect();
    }

    if item.tax_rate > Decimal::ZERO {
        return vec![ItemTax {
            tax_name: LEGACY_TAX_NAME.to_string(),
            tax_rate: item.tax_rate,
            tax_amount: tax_for(item.tax_rate),
        }];
    }

    Vec::new()
}
