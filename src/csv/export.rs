use ::csv::{Terminator, Writer, WriterBuilder};
use rust_decimal::Decimal;

use crate::core::{CalcError, InvoiceTotals, LineItem, round_money};

/// Header row of [`export_line_items_csv`].
pub const LINE_ITEM_HEADER: [&str; 5] = ["description", "quantity", "price", "tax_rate", "amount"];

/// Export line items, one row per item.
///
/// Columns: description,quantity,price,tax_rate,amount. The amount is
/// quantity × price rounded to 2 places.
pub fn export_line_items_csv(items: &[LineItem]) -> Result<String, CalcError> {
    let mut writer = new_writer();
    write_row(&mut writer, LINE_ITEM_HEADER)?;

    for item in items {
        write_row(
            &mut writer,
            [
                item.description.clone().unwrap_or_default(),
                item.quantity.normalize().to_string(),
                item.price.normalize().to_string(),
                item.tax_rate.normalize().to_string(),
                money_cell(item.amount()),
            ],
        )?;
    }

    finish(writer)
}

/// Export a totals breakdown as `field,value` rows.
///
/// Scalar totals come first, then one `document_tax:<name>@<rate>` row per
/// document tax and one `item_tax:<name>@<rate>` row per item tax group.
pub fn export_totals_csv(totals: &InvoiceTotals) -> Result<String, CalcError> {
    let mut writer = new_writer();
    write_row(&mut writer, ["field", "value"])?;

    let scalars = [
        ("subtotal", totals.subtotal),
        ("discount", totals.discount),
        ("subtotal_after_discount", totals.subtotal_after_discount),
        ("item_level_tax", totals.item_level_tax),
        ("document_tax", totals.document_tax),
        ("tax", totals.tax),
        ("total", totals.total),
    ];
    for (field, value) in scalars {
        write_row(&mut writer, [field.to_string(), money_cell(value)])?;
    }

    for entry in &totals.document_tax_breakdown {
        let field = format!("document_tax:{}@{}", entry.tax_name, entry.tax_rate.normalize());
        write_row(&mut writer, [field, money_cell(entry.tax_amount)])?;
    }
    for entry in &totals.tax_breakdown {
        let field = format!("item_tax:{}@{}", entry.tax_name, entry.tax_rate.normalize());
        write_row(&mut writer, [field, money_cell(entry.tax_amount)])?;
    }

    finish(writer)
}

fn new_writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn write_row<I, T>(writer: &mut Writer<Vec<u8>>, row: I) -> Result<(), CalcError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    writer
        .write_record(row)
        .map_err(|e| CalcError::Csv(e.to_string()))
}

fn finish(writer: Writer<Vec<u8>>) -> Result<String, CalcError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| CalcError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CalcError::Csv(e.to_string()))
}

/// Money rendered with exactly 2 decimal places.
fn money_cell(value: Decimal) -> String {
    let mut rounded = round_money(value);
    rounded.rescale(2);
    rounded.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_cells_have_two_places() {
        assert_eq!(money_cell(dec!(21)), "21.00");
        assert_eq!(money_cell(dec!(0.125)), "0.13");
        assert_eq!(money_cell(dec!(-3.5)), "-3.50");
    }

    #[test]
    fn empty_item_list_is_header_only() {
        assert_eq!(
            export_line_items_csv(&[]).unwrap(),
            "description,quantity,price,tax_rate,amount\n"
        );
    }

    #[test]
    fn descriptions_with_commas_are_quoted() {
        let items = [LineItem {
            description: Some("Widget, large".into()),
            quantity: dec!(2),
            price: dec!(3.50),
            ..Default::default()
        }];
        let out = export_line_items_csv(&items).unwrap();
        assert!(out.ends_with("\"Widget, large\",2,3.5,0,7.00\n"), "{out}");
    }
}
