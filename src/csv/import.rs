use ::csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;

use crate::core::{CalcError, LineItem, parse_numeric_or_zero};

/// Import line items from CSV text with a header row.
///
/// Header names are matched case-insensitively. `quantity` and `price`
/// columns are required; `description` and `tax_rate` are optional and
/// other columns (such as an exported `amount`) are ignored. Numeric cells
/// use the permissive policy, so `"abc"` becomes zero. Rows whose cells are
/// all empty are skipped; short rows are accepted with the missing cells
/// treated as empty.
pub fn import_line_items_csv(input: &str) -> Result<Vec<LineItem>, CalcError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CalcError::Csv(e.to_string()))?
        .clone();
    let columns = Columns::locate(&headers)?;

    let mut items = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CalcError::Csv(format!("row {}: {e}", row + 2)))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        items.push(columns.line_item(&record));
    }

    tracing::debug!(rows = items.len(), "imported line items from CSV");
    Ok(items)
}

struct Columns {
    quantity: usize,
    price: usize,
    description: Option<usize>,
    tax_rate: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, CalcError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require =
            |name: &str| find(name).ok_or_else(|| CalcError::MissingColumn(name.to_string()));

        Ok(Self {
            quantity: require("quantity")?,
            price: require("price")?,
            description: find("description"),
            tax_rate: find("tax_rate"),
        })
    }

    fn line_item(&self, record: &StringRecord) -> LineItem {
        let number = |idx: Option<usize>| {
            idx.and_then(|i| record.get(i))
                .map_or(Decimal::ZERO, parse_numeric_or_zero)
        };

        LineItem {
            description: self
                .description
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            quantity: number(Some(self.quantity)),
            price: number(Some(self.price)),
            tax_rate: number(self.tax_rate),
            taxes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn requires_quantity_and_price() {
        let err = import_line_items_csv("description,price\nA,1\n").unwrap_err();
        assert!(matches!(err, CalcError::MissingColumn(ref c) if c == "quantity"));

        let err = import_line_items_csv("Quantity\n1\n").unwrap_err();
        assert!(matches!(err, CalcError::MissingColumn(ref c) if c == "price"));
    }

    #[test]
    fn headers_are_case_insensitive_and_reorderable() {
        let items = import_line_items_csv("PRICE , Quantity\n9.99,3\n").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, dec!(3));
        assert_eq!(items[0].price, dec!(9.99));
        assert_eq!(items[0].description, None);
    }

    #[test]
    fn short_and_blank_rows() {
        let items = import_line_items_csv("quantity,price,tax_rate\n2\n,,\n1,5,20\n").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, dec!(2));
        assert_eq!(items[0].price, Decimal::ZERO);
        assert_eq!(items[1].tax_rate, dec!(20));
    }
}
