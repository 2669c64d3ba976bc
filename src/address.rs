//! Column-letter numerals and cell address tokens
//!
//! Column labels are bijective base-26 numerals: `A` = 1 … `Z` = 26,
//! `AA` = 27. Labels are case-insensitive.

use crate::error::{ExcelError, Result};
use crate::types::CellAddress;

/// Fail with `InvalidFormat` unless `label` is a non-empty run of ASCII letters
pub fn validate_column_label(label: &str) -> Result<()> {
    if label.is_empty() || !label.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(ExcelError::InvalidFormat(format!(
            "'{}' is invalid column name! valid column name such as: B, AB, AZ",
            label
        )));
    }
    Ok(())
}

/// Convert a column label to its 1-based index ("A" -> 1, "AA" -> 27)
pub fn column_index(label: &str) -> Result<u32> {
    validate_column_label(label)?;

    let mut index: u32 = 0;
    let mut weight: u32 = 1;
    for (i, byte) in label.bytes().rev().enumerate() {
        if i > 0 {
            weight = weight
                .checked_mul(26)
                .ok_or_else(|| out_of_range(label))?;
        }
        let digit = u32::from(byte.to_ascii_uppercase() - b'A' + 1);
        index = digit
            .checked_mul(weight)
            .and_then(|d| index.checked_add(d))
            .ok_or_else(|| out_of_range(label))?;
    }
    Ok(index)
}

fn out_of_range(label: &str) -> ExcelError {
    ExcelError::InvalidFormat(format!("column label '{}' is out of range", label))
}

/// Convert a 1-based column index to its label (1 -> "A", 27 -> "AA")
pub fn column_label(index: u32) -> Result<String> {
    if index == 0 {
        return Err(ExcelError::InvalidCell(
            "column index must be greater than 0".to_string(),
        ));
    }
    Ok(label_for(index))
}

/// Label for an index already known to be positive
pub(crate) fn label_for(index: u32) -> String {
    let mut result = String::new();
    let mut col = index;

    while col > 0 {
        col -= 1;
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        col /= 26;
    }

    result
}

/// Parse a `<letters><digits>` token such as "B7" into a cell address
pub fn parse_address(token: &str) -> Result<CellAddress> {
    let invalid = || ExcelError::InvalidFormat(format!("invalid excel address: {}", token));

    let split = token
        .find(|c: char| !c.is_ascii_alphabetic())
        .ok_or_else(invalid)?;
    let (letters, digits) = token.split_at(split);
    if letters.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let column = column_index(letters)?;
    let row: u32 = digits.parse().map_err(|_| invalid())?;
    CellAddress::new(row, column).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 1);
        assert_eq!(column_index("Z").unwrap(), 26);
        assert_eq!(column_index("AA").unwrap(), 27);
        assert_eq!(column_index("AZ").unwrap(), 52);
        assert_eq!(column_index("az").unwrap(), 52);
        assert_eq!(column_index("XFD").unwrap(), 16384);
    }

    #[test]
    fn test_column_index_rejects_bad_labels() {
        for label in ["", "A1", "1", "A-B", "É"] {
            assert!(
                matches!(column_index(label), Err(ExcelError::InvalidFormat(_))),
                "label {:?} should be rejected",
                label
            );
        }
        assert!(matches!(
            column_index("ZZZZZZZZZZ"),
            Err(ExcelError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_column_label() {
        assert_eq!(column_label(1).unwrap(), "A");
        assert_eq!(column_label(26).unwrap(), "Z");
        assert_eq!(column_label(27).unwrap(), "AA");
        assert_eq!(column_label(52).unwrap(), "AZ");
        assert!(column_label(0).is_err());
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address("B7").unwrap();
        assert_eq!((addr.row(), addr.column()), (7, 2));

        let addr = parse_address("AZ12").unwrap();
        assert_eq!((addr.row(), addr.column()), (12, 52));

        let addr: CellAddress = "c3".parse().unwrap();
        assert_eq!((addr.row(), addr.column()), (3, 3));
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for token in ["7B", "B", "7", "", "B0", "B7C", "B 7"] {
            assert!(
                matches!(parse_address(token), Err(ExcelError::InvalidFormat(_))),
                "token {:?} should be rejected",
                token
            );
        }
    }

    proptest! {
        #[test]
        fn label_and_index_round_trip(index in 1u32..1_000_000) {
            let label = column_label(index).unwrap();
            prop_assert_eq!(column_index(&label).unwrap(), index);
        }

        #[test]
        fn index_increases_with_label_order(a in 1u32..100_000, b in 1u32..100_000) {
            let (la, lb) = (column_label(a).unwrap(), column_label(b).unwrap());
            let order = (la.len(), la.as_str()).cmp(&(lb.len(), lb.as_str()));
            prop_assert_eq!(order, a.cmp(&b));
        }
    }
}
