//! Conversion between 1-based (row, column) indexes and Excel-style
//! cell references such as "A1" or "AB12".

/// Converts 1-based row & column numbers to an Excel-style cell reference.
pub fn index_to_reference(row: usize, column: usize) -> String {
    let mut column = column as u32;
    let mut reference = String::new();
    while column > 0 {
        column -= 1;
        let digit = char::from_u32(65 + column % 26).expect("ASCII letter");
        column /= 26;
        reference.insert(0, digit);
    }
    reference.push_str(&row.to_string());
    reference
}

/// Parses an Excel-style cell reference into 1-based (row, column) indexes.
/// Returns `None` for malformed references.
pub fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let split = reference.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = reference.split_at(split);
    let mut column = 0usize;
    for character in letters.chars() {
        if !character.is_ascii_uppercase() {
            return None;
        }
        column = column * 26 + (character as usize - 'A' as usize + 1);
    }
    let row = digits.parse::<usize>().ok()?;
    if row == 0 || column == 0 {
        None
    } else {
        Some((row, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_to_reference_single_letter() {
        assert_eq!(index_to_reference(1, 1), "A1");
        assert_eq!(index_to_reference(7, 2), "B7");
        assert_eq!(index_to_reference(100, 26), "Z100");
    }

    #[test]
    fn index_to_reference_multi_letter() {
        assert_eq!(index_to_reference(1, 27), "AA1");
        assert_eq!(index_to_reference(12, 28), "AB12");
        assert_eq!(index_to_reference(3, 703), "AAA3");
    }

    #[test]
    fn reference_to_index_round_trip() {
        for (row, column) in [(1, 1), (7, 2), (100, 26), (1, 27), (12, 28), (3, 703)] {
            let reference = index_to_reference(row, column);
            assert_eq!(reference_to_index(&reference), Some((row, column)));
        }
    }

    #[test]
    fn reference_to_index_rejects_malformed() {
        assert_eq!(reference_to_index("A"), None);
        assert_eq!(reference_to_index("12"), None);
        assert_eq!(reference_to_index("a1"), None);
        assert_eq!(reference_to_index("A0"), None);
    }
}
