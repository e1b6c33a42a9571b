//! Helper utility functions

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Round to one decimal place, ties to even.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Spreadsheet column letter for a 0-based index (0 = A, 26 = AA).
pub fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;

    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inches() {
        assert_eq!(inches(0.5), 457_200);
        assert_eq!(inches(2.5), 2_286_000);
        assert_eq!(inches(8.0), 7_315_200);
        assert_eq!(inches(3.5), 3_200_400);
    }

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(66.666), 66.7);
        assert_eq!(round_one_decimal(33.333), 33.3);
        assert_eq!(round_one_decimal(50.0), 50.0);
        assert!(round_one_decimal(f64::NAN).is_nan());
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(1), "B");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }
}
