/// A value is an ASIN when, after trimming and lower-casing, it starts with
/// "b0" and is exactly 10 characters. Applied independently to the targeting
/// expression (rule applicability) and the customer search term (result
/// classification) — two different fields of the same row.
pub fn is_asin(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    normalized.chars().count() == 10 && normalized.starts_with("b0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_char_b0_values_are_asins() {
        assert!(is_asin("B01ABCDEF0"));
        assert!(is_asin("b07xyz1234"));
        assert!(is_asin("  B09M7K2QL3  "));
    }

    #[test]
    fn wrong_length_is_not_an_asin() {
        assert!(!is_asin("B01ABC"));
        assert!(!is_asin("B01ABCDEF01"));
        assert!(!is_asin(""));
    }

    #[test]
    fn wrong_prefix_is_not_an_asin() {
        assert!(!is_asin("A01ABCDEF0"));
        assert!(!is_asin("blue shoes"));
        assert!(!is_asin("0B1ABCDEF0"));
    }
}
