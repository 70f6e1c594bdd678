//! Input validators shared by user and store endpoints.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Mainland CN mobile numbers: 11 digits, 13x-19x prefixes.
    static ref MOBILE_RE: Regex = Regex::new(r"^1[3-9]\d{9}$").unwrap();
}

pub fn is_valid_mobile(mobile: &str) -> bool {
    MOBILE_RE.is_match(mobile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_standard_mobiles() {
        assert!(is_valid_mobile("13800000000"));
        assert!(is_valid_mobile("19912345678"));
    }

    #[test]
    fn rejects_bad_mobiles() {
        assert!(!is_valid_mobile("12345678901")); // bad prefix
        assert!(!is_valid_mobile("1380000000")); // too short
        assert!(!is_valid_mobile("138000000000")); // too long
        assert!(!is_valid_mobile("+8613800000000")); // country code
        assert!(!is_valid_mobile("138-0000-0000"));
    }
}
