//! Field validation for applicant records

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{10}$").expect("hardcoded pattern compiles"));

static AADHAAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{12}$").expect("hardcoded pattern compiles"));

/// Drop everything but ASCII digits
///
/// For views to apply as the user types into the mobile and Aadhaar
/// fields.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// A mobile number is exactly ten digits
pub fn validate_mobile(mobile: &str) -> Result<(), Error> {
    if MOBILE_RE.is_match(mobile.trim()) {
        Ok(())
    } else {
        Err(Error::InvalidMobile)
    }
}

/// An Aadhaar number is exactly twelve digits
pub fn validate_aadhaar(aadhaar: &str) -> Result<(), Error> {
    if AADHAAR_RE.is_match(aadhaar.trim()) {
        Ok(())
    } else {
        Err(Error::InvalidAadhaar)
    }
}
