//! Validation of financial identifiers and user-entered amounts.
//!
//! Malformed input is an expected condition that must be shown to the
//! user, so validators never fail: they return a [`ValidationResult`]
//! carrying a human-readable message.  Identifiers are normalised
//! (trimmed and upper-cased) before any check.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::format_inr;

/// Fourth PAN character codes accepted as a holder type.
static PAN_HOLDER_TYPES: [(char, &str); 11] = [
    ('A', "Association of Persons (AOP)"),
    ('B', "Body of Individuals (BOI)"),
    ('C', "Company"),
    ('F', "Firm/LLP"),
    ('G', "Government"),
    ('H', "HUF (Hindu Undivided Family)"),
    ('L', "Local Authority"),
    ('J', "Artificial Juridical Person"),
    ('P', "Individual/Person"),
    ('T', "Trust (AOP)"),
    ('K', "Krishi Unnat Samaj"),
];

static GSTIN_STATES: [(&str, &str); 38] = [
    ("01", "Jammu & Kashmir"),
    ("02", "Himachal Pradesh"),
    ("03", "Punjab"),
    ("04", "Chandigarh"),
    ("05", "Uttarakhand"),
    ("06", "Haryana"),
    ("07", "Delhi"),
    ("08", "Rajasthan"),
    ("09", "Uttar Pradesh"),
    ("10", "Bihar"),
    ("11", "Sikkim"),
    ("12", "Arunachal Pradesh"),
    ("13", "Nagaland"),
    ("14", "Manipur"),
    ("15", "Mizoram"),
    ("16", "Tripura"),
    ("17", "Meghalaya"),
    ("18", "Assam"),
    ("19", "West Bengal"),
    ("20", "Jharkhand"),
    ("21", "Odisha"),
    ("22", "Chhattisgarh"),
    ("23", "Madhya Pradesh"),
    ("24", "Gujarat"),
    ("25", "Daman & Diu"),
    ("26", "Dadra & Nagar Haveli"),
    ("27", "Maharashtra"),
    ("28", "Andhra Pradesh (Old)"),
    ("29", "Karnataka"),
    ("30", "Goa"),
    ("31", "Lakshadweep"),
    ("32", "Kerala"),
    ("33", "Tamil Nadu"),
    ("34", "Puducherry"),
    ("35", "Andaman & Nicobar Islands"),
    ("36", "Telangana"),
    ("37", "Andhra Pradesh (New)"),
    ("97", "Other Territory"),
];

/// Outcome of validating a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { valid: true, error: None }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }
}

/// Outcome of validating a whole financial profile.  `errors` is keyed by
/// the profile field name (`panNumber`, `gstinNumber`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileValidation {
    pub valid: bool,
    pub errors: BTreeMap<String, String>,
}

pub fn format_pan(pan: &str) -> String {
    pan.trim().to_uppercase()
}

pub fn format_gstin(gstin: &str) -> String {
    gstin.trim().to_uppercase()
}

fn matches_pan_pattern(chars: &[char]) -> bool {
    chars.len() == 10
        && chars[..5].iter().all(char::is_ascii_uppercase)
        && chars[5..9].iter().all(char::is_ascii_digit)
        && chars[9].is_ascii_uppercase()
}

fn matches_gstin_pattern(chars: &[char]) -> bool {
    chars.len() == 15
        && chars[..2].iter().all(char::is_ascii_digit)
        && matches_pan_pattern(&chars[2..12])
        && matches!(chars[12], '1'..='9' | 'A'..='Z')
        && chars[13] == 'Z'
        && chars[14].is_ascii_alphanumeric()
        && !chars[14].is_ascii_lowercase()
}

/// Validates a PAN: five letters, four digits, one letter, with a known
/// holder type in the fourth position.
pub fn validate_pan(pan: &str) -> ValidationResult {
    if pan.trim().is_empty() {
        return ValidationResult::invalid("PAN number is required");
    }

    let clean: Vec<char> = format_pan(pan).chars().collect();
    if clean.len() != 10 {
        return ValidationResult::invalid("PAN must be exactly 10 characters");
    }
    if !matches_pan_pattern(&clean) {
        return ValidationResult::invalid(
            "Invalid PAN format. Must be 5 letters, 4 digits, 1 letter (e.g., ABCPE1234F)",
        );
    }
    if !PAN_HOLDER_TYPES.iter().any(|(code, _)| *code == clean[3]) {
        return ValidationResult::invalid("Invalid PAN holder type character");
    }

    ValidationResult::ok()
}

/// Validates a GSTIN.  An empty GSTIN is valid; whether one is required
/// is decided by [`validate_financial_profile`].
pub fn validate_gstin(gstin: &str) -> ValidationResult {
    if gstin.trim().is_empty() {
        return ValidationResult::ok();
    }

    let clean = format_gstin(gstin);
    let chars: Vec<char> = clean.chars().collect();
    if chars.len() != 15 {
        return ValidationResult::invalid("GSTIN must be exactly 15 characters");
    }
    if !matches_gstin_pattern(&chars) {
        return ValidationResult::invalid("Invalid GSTIN format");
    }

    let state_code: u32 = clean[..2].parse().unwrap_or(0);
    if !matches!(state_code, 1..=37 | 97) {
        return ValidationResult::invalid("Invalid state code in GSTIN");
    }
    if !validate_pan(&clean[2..12]).valid {
        return ValidationResult::invalid("Invalid PAN embedded in GSTIN");
    }

    ValidationResult::ok()
}

/// PAN embedded at characters 3–12 of a GSTIN.
pub fn extract_pan_from_gstin(gstin: &str) -> Option<String> {
    let chars: Vec<char> = gstin.chars().collect();
    if chars.len() < 12 {
        return None;
    }
    Some(chars[2..12].iter().collect::<String>().to_uppercase())
}

/// Checks that the PAN embedded in `gstin` is the same as `pan`.
pub fn validate_pan_gstin_match(pan: &str, gstin: &str) -> ValidationResult {
    match extract_pan_from_gstin(&format_gstin(gstin)) {
        Some(embedded) if embedded != format_pan(pan) => {
            ValidationResult::invalid("PAN in GSTIN does not match provided PAN number")
        }
        _ => ValidationResult::ok(),
    }
}

/// Human-readable holder type for a PAN, or `"Unknown"`.
pub fn pan_holder_type(pan: &str) -> &'static str {
    pan.chars()
        .nth(3)
        .map(|c| c.to_ascii_uppercase())
        .and_then(|c| PAN_HOLDER_TYPES.iter().find(|(code, _)| *code == c))
        .map_or("Unknown", |&(_, name)| name)
}

/// State or territory encoded in the first two GSTIN digits, or `"Unknown"`.
pub fn gstin_state(gstin: &str) -> &'static str {
    gstin
        .get(..2)
        .and_then(|code| GSTIN_STATES.iter().find(|(c, _)| *c == code))
        .map_or("Unknown", |&(_, name)| name)
}

/// Validates the PAN/GSTIN pair stored on a user's financial profile.
///
/// PAN is always required; GSTIN is required for GST-registered users and
/// format-checked whenever present.  A PAN/GSTIN mismatch replaces any
/// other GSTIN error.
pub fn validate_financial_profile(
    pan: Option<&str>,
    gstin: Option<&str>,
    is_gst_registered: bool,
) -> ProfileValidation {
    let pan = pan.filter(|p| !p.is_empty());
    let gstin = gstin.filter(|g| !g.is_empty());
    let mut errors = BTreeMap::new();

    match pan {
        Some(pan) => {
            if let Some(error) = validate_pan(pan).error {
                errors.insert("panNumber".to_string(), error);
            }
        }
        None => {
            errors.insert("panNumber".to_string(), "PAN number is required".to_string());
        }
    }

    match gstin {
        Some(gstin) => {
            if let Some(error) = validate_gstin(gstin).error {
                errors.insert("gstinNumber".to_string(), error);
            }
        }
        None if is_gst_registered => {
            errors.insert(
                "gstinNumber".to_string(),
                "GSTIN is required for GST registered users".to_string(),
            );
        }
        None => {}
    }

    if let (Some(pan), Some(gstin)) = (pan, gstin) {
        if let Some(error) = validate_pan_gstin_match(pan, gstin).error {
            errors.insert("gstinNumber".to_string(), error);
        }
    }

    ProfileValidation {
        valid: errors.is_empty(),
        errors,
    }
}

/// Validates a bid against the posted project budget.  Bids below
/// `min_percentage`% of a known, positive budget are rejected.
pub fn validate_bid_amount(
    amount: f64,
    project_budget: Option<f64>,
    min_percentage: f64,
) -> ValidationResult {
    if !amount.is_finite() || amount <= 0.0 {
        return ValidationResult::invalid("Please enter a valid bid amount");
    }

    if let Some(budget) = project_budget.filter(|b| *b > 0.0) {
        let min_bid = budget * (min_percentage / 100.0);
        if amount < min_bid {
            return ValidationResult::invalid(format!(
                "Minimum bid is {} ({}% of project budget)",
                format_inr(min_bid),
                min_percentage
            ));
        }
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::MIN_BID_PERCENT_OF_BUDGET;

    #[test]
    fn accepts_well_formed_pan() {
        assert_eq!(validate_pan("ABCPE1234F"), ValidationResult::ok());
        assert!(validate_pan("  abcpe1234f ").valid);
    }

    #[test]
    fn rejects_pan_by_length_pattern_and_holder() {
        assert_eq!(
            validate_pan("ABCP1234F").error.as_deref(),
            Some("PAN must be exactly 10 characters")
        );
        assert!(validate_pan("ABCP11234F")
            .error
            .unwrap()
            .starts_with("Invalid PAN format"));
        assert_eq!(
            validate_pan("ABCDQ1234F").error.as_deref(),
            Some("Invalid PAN holder type character")
        );
        assert_eq!(
            validate_pan("ABCDE1234F").error.as_deref(),
            Some("Invalid PAN holder type character")
        );
        assert_eq!(validate_pan("   ").error.as_deref(), Some("PAN number is required"));
    }

    #[test]
    fn gstin_optional_and_structured() {
        assert!(validate_gstin("").valid);
        assert!(validate_gstin("27ABCPE1234F1Z5").valid);
        assert!(validate_gstin("97ABCPE1234FAZZ").valid);
        assert_eq!(
            validate_gstin("27ABCPE1234F1Z").error.as_deref(),
            Some("GSTIN must be exactly 15 characters")
        );
        assert_eq!(
            validate_gstin("27ABCPE1234F0Z5").error.as_deref(),
            Some("Invalid GSTIN format")
        );
        assert_eq!(
            validate_gstin("27ABCPE1234F1X5").error.as_deref(),
            Some("Invalid GSTIN format")
        );
    }

    #[test]
    fn gstin_state_code_and_embedded_pan() {
        assert_eq!(
            validate_gstin("38ABCPE1234F1Z5").error.as_deref(),
            Some("Invalid state code in GSTIN")
        );
        assert_eq!(
            validate_gstin("00ABCPE1234F1Z5").error.as_deref(),
            Some("Invalid state code in GSTIN")
        );
        assert_eq!(
            validate_gstin("27ABCDQ1234F1Z5").error.as_deref(),
            Some("Invalid PAN embedded in GSTIN")
        );
    }

    #[test]
    fn cross_checks_embedded_pan() {
        assert!(validate_pan_gstin_match("abcpe1234f", "27ABCPE1234F1Z5").valid);
        assert_eq!(
            validate_pan_gstin_match("ABCPE1234F", "27ZZZPZ9999Z1Z5").error.as_deref(),
            Some("PAN in GSTIN does not match provided PAN number")
        );
    }

    #[test]
    fn lookups_degrade_to_unknown() {
        assert_eq!(pan_holder_type("ABCPE1234F"), "Individual/Person");
        assert_eq!(pan_holder_type("abcce1234f"), "Company");
        assert_eq!(pan_holder_type("ABCDQ1234F"), "Unknown");
        assert_eq!(pan_holder_type("AB"), "Unknown");
        assert_eq!(gstin_state("27ABCPE1234F1Z5"), "Maharashtra");
        assert_eq!(gstin_state("97"), "Other Territory");
        assert_eq!(gstin_state("99ABCPE1234F1Z5"), "Unknown");
        assert_eq!(gstin_state("2"), "Unknown");
    }

    #[test]
    fn extracts_embedded_pan() {
        assert_eq!(
            extract_pan_from_gstin("27abcpe1234f1z5").as_deref(),
            Some("ABCPE1234F")
        );
        assert_eq!(extract_pan_from_gstin("27ABC"), None);
    }

    #[test]
    fn profile_requires_pan_and_gstin_when_registered() {
        let result = validate_financial_profile(None, None, true);
        assert!(!result.valid);
        assert_eq!(result.errors["panNumber"], "PAN number is required");
        assert_eq!(
            result.errors["gstinNumber"],
            "GSTIN is required for GST registered users"
        );

        let unregistered = validate_financial_profile(Some("ABCPE1234F"), None, false);
        assert!(unregistered.valid);
        assert!(unregistered.errors.is_empty());
    }

    #[test]
    fn profile_mismatch_overrides_gstin_error() {
        let result =
            validate_financial_profile(Some("ABCPE1234F"), Some("27ABCDQ1234F1Z5"), true);
        assert_eq!(
            result.errors["gstinNumber"],
            "PAN in GSTIN does not match provided PAN number"
        );

        let consistent =
            validate_financial_profile(Some("ABCPE1234F"), Some("27ABCPE1234F1Z5"), true);
        assert!(consistent.valid);
    }

    #[test]
    fn bid_amount_rules() {
        assert!(validate_bid_amount(50_000.0, None, MIN_BID_PERCENT_OF_BUDGET).valid);
        assert!(validate_bid_amount(80_000.0, Some(100_000.0), 80.0).valid);
        assert!(validate_bid_amount(10.0, Some(0.0), 80.0).valid);
        assert_eq!(
            validate_bid_amount(0.0, None, 80.0).error.as_deref(),
            Some("Please enter a valid bid amount")
        );
        assert!(!validate_bid_amount(f64::NAN, None, 80.0).valid);
        assert_eq!(
            validate_bid_amount(79_999.0, Some(100_000.0), 80.0)
                .error
                .as_deref(),
            Some("Minimum bid is ₹80,000.00 (80% of project budget)")
        );
    }
}
