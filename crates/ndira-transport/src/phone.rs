// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Region-specific MSISDN normalization.
//!
//! Callers supply phone numbers in arbitrary formats (`0775 123-456`,
//! `+263 775 123 456`); this module canonicalizes them to the bare
//! international form the messaging network's lookup expects.

use ndira_core::NdiraError;

/// Normalize a raw phone string into international digits-only form.
///
/// Strips whitespace, hyphens, and a leading `+`; if the result starts with
/// the local trunk prefix, that prefix is replaced with the country calling
/// code (`0775123456` -> `263775123456` under the `263`/`0` defaults).
pub fn normalize_msisdn(
    raw: &str,
    country_code: &str,
    trunk_prefix: &str,
) -> Result<String, NdiraError> {
    let stripped: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    let stripped = stripped.strip_prefix('+').unwrap_or(&stripped);

    if stripped.is_empty() {
        return Err(NdiraError::BadRequest(
            "phone number is empty after normalization".into(),
        ));
    }

    match stripped.strip_prefix(trunk_prefix) {
        Some(rest) if !rest.is_empty() => Ok(format!("{country_code}{rest}")),
        _ => Ok(stripped.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> Result<String, NdiraError> {
        normalize_msisdn(raw, "263", "0")
    }

    #[test]
    fn trunk_prefix_becomes_country_code() {
        assert_eq!(normalize("0775123456").unwrap(), "263775123456");
    }

    #[test]
    fn international_form_with_spacing_is_flattened() {
        assert_eq!(normalize("+263 775 123 456").unwrap(), "263775123456");
    }

    #[test]
    fn hyphens_and_tabs_are_stripped() {
        assert_eq!(normalize("077-512\t3456").unwrap(), "263775123456");
    }

    #[test]
    fn already_normalized_number_is_unchanged() {
        assert_eq!(normalize("263775123456").unwrap(), "263775123456");
    }

    #[test]
    fn whitespace_only_input_is_rejected() {
        assert!(matches!(
            normalize("  \t "),
            Err(NdiraError::BadRequest(_))
        ));
    }

    #[test]
    fn bare_plus_is_rejected() {
        assert!(normalize("+").is_err());
    }

    #[test]
    fn lone_trunk_prefix_is_not_expanded() {
        // A bare "0" has no subscriber part; leave it for the lookup to reject.
        assert_eq!(normalize("0").unwrap(), "0");
    }
}
