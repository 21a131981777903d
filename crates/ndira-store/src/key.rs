// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage key derivation and filename sanitization.

/// Sanitize a caller-supplied filename into a safe storage key segment.
///
/// Whitespace runs collapse to a single hyphen; any character outside
/// `[A-Za-z0-9._-]` is dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.trim().chars() {
        if c.is_whitespace() {
            pending_hyphen = true;
            continue;
        }
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c);
        }
    }

    if out.is_empty() {
        "receipt.pdf".to_string()
    } else {
        out
    }
}

/// Derive the bucket key for a published receipt.
pub fn storage_key(unix_millis: i64, file_name: &str) -> String {
    format!("receipts/{unix_millis}-{}", sanitize_file_name(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_hyphens_and_symbols_are_dropped() {
        assert_eq!(sanitize_file_name("My Receipt #1.pdf"), "My-Receipt-1.pdf");
    }

    #[test]
    fn whitespace_runs_collapse_to_one_hyphen() {
        assert_eq!(sanitize_file_name("a   b\t c.pdf"), "a-b-c.pdf");
    }

    #[test]
    fn safe_names_pass_through() {
        assert_eq!(
            sanitize_file_name("ACCESSORIES-WORLD-A1B2C3D4.pdf"),
            "ACCESSORIES-WORLD-A1B2C3D4.pdf"
        );
    }

    #[test]
    fn fully_unsafe_names_fall_back() {
        assert_eq!(sanitize_file_name("###"), "receipt.pdf");
        assert_eq!(sanitize_file_name("   "), "receipt.pdf");
    }

    #[test]
    fn storage_key_embeds_millis_and_sanitized_name() {
        let key = storage_key(1736100000123, "My Receipt #1.pdf");
        assert_eq!(key, "receipts/1736100000123-My-Receipt-1.pdf");
    }
}
