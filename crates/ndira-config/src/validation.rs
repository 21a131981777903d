// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as well-formed URLs, digit-only dialing codes, and a
//! parseable brand color.

use crate::diagnostic::ConfigError;
use crate::model::NdiraConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &NdiraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Gateway host must be a valid IP or hostname.
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Dialing codes must be digit-only and non-empty.
    for (key, value) in [
        ("whatsapp.country_code", &config.whatsapp.country_code),
        ("whatsapp.trunk_prefix", &config.whatsapp.trunk_prefix),
    ] {
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be a non-empty string of digits, got `{value}`"),
            });
        }
    }

    // Outbound endpoints must be http(s) URLs.
    for (key, value) in [
        ("whatsapp.bridge_url", &config.whatsapp.bridge_url),
        ("storage.endpoint", &config.storage.endpoint),
        ("storage.public_base_url", &config.storage.public_base_url),
    ] {
        if !value.starts_with("http://") && !value.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must start with http:// or https://, got `{value}`"),
            });
        }
    }

    if config.storage.bucket.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.bucket must not be empty".to_string(),
        });
    }

    // Brand color must parse as #RRGGBB.
    if parse_hex_color(&config.branding.brand_color).is_none() {
        errors.push(ConfigError::Validation {
            message: format!(
                "branding.brand_color must be a `#RRGGBB` hex color, got `{}`",
                config.branding.brand_color
            ),
        });
    }

    // Dispatch settings within operational bounds.
    if config.dispatch.pacing_ms > 60_000 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.pacing_ms must be at most 60000, got {}",
                config.dispatch.pacing_ms
            ),
        });
    }
    if config.dispatch.max_retries > 10 {
        errors.push(ConfigError::Validation {
            message: format!(
                "dispatch.max_retries must be at most 10, got {}",
                config.dispatch.max_retries
            ),
        });
    }
    if let Some(secs) = config.dispatch.task_timeout_secs
        && secs == 0
    {
        errors.push(ConfigError::Validation {
            message: "dispatch.task_timeout_secs must be greater than zero when set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a `#RRGGBB` string into unit-interval RGB components.
pub fn parse_hex_color(value: &str) -> Option<(f64, f64, f64)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    ))
}
