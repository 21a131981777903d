// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./ndira.toml` > `~/.config/ndira/ndira.toml` > `/etc/ndira/ndira.toml`
//! with environment variable overrides via `NDIRA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::NdiraConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/ndira/ndira.toml` (system-wide)
/// 3. `~/.config/ndira/ndira.toml` (user XDG config)
/// 4. `./ndira.toml` (local directory)
/// 5. `NDIRA_*` environment variables
pub fn load_config() -> Result<NdiraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NdiraConfig::default()))
        .merge(Toml::file("/etc/ndira/ndira.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("ndira/ndira.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("ndira.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<NdiraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NdiraConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<NdiraConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(NdiraConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `NDIRA_WHATSAPP_BRIDGE_URL` must map to
/// `whatsapp.bridge_url`, not `whatsapp.bridge.url`.
fn env_provider() -> Env {
    Env::prefixed("NDIRA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: NDIRA_WHATSAPP_BRIDGE_URL -> "whatsapp_bridge_url"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("branding_", "branding.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("dispatch_", "dispatch.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn str_loader_applies_defaults_under_partial_toml() {
        let config = load_config_from_str("[agent]\nname = \"notifier\"\n").unwrap();
        assert_eq!(config.agent.name, "notifier");
        assert_eq!(config.whatsapp.country_code, "263");
    }

    #[test]
    fn str_loader_rejects_unknown_key() {
        let result = load_config_from_str("[dispatch]\npacing = 100\n");
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn env_override_maps_section_keys() {
        // SAFETY: test is serialized; no other thread touches the env.
        unsafe { std::env::set_var("NDIRA_WHATSAPP_BRIDGE_URL", "http://bridge:9") };
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[gateway]\nport = 3200\n").unwrap();

        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.whatsapp.bridge_url, "http://bridge:9");
        assert_eq!(config.gateway.port, 3200);

        unsafe { std::env::remove_var("NDIRA_WHATSAPP_BRIDGE_URL") };
    }

    #[test]
    #[serial]
    fn path_loader_reads_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[branding]\nbusiness_name = \"Test Shop\"\n").unwrap();
        let config = load_config_from_path(file.path()).unwrap();
        assert_eq!(config.branding.business_name, "Test Shop");
    }
}
