// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Ndira notification agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Ndira configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NdiraConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storefront branding used on rendered receipts.
    #[serde(default)]
    pub branding: BrandingConfig,

    /// WhatsApp bridge transport settings.
    #[serde(default)]
    pub whatsapp: WhatsappConfig,

    /// Object storage settings for published receipt PDFs.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Serialized dispatch lane and retry settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "ndira".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storefront branding rendered onto receipt PDFs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrandingConfig {
    /// Business name shown in the header band.
    #[serde(default = "default_business_name")]
    pub business_name: String,

    /// Tagline shown under the business name.
    #[serde(default = "default_tagline")]
    pub tagline: String,

    /// Contact line shown in the header band.
    #[serde(default = "default_contact_line")]
    pub contact_line: String,

    /// Address/contact text centered in the footer band.
    #[serde(default = "default_footer_line")]
    pub footer_line: String,

    /// Thank-you line shown above the footer.
    #[serde(default = "default_thank_you")]
    pub thank_you: String,

    /// Smaller appreciation line under the thank-you line.
    #[serde(default = "default_appreciation")]
    pub appreciation: String,

    /// Brand color as `#RRGGBB`.
    #[serde(default = "default_brand_color")]
    pub brand_color: String,

    /// Prefix for generated PDF file names (`<prefix>-<saleNumber>.pdf`).
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            business_name: default_business_name(),
            tagline: default_tagline(),
            contact_line: default_contact_line(),
            footer_line: default_footer_line(),
            thank_you: default_thank_you(),
            appreciation: default_appreciation(),
            brand_color: default_brand_color(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_business_name() -> String {
    "Accessories World".to_string()
}

fn default_tagline() -> String {
    "Phone accessories, gadgets & more".to_string()
}

fn default_contact_line() -> String {
    "+263 77 512 3456 | sales@accessoriesworld.co.zw".to_string()
}

fn default_footer_line() -> String {
    "Shop 14, Gulf Complex, Harare | accessoriesworld.co.zw".to_string()
}

fn default_thank_you() -> String {
    "Thank you for your purchase!".to_string()
}

fn default_appreciation() -> String {
    "We appreciate your business.".to_string()
}

fn default_brand_color() -> String {
    "#14735C".to_string()
}

fn default_file_prefix() -> String {
    "ACCESSORIES-WORLD".to_string()
}

/// WhatsApp bridge transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsappConfig {
    /// Base URL of the headless WhatsApp bridge sidecar.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Country calling code substituted for the trunk prefix.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Local trunk prefix replaced during number normalization.
    #[serde(default = "default_trunk_prefix")]
    pub trunk_prefix: String,
}

impl Default for WhatsappConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            country_code: default_country_code(),
            trunk_prefix: default_trunk_prefix(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8466".to_string()
}

fn default_country_code() -> String {
    "263".to_string()
}

fn default_trunk_prefix() -> String {
    "0".to_string()
}

/// Object storage configuration for published receipts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Upload endpoint of the storage service.
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,

    /// Bucket receiving uploaded objects.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Base URL public object URLs are derived from.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Bearer token for the upload endpoint. `None` sends unauthenticated.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
            bucket: default_bucket(),
            public_base_url: default_public_base_url(),
            api_token: None,
        }
    }
}

fn default_storage_endpoint() -> String {
    "http://127.0.0.1:9000".to_string()
}

fn default_bucket() -> String {
    "media".to_string()
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:9000/media".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

/// Serialized dispatch lane and retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Inter-send pacing delay in milliseconds.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Maximum retries per transport send (attempts = retries + 1).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base exponential-backoff delay in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Optional deadline for a queued task in seconds. `None` disables the
    /// deadline; a hung transport call then stalls the lane indefinitely.
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            pacing_ms: default_pacing_ms(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            task_timeout_secs: None,
        }
    }
}

fn default_pacing_ms() -> u64 {
    200
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay_ms() -> u64 {
    500
}
