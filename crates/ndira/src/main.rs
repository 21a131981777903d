// SPDX-FileCopyrightText: 2026 Ndira Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ndira - outbound WhatsApp notification agent.
//!
//! This is the binary entry point: CLI parsing, configuration loading, log
//! subscriber installation, and the serve loop.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Ndira - outbound WhatsApp notification agent.
#[derive(Parser, Debug)]
#[command(name = "ndira", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the notification agent (default).
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ndira_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ndira_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("ndira: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Serve) | None => {
            init_tracing(&config.agent.log_level);
            if let Err(e) = serve::run(config).await {
                tracing::error!(error = %e, "agent exited with error");
                std::process::exit(1);
            }
        }
    }
}

/// Install the tracing subscriber.
///
/// `NDIRA_LOG` overrides the configured level and accepts full env-filter
/// directives (e.g. `ndira_dispatch=debug,info`).
fn init_tracing(default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("NDIRA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Verify jemalloc is the global allocator by advancing the epoch.
        // Only jemalloc supports this -- the system allocator would fail.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn default_config_is_valid() {
        let config = ndira_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.agent.name, "ndira");
        assert_eq!(config.dispatch.pacing_ms, 200);
    }
}
