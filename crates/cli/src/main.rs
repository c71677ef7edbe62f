//! # SocksGate
//!
//! Connection admission and destination resolution for a forward proxy.
//! The binary runs the admission flow for destinations given on the command
//! line, using the same policy and resolver configuration a proxy would.

mod bootstrap;
mod commands;
mod di;

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand};
use socksgate_domain::{CliOverrides, Command};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "socksgate")]
#[command(version)]
#[command(about = "Admission policy and destination resolution for a SOCKS gateway")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// Hostnames clients may connect to (comma separated)
    #[arg(long, env = "PROXY_ALLOWED_DEST_FQDN", value_delimiter = ',', global = true)]
    allowed_hostnames: Option<Vec<String>>,

    /// Hostnames that are always refused (comma separated)
    #[arg(long, env = "PROXY_REJECT_DEST_FQDN", value_delimiter = ',', global = true)]
    rejected_hostnames: Option<Vec<String>>,

    /// Networks or addresses clients may connect to (comma separated)
    #[arg(long, env = "PROXY_ALLOWED_IPS", value_delimiter = ',', global = true)]
    allowed_networks: Option<Vec<String>>,

    /// Networks or addresses that are always refused (comma separated)
    #[arg(long, env = "PROXY_REJECT_IPS", value_delimiter = ',', global = true)]
    rejected_networks: Option<Vec<String>>,

    #[arg(long, env = "PROXY_DISABLE_BIND", value_name = "BOOL", value_parser = BoolishValueParser::new(), global = true)]
    disable_bind: Option<bool>,

    #[arg(long, env = "PROXY_DISABLE_ASSOCIATE", value_name = "BOOL", value_parser = BoolishValueParser::new(), global = true)]
    disable_associate: Option<bool>,

    /// Upstream DNS server address; the system resolver is used when unset
    #[arg(long, env = "DNS_HOST", global = true)]
    dns_host: Option<String>,

    #[arg(long, env = "DNS_PORT", global = true)]
    dns_port: Option<u16>,

    /// Cache upstream answers for their TTL
    #[arg(long, env = "DNS_USE_CACHE", value_name = "BOOL", value_parser = BoolishValueParser::new(), global = true)]
    dns_cache: Option<bool>,

    /// Resolve IPv6 first and fall back to IPv4
    #[arg(long, env = "PREFER_IPV6", value_name = "BOOL", value_parser = BoolishValueParser::new(), global = true)]
    prefer_ipv6: Option<bool>,

    /// Per-query timeout in milliseconds
    #[arg(long, global = true)]
    query_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Shorthand for --log-level debug
    #[arg(long, env = "LOG_LEVEL_DEBUG", value_name = "BOOL", value_parser = BoolishValueParser::new(), global = true)]
    debug: Option<bool>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the admission flow for each destination and print the verdict
    Check {
        /// Proxy command of the simulated requests
        #[arg(long, default_value = "connect")]
        command: Command,

        /// Hostnames or IP addresses
        #[arg(required = true)]
        destinations: Vec<String>,
    },
    /// Resolve each hostname and print the selected address
    Resolve {
        #[arg(required = true)]
        hostnames: Vec<String>,
    },
    /// Print the effective configuration as TOML
    Config,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        let log_level = match self.debug {
            Some(true) => Some("debug".to_string()),
            _ => self.log_level.clone(),
        };

        CliOverrides {
            allowed_hostnames: self.allowed_hostnames.clone(),
            rejected_hostnames: self.rejected_hostnames.clone(),
            allowed_networks: self.allowed_networks.clone(),
            rejected_networks: self.rejected_networks.clone(),
            disable_bind: self.disable_bind,
            disable_associate: self.disable_associate,
            dns_host: self.dns_host.clone(),
            dns_port: self.dns_port,
            cache_enabled: self.dns_cache,
            prefer_ipv6: self.prefer_ipv6,
            query_timeout: self.query_timeout,
            log_level,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config);
    bootstrap::log_config_summary(&config, cli.config.as_deref());

    if let Commands::Config = cli.command {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(ExitCode::SUCCESS);
    }

    let shutdown = CancellationToken::new();
    let services = di::Services::new(&config)?;
    let sweeper = services.start_background_tasks(&config, shutdown.child_token());

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling in-flight requests");
                shutdown.cancel();
            }
        });
    }

    let all_ok = match cli.command {
        Commands::Check {
            command,
            destinations,
        } => commands::check::run(&services, &shutdown, command, &destinations).await,
        Commands::Resolve { hostnames } => {
            commands::resolve::run(&services, &shutdown, &hostnames).await
        }
        Commands::Config => true,
    };

    shutdown.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    services.log_cache_stats();

    info!(success = all_ok, "Done");
    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
