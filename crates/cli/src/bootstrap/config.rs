use socksgate_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Emits the effective settings; call once the subscriber is installed.
pub fn log_config_summary(config: &Config, config_path: Option<&str>) {
    info!(
        config_file = config_path.unwrap_or("default"),
        upstream = config.resolver.upstream_host.as_deref().unwrap_or("system"),
        cache = config.resolver.cache_enabled,
        prefer_ipv6 = config.resolver.prefer_ipv6,
        "Configuration loaded"
    );
}
