use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppEnv;

/// Installs the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init(env: AppEnv, default_level: &str) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level: {default_level}"))?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match env {
        AppEnv::Prod => builder.json().try_init(),
        AppEnv::Dev => builder.try_init(),
    };
    installed.map_err(|err| anyhow::anyhow!(err)).context("failed to install tracing subscriber")
}
