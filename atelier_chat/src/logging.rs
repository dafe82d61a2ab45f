use anyhow::Context;
use tracing_subscriber::{prelude::*, EnvFilter, Registry};

use crate::config::env;

const DEFAULT_DIRECTIVES: &str = "info";

pub fn configure_logging() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env(env::LOG)
        .or_else(|_| EnvFilter::try_new(DEFAULT_DIRECTIVES))
        .context("failed to build log filter")?;

    // stderr keeps log lines out of the REPL transcript and `--json` output
    let stderr_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .with_writer(std::io::stderr);
    let subscriber = Registry::default().with(filter).with(stderr_log);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install global tracing subscriber")?;

    Ok(())
}
