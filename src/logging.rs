use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// `--verbose` wins over RUST_LOG; otherwise RUST_LOG, falling back to warnings only
fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("geminiscribe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Initialize tracing with a compact formatter on STDERR, keeping STDOUT
/// free for the conversation with the user.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}
