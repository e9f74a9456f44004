use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `--debug` forces debug output for this
/// crate; otherwise `RUST_LOG` applies, falling back to info.
pub fn enable_logging(debug: bool) -> Result<()> {
    let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");

    let filter = if debug {
        EnvFilter::new(format!("{}=debug", crate_target))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", crate_target)))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
