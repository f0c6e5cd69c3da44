use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr diagnostics subscriber. Level is overridden by `RUST_LOG`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
        tracing::debug!("subscriber installed");
    }
}
