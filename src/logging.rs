use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. Per-call `debug` lines from the
/// filesystem primitives stay behind `RUST_LOG=debug`.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

/// Install the global `tracing` subscriber, writing to stderr so it never
/// interleaves with the pass/fail lines on stdout.
///
/// `RUST_LOG` takes precedence over the verbose flag. Calling this twice is
/// harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
