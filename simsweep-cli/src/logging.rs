use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter level for the given `-v` count, or `error` when quiet
fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging to stderr.
///
/// Stdout carries the progress lines and the result table, so log records
/// never mix with them. `RUST_LOG` takes precedence over the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) -> color_eyre::Result<()> {
    let level = level_for(verbose, quiet);
    let default_filter = format!("simsweep={level},sweep_service={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false),
        )
        .try_init()?;

    tracing::debug!("logging initialized (level={})", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(5, false), "trace");
        assert_eq!(level_for(0, true), "error");
    }
}
