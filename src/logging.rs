use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` controls filtering and falls back to `info`, e.g.
/// `RUST_LOG=catalog_scraper=debug,reqwest=warn`. With `json` set, each event
/// is one JSON object per line. Fails if a subscriber is already installed.
pub fn init_logging(json: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true);

    let installed = if json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.compact().try_init()
    };
    installed.map_err(anyhow::Error::msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_an_error() {
        init_logging(false).unwrap();
        let err = init_logging(true).unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
