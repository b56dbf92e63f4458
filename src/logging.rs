//! Tracing setup. The widget owns the terminal, so logs only ever go to a file.

use anyhow::Context;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const COMPONENT: &str = "typeahead";

/// `RUST_LOG` wins; otherwise `default_level` for everything and this crate.
pub fn filter_directive(default_level: &str) -> String {
    format!("{default_level},{COMPONENT}={default_level}")
}

pub fn build_filter(default_level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(filter_directive(default_level))
        .with_context(|| format!("invalid log level `{default_level}`"))
}

/// Appends log records to `log_path`, creating parent directories as needed.
pub fn init_to_file(default_level: &str, log_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter = build_filter(default_level)?;
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(log_file))
        .with_ansi(false);
    #[cfg(debug_assertions)]
    let layer = layer.with_file(true).with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_filter, filter_directive, init_to_file};
    use std::fs;

    #[test]
    fn directive_scopes_level_to_crate() {
        assert_eq!(filter_directive("debug"), "debug,typeahead=debug");
    }

    #[test]
    fn known_levels_build_filters() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            build_filter(level).expect("level should parse");
        }
    }

    #[test]
    fn records_land_in_the_log_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("logs").join("typeahead.log");
        init_to_file("info", &path).expect("logging should initialise");

        tracing::info!("log file smoke test");
        let contents = fs::read_to_string(&path).expect("log file should exist");
        assert!(contents.contains("log file smoke test"));
    }
}
