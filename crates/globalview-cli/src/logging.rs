// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "GLOBALVIEW_LOG";

/// `GLOBALVIEW_LOG` when set and non-blank, otherwise the configured level.
pub fn filter_directive(configured: &str) -> String {
    env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| configured.to_owned())
}

pub fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).with_context(|| {
        format!(
            "invalid log filter {directive:?}; use a level such as info or a directive such as globalview_tui=debug"
        )
    })
}

/// Routes `tracing` output to `path`. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
pub fn init_logging(path: &Path, directive: &str) -> Result<()> {
    let filter = build_filter(directive)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [log].path to a writable location",
                path.display()
            )
        })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()
        .context("install log subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LOG_ENV, build_filter, filter_directive, init_logging};
    use anyhow::Result;

    #[test]
    fn env_override_wins_over_configured_level() {
        // SAFETY: only this test touches GLOBALVIEW_LOG.
        unsafe {
            std::env::set_var(LOG_ENV, "globalview_tui=trace");
        }
        let directive = filter_directive("info");
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::set_var(LOG_ENV, "  ");
        }
        let blank = filter_directive("warn");
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var(LOG_ENV);
        }
        assert_eq!(directive, "globalview_tui=trace");
        assert_eq!(blank, "warn");
    }

    #[test]
    fn bad_directives_are_rejected() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("globalview_source=debug,warn").is_ok());
        let error = build_filter("globalview=loud").expect_err("bad level should fail");
        assert!(error.to_string().contains("invalid log filter"));
    }

    #[test]
    fn events_land_in_the_log_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("nested").join("globalview.log");
        init_logging(&path, "info")?;

        tracing::info!(records = 3, "log file smoke test");
        tracing::debug!("filtered out");

        let written = std::fs::read_to_string(&path)?;
        assert!(written.contains("log file smoke test"));
        assert!(written.contains("records=3"));
        assert!(!written.contains("filtered out"));
        Ok(())
    }
}
