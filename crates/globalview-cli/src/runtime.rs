// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use globalview_app::{CountryRecord, FetchOutcome, FetchTarget};
use globalview_source::DataSource;
use globalview_tui::InternalEvent;
use std::sync::mpsc::Sender;
use std::thread;

/// Runs every fetch on its own thread so the UI loop keeps drawing.
pub struct SourceRuntime<S> {
    source: S,
}

impl<S> SourceRuntime<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S> globalview_tui::AppRuntime for SourceRuntime<S>
where
    S: DataSource + Clone + Send + 'static,
{
    fn fetch_countries(&mut self) -> Result<Vec<CountryRecord>> {
        Ok(self.source.fetch_countries()?)
    }

    fn spawn_fetch(
        &mut self,
        target: FetchTarget,
        token: u64,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let source = self.source.clone();
        thread::Builder::new()
            .name(format!("fetch-{}", target.label()))
            .spawn(move || {
                let outcome = match source.fetch_countries() {
                    Ok(countries) => {
                        tracing::info!(
                            fetch = target.label(),
                            token,
                            records = countries.len(),
                            "fetch succeeded"
                        );
                        FetchOutcome::Loaded(countries)
                    }
                    Err(error) => FetchOutcome::Failed(error.to_string()),
                };
                // The receiver is gone once the UI has quit.
                let _ = tx.send(InternalEvent::Fetch {
                    target,
                    token,
                    outcome,
                });
            })
            .context("spawn fetch thread")?;
        Ok(())
    }
}
