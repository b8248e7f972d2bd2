// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Per-view controller state.
//!
//! A [`ViewState`] moves through `Idle -> Loading -> {Ready, Failed}` and is
//! driven only through [`ViewState::reduce`]. Every activation bumps the
//! token; fetch results carry the token they were requested under and are
//! dropped unless it is still current.

use crate::{ChartPoint, CountryRecord, FilterState, filter_by_continent, summarize_by_continent};

const AGGREGATE_FETCH_ERROR: &str = "could not load country data; try again later";
const CONTINENT_FETCH_ERROR: &str = "could not load continent data; try again later";
const AGGREGATE_EMPTY_NOTICE: &str = "no continents with a population at or above the filter";
const CONTINENT_EMPTY_NOTICE: &str = "no countries match the filter";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewKind {
    #[default]
    Aggregate,
    Continent(String),
}

impl ViewKind {
    pub fn title(&self) -> String {
        match self {
            Self::Aggregate => "Global Population by Continent".to_owned(),
            Self::Continent(name) => format!("Population by Countries in {name}"),
        }
    }

    const fn fetch_error(&self) -> &'static str {
        match self {
            Self::Aggregate => AGGREGATE_FETCH_ERROR,
            Self::Continent(_) => CONTINENT_FETCH_ERROR,
        }
    }

    const fn empty_notice(&self) -> &'static str {
        match self {
            Self::Aggregate => AGGREGATE_EMPTY_NOTICE,
            Self::Continent(_) => CONTINENT_EMPTY_NOTICE,
        }
    }

    fn shape(&self, countries: &[CountryRecord]) -> Vec<ChartPoint> {
        match self {
            Self::Aggregate => summarize_by_continent(countries)
                .into_iter()
                .map(ChartPoint::from)
                .collect(),
            Self::Continent(name) => filter_by_continent(countries, name)
                .into_iter()
                .map(ChartPoint::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Activate(ViewKind),
    FetchSucceeded {
        token: u64,
        countries: Vec<CountryRecord>,
    },
    FetchFailed {
        token: u64,
        detail: String,
    },
    FilterChanged(String),
    Unmount,
}

/// Snapshot of what a view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewResult {
    pub data: Vec<ChartPoint>,
    pub filtered_data: Vec<ChartPoint>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_chart_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    kind: ViewKind,
    phase: ViewPhase,
    token: u64,
    data: Vec<ChartPoint>,
    filtered_data: Vec<ChartPoint>,
    filter: FilterState,
    error: Option<String>,
}

impl ViewState {
    pub fn reduce(mut self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::Activate(kind) => {
                self.kind = kind;
                self.phase = ViewPhase::Loading;
                self.token = self.token.wrapping_add(1);
                self.data.clear();
                self.filtered_data.clear();
                self.error = None;
            }
            ViewEvent::FetchSucceeded { token, countries } => {
                if !self.is_awaiting(token) {
                    return self;
                }
                self.data = self.kind.shape(&countries);
                self.filtered_data = self.filter.apply(&self.data);
                self.phase = ViewPhase::Ready;
            }
            ViewEvent::FetchFailed { token, .. } => {
                if !self.is_awaiting(token) {
                    return self;
                }
                self.data.clear();
                self.filtered_data.clear();
                self.error = Some(self.kind.fetch_error().to_owned());
                self.phase = ViewPhase::Failed;
            }
            ViewEvent::FilterChanged(text) => {
                self.filter = FilterState::new(text);
                if self.phase == ViewPhase::Ready {
                    self.filtered_data = self.filter.apply(&self.data);
                }
            }
            ViewEvent::Unmount => {
                let token = self.token.wrapping_add(1);
                self = Self {
                    token,
                    ..Self::default()
                };
            }
        }
        self
    }

    /// Token of the current activation.
    pub const fn token(&self) -> u64 {
        self.token
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.token == token && self.phase != ViewPhase::Idle
    }

    /// Whether a result for `token` would be committed.
    pub fn is_awaiting(&self, token: u64) -> bool {
        self.phase == ViewPhase::Loading && self.token == token
    }

    pub const fn kind(&self) -> &ViewKind {
        &self.kind
    }

    pub const fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn data(&self) -> &[ChartPoint] {
        &self.data
    }

    pub fn filtered_data(&self) -> &[ChartPoint] {
        &self.filtered_data
    }

    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn filter_text(&self) -> &str {
        &self.filter.text
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ViewPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_chart_visible(&self) -> bool {
        self.phase == ViewPhase::Ready && !self.filtered_data.is_empty()
    }

    /// Informational message for a loaded view with nothing to chart.
    pub fn notice(&self) -> Option<&'static str> {
        (self.phase == ViewPhase::Ready && self.filtered_data.is_empty())
            .then(|| self.kind.empty_notice())
    }

    pub fn result(&self) -> ViewResult {
        ViewResult {
            data: self.data.clone(),
            filtered_data: self.filtered_data.clone(),
            is_loading: self.is_loading(),
            error: self.error.clone(),
            is_chart_visible: self.is_chart_visible(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ViewEvent, ViewKind, ViewPhase, ViewState};
    use crate::{ChartPoint, CountryRecord};

    fn countries() -> Vec<CountryRecord> {
        vec![
            CountryRecord::new("France", "Europe", 10),
            CountryRecord::new("Spain", "Europe", 5),
            CountryRecord::new("Japan", "Asia", 100),
        ]
    }

    fn loaded(kind: ViewKind) -> ViewState {
        let state = ViewState::default().reduce(ViewEvent::Activate(kind));
        let token = state.token();
        state.reduce(ViewEvent::FetchSucceeded {
            token,
            countries: countries(),
        })
    }

    #[test]
    fn default_state_is_idle_and_hidden() {
        let state = ViewState::default();
        assert_eq!(state.phase(), ViewPhase::Idle);
        assert!(!state.is_chart_visible());
        assert!(state.notice().is_none());
    }

    #[test]
    fn activation_enters_loading_with_chart_hidden() {
        let state = ViewState::default().reduce(ViewEvent::Activate(ViewKind::Aggregate));
        assert_eq!(state.phase(), ViewPhase::Loading);
        assert!(state.is_loading());
        assert!(!state.is_chart_visible());
        assert_eq!(state.token(), 1);
    }

    #[test]
    fn aggregate_success_summarizes_by_continent() {
        let state = loaded(ViewKind::Aggregate);
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert_eq!(
            state.data(),
            &[ChartPoint::new("Europe", 15), ChartPoint::new("Asia", 100)]
        );
        assert_eq!(state.filtered_data(), state.data());
        assert!(state.is_chart_visible());
    }

    #[test]
    fn continent_success_filters_by_region() {
        let state = loaded(ViewKind::Continent("Europe".to_owned()));
        assert_eq!(
            state.data(),
            &[ChartPoint::new("France", 10), ChartPoint::new("Spain", 5)]
        );
        assert_eq!(state.kind().title(), "Population by Countries in Europe");
    }

    #[test]
    fn unknown_continent_is_ready_but_empty() {
        let state = loaded(ViewKind::Continent("Atlantis".to_owned()));
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert!(state.data().is_empty());
        assert!(!state.is_chart_visible());
        assert_eq!(state.notice(), Some("no countries match the filter"));
        assert!(state.error().is_none());
    }

    #[test]
    fn failure_hides_chart_and_sets_generic_error() {
        let state = ViewState::default().reduce(ViewEvent::Activate(ViewKind::Aggregate));
        let token = state.token();
        let state = state.reduce(ViewEvent::FetchFailed {
            token,
            detail: "server returned 503".to_owned(),
        });

        assert_eq!(state.phase(), ViewPhase::Failed);
        assert!(!state.is_chart_visible());
        assert!(state.filtered_data().is_empty());
        assert_eq!(
            state.error(),
            Some("could not load country data; try again later")
        );
        assert!(!state.error().unwrap_or_default().contains("503"));

        let result = state.result();
        assert!(!result.is_loading);
        assert!(!result.is_chart_visible);
        assert!(result.filtered_data.is_empty());
    }

    #[test]
    fn filter_change_recomputes_without_refetch() {
        let state = loaded(ViewKind::Aggregate);
        let token = state.token();

        let state = state.reduce(ViewEvent::FilterChanged("50".to_owned()));
        assert_eq!(state.filtered_data(), &[ChartPoint::new("Asia", 100)]);
        assert_eq!(state.data().len(), 2);
        assert_eq!(state.token(), token);
        assert_eq!(state.phase(), ViewPhase::Ready);

        let state = state.reduce(ViewEvent::FilterChanged("1000".to_owned()));
        assert!(state.filtered_data().is_empty());
        assert!(!state.is_chart_visible());
        assert_eq!(
            state.notice(),
            Some("no continents with a population at or above the filter")
        );

        let state = state.reduce(ViewEvent::FilterChanged(String::new()));
        assert_eq!(state.filtered_data(), state.data());
        assert!(state.is_chart_visible());
    }

    #[test]
    fn filter_typed_while_loading_applies_on_arrival() {
        let state = ViewState::default().reduce(ViewEvent::Activate(ViewKind::Aggregate));
        let token = state.token();
        let state = state.reduce(ViewEvent::FilterChanged("20".to_owned()));
        assert!(state.filtered_data().is_empty());

        let state = state.reduce(ViewEvent::FetchSucceeded {
            token,
            countries: countries(),
        });
        assert_eq!(state.filtered_data(), &[ChartPoint::new("Asia", 100)]);
    }

    #[test]
    fn stale_success_is_ignored_after_reactivation() {
        let first = ViewState::default().reduce(ViewEvent::Activate(ViewKind::Continent(
            "Europe".to_owned(),
        )));
        let stale_token = first.token();
        let second = first.reduce(ViewEvent::Activate(ViewKind::Continent("Asia".to_owned())));
        let current_token = second.token();
        assert_ne!(stale_token, current_token);

        let after_stale = second.reduce(ViewEvent::FetchSucceeded {
            token: stale_token,
            countries: countries(),
        });
        assert_eq!(after_stale.phase(), ViewPhase::Loading);
        assert!(after_stale.data().is_empty());

        let after_current = after_stale.reduce(ViewEvent::FetchSucceeded {
            token: current_token,
            countries: countries(),
        });
        assert_eq!(after_current.data(), &[ChartPoint::new("Japan", 100)]);
    }

    #[test]
    fn stale_failure_does_not_overwrite_ready_state() {
        let state = ViewState::default().reduce(ViewEvent::Activate(ViewKind::Aggregate));
        let stale = state.token();
        let state = state.reduce(ViewEvent::Activate(ViewKind::Aggregate));
        let token = state.token();
        let state = state.reduce(ViewEvent::FetchSucceeded {
            token,
            countries: countries(),
        });
        let state = state.reduce(ViewEvent::FetchFailed {
            token: stale,
            detail: "timeout".to_owned(),
        });
        assert_eq!(state.phase(), ViewPhase::Ready);
        assert!(state.error().is_none());
    }

    #[test]
    fn duplicate_result_for_same_activation_is_ignored() {
        let state = loaded(ViewKind::Aggregate);
        let token = state.token();
        let state = state.reduce(ViewEvent::FetchFailed {
            token,
            detail: "late".to_owned(),
        });
        assert_eq!(state.phase(), ViewPhase::Ready);
    }

    #[test]
    fn reactivation_from_failed_clears_error_and_keeps_filter() {
        let state = ViewState::default()
            .reduce(ViewEvent::Activate(ViewKind::Continent("Europe".to_owned())))
            .reduce(ViewEvent::FilterChanged("6".to_owned()));
        let token = state.token();
        let state = state.reduce(ViewEvent::FetchFailed {
            token,
            detail: "dns".to_owned(),
        });
        assert_eq!(
            state.error(),
            Some("could not load continent data; try again later")
        );

        let state = state.reduce(ViewEvent::Activate(ViewKind::Continent("Europe".to_owned())));
        assert!(state.error().is_none());
        assert_eq!(state.filter_text(), "6");

        let token = state.token();
        let state = state.reduce(ViewEvent::FetchSucceeded {
            token,
            countries: countries(),
        });
        assert_eq!(state.filtered_data(), &[ChartPoint::new("France", 10)]);
    }

    #[test]
    fn unmount_resets_state_and_rejects_late_results() {
        let state = ViewState::default()
            .reduce(ViewEvent::Activate(ViewKind::Aggregate))
            .reduce(ViewEvent::FilterChanged("5".to_owned()));
        let token = state.token();

        let state = state.reduce(ViewEvent::Unmount);
        assert_eq!(state.phase(), ViewPhase::Idle);
        assert_eq!(state.filter_text(), "");
        assert!(!state.is_current(token));

        let state = state.reduce(ViewEvent::FetchSucceeded {
            token,
            countries: countries(),
        });
        assert_eq!(state.phase(), ViewPhase::Idle);
        assert!(state.data().is_empty());
    }
}
