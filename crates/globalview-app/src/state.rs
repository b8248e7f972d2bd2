// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::mem;

use crate::{CountryRecord, Route, ViewEvent, ViewPhase, ViewState, continents};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Filter,
    Goto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSlot {
    Aggregate,
    DrillDown,
}

impl ViewSlot {
    pub const fn for_route(route: &Route) -> Self {
        match route {
            Route::Aggregate => Self::Aggregate,
            Route::Continent(_) => Self::DrillDown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::DrillDown => "drilldown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    View(ViewSlot),
    Menu,
}

impl FetchTarget {
    pub const fn label(self) -> &'static str {
        match self {
            Self::View(slot) => slot.label(),
            Self::Menu => "menu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded(Vec<CountryRecord>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuState {
    pub continents: Vec<String>,
    pub open: bool,
    pub cursor: usize,
    token: u64,
    loading: bool,
}

impl MenuState {
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<Route> {
        self.continents
            .get(self.cursor)
            .map(|name| Route::Continent(name.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub route: Route,
    pub aggregate: ViewState,
    pub drilldown: ViewState,
    pub menu: MenuState,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            route: Route::Aggregate,
            aggregate: ViewState::default(),
            drilldown: ViewState::default(),
            menu: MenuState::default(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    LoadMenu,
    FetchResolved {
        target: FetchTarget,
        token: u64,
        outcome: FetchOutcome,
    },
    SetFilter(String),
    EnterFilterMode,
    EnterGotoMode,
    ExitToNav,
    ToggleMenu,
    CloseMenu,
    MoveMenuCursor(isize),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    FetchRequested { target: FetchTarget, token: u64 },
    ViewUpdated(ViewSlot),
    StaleFetchDropped { target: FetchTarget, token: u64 },
    FetchFailed { target: FetchTarget, detail: String },
    MenuUpdated(usize),
    ModeChanged(AppMode),
    MenuVisibilityChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::LoadMenu => {
                self.menu.token = self.menu.token.wrapping_add(1);
                self.menu.loading = true;
                vec![AppEvent::FetchRequested {
                    target: FetchTarget::Menu,
                    token: self.menu.token,
                }]
            }
            AppCommand::FetchResolved {
                target,
                token,
                outcome,
            } => self.resolve_fetch(target, token, outcome),
            AppCommand::SetFilter(text) => {
                let slot = self.active_slot();
                self.reduce_view(slot, ViewEvent::FilterChanged(text));
                vec![AppEvent::ViewUpdated(slot)]
            }
            AppCommand::EnterFilterMode => self.enter_mode(AppMode::Filter),
            AppCommand::EnterGotoMode => self.enter_mode(AppMode::Goto),
            AppCommand::ExitToNav => {
                self.mode = AppMode::Nav;
                vec![AppEvent::ModeChanged(self.mode)]
            }
            AppCommand::ToggleMenu => {
                if self.menu.open {
                    return self.close_menu();
                }
                self.menu.open = true;
                self.menu.cursor = self
                    .route
                    .continent()
                    .and_then(|active| self.menu.continents.iter().position(|name| name == active))
                    .unwrap_or(0);
                let mut events = vec![AppEvent::MenuVisibilityChanged(true)];
                if self.menu.continents.is_empty() {
                    let label = if self.menu.loading {
                        "continents loading"
                    } else {
                        "no continents available"
                    };
                    events.push(self.set_status(label));
                }
                events
            }
            AppCommand::CloseMenu => self.close_menu(),
            AppCommand::MoveMenuCursor(delta) => {
                let len = self.menu.continents.len() as isize;
                if len == 0 {
                    return Vec::new();
                }
                let current = self.menu.cursor as isize;
                self.menu.cursor = (current + delta).rem_euclid(len) as usize;
                Vec::new()
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub const fn active_slot(&self) -> ViewSlot {
        ViewSlot::for_route(&self.route)
    }

    pub const fn view(&self, slot: ViewSlot) -> &ViewState {
        match slot {
            ViewSlot::Aggregate => &self.aggregate,
            ViewSlot::DrillDown => &self.drilldown,
        }
    }

    pub const fn active_view(&self) -> &ViewState {
        self.view(self.active_slot())
    }

    fn navigate(&mut self, route: Route) -> Vec<AppEvent> {
        let slot = ViewSlot::for_route(&route);
        let mut events = Vec::new();
        if self.menu.open {
            events.extend(self.close_menu());
        }

        if route == self.route && self.view(slot).phase() != ViewPhase::Idle {
            return events;
        }

        let departing = self.active_slot();
        if departing != slot {
            self.reduce_view(departing, ViewEvent::Unmount);
        }
        if self.mode != AppMode::Nav {
            self.mode = AppMode::Nav;
            events.push(AppEvent::ModeChanged(self.mode));
        }

        self.route = route.clone();
        self.reduce_view(slot, ViewEvent::Activate(route.view_kind()));
        events.push(AppEvent::RouteChanged(route));
        events.push(AppEvent::FetchRequested {
            target: FetchTarget::View(slot),
            token: self.view(slot).token(),
        });
        events
    }

    fn resolve_fetch(
        &mut self,
        target: FetchTarget,
        token: u64,
        outcome: FetchOutcome,
    ) -> Vec<AppEvent> {
        match target {
            FetchTarget::View(slot) => {
                if !self.view(slot).is_awaiting(token) {
                    return vec![AppEvent::StaleFetchDropped { target, token }];
                }
                match outcome {
                    FetchOutcome::Loaded(countries) => {
                        self.reduce_view(slot, ViewEvent::FetchSucceeded { token, countries });
                        vec![AppEvent::ViewUpdated(slot)]
                    }
                    FetchOutcome::Failed(detail) => {
                        self.reduce_view(
                            slot,
                            ViewEvent::FetchFailed {
                                token,
                                detail: detail.clone(),
                            },
                        );
                        vec![
                            AppEvent::ViewUpdated(slot),
                            AppEvent::FetchFailed { target, detail },
                        ]
                    }
                }
            }
            FetchTarget::Menu => {
                if !self.menu.loading || self.menu.token != token {
                    return vec![AppEvent::StaleFetchDropped { target, token }];
                }
                self.menu.loading = false;
                match outcome {
                    FetchOutcome::Loaded(countries) => {
                        self.menu.continents = continents(&countries);
                        self.menu.cursor = 0;
                        vec![AppEvent::MenuUpdated(self.menu.continents.len())]
                    }
                    FetchOutcome::Failed(detail) => vec![AppEvent::FetchFailed { target, detail }],
                }
            }
        }
    }

    fn reduce_view(&mut self, slot: ViewSlot, event: ViewEvent) {
        let view = match slot {
            ViewSlot::Aggregate => &mut self.aggregate,
            ViewSlot::DrillDown => &mut self.drilldown,
        };
        *view = mem::take(view).reduce(event);
    }

    fn enter_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        let mut events = vec![AppEvent::ModeChanged(self.mode)];
        events.extend(self.close_menu());
        events
    }

    fn close_menu(&mut self) -> Vec<AppEvent> {
        if !self.menu.open {
            return Vec::new();
        }
        self.menu.open = false;
        vec![AppEvent::MenuVisibilityChanged(false)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
