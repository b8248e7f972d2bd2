// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

use crate::ViewKind;

const CONTINENT_PREFIX: &str = "/continent/";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Aggregate,
    Continent(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    Unknown(String),
    MissingContinent,
    InvalidEncoding(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(path) => {
                write!(f, "no route for {path:?}; use / or /continent/<name>")
            }
            Self::MissingContinent => write!(f, "continent route needs a name: /continent/<name>"),
            Self::InvalidEncoding(segment) => {
                write!(f, "continent segment {segment:?} is not valid UTF-8 once decoded")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl Route {
    /// Matches the path part only; a `?query` or `#fragment` is ignored.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if path.is_empty() || path == "/" {
            return Ok(Self::Aggregate);
        }

        let Some(rest) = path.strip_prefix(CONTINENT_PREFIX) else {
            return Err(RouteError::Unknown(path.to_owned()));
        };
        let segment = rest.strip_suffix('/').unwrap_or(rest);
        if segment.is_empty() {
            return Err(RouteError::MissingContinent);
        }
        if segment.contains('/') {
            return Err(RouteError::Unknown(path.to_owned()));
        }

        let name = urlencoding::decode(segment)
            .map_err(|_| RouteError::InvalidEncoding(segment.to_owned()))?;
        Ok(Self::Continent(name.into_owned()))
    }

    pub fn path(&self) -> String {
        match self {
            Self::Aggregate => "/".to_owned(),
            Self::Continent(name) => format!("{CONTINENT_PREFIX}{}", urlencoding::encode(name)),
        }
    }

    pub fn view_kind(&self) -> ViewKind {
        match self {
            Self::Aggregate => ViewKind::Aggregate,
            Self::Continent(name) => ViewKind::Continent(name.clone()),
        }
    }

    pub fn continent(&self) -> Option<&str> {
        match self {
            Self::Aggregate => None,
            Self::Continent(name) => Some(name),
        }
    }

    /// Whether a menu entry for `continent` should render as active.
    pub fn is_highlighted(&self, continent: &str) -> bool {
        self.continent() == Some(continent)
    }

    pub const fn is_aggregate(&self) -> bool {
        matches!(self, Self::Aggregate)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
