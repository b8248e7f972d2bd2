// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// Group label used for countries whose region is empty.
pub const UNKNOWN_CONTINENT: &str = "Unknown";

/// Legend label shown under every chart.
pub const CHART_LEGEND: &str = "Population";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    /// Free-text region from the dataset; empty when the source omits it.
    pub region: String,
    pub population: u64,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, region: impl Into<String>, population: u64) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            population,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentSummary {
    pub continent: String,
    pub population: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInContinent {
    pub name: String,
    pub population: u64,
}

/// One bar: what every view hands to the chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: u64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl From<ContinentSummary> for ChartPoint {
    fn from(summary: ContinentSummary) -> Self {
        Self {
            label: summary.continent,
            value: summary.population,
        }
    }
}

impl From<CountryInContinent> for ChartPoint {
    fn from(country: CountryInContinent) -> Self {
        Self {
            label: country.name,
            value: country.population,
        }
    }
}
