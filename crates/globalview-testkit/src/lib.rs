// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use globalview_app::CountryRecord;
use globalview_source::{DataSource, FetchError};
use serde_json::json;

pub const FIXTURE_ENDPOINT: &str = "fixture://countries";

const FIXTURE_COUNTRIES: [(&str, &str, u64); 42] = [
    ("Germany", "Europe", 83_240_525),
    ("China", "Asia", 1_402_112_000),
    ("Nigeria", "Africa", 206_139_587),
    ("Brazil", "Americas", 212_559_409),
    ("Australia", "Oceania", 25_687_041),
    ("Antarctica", "Antarctic", 1_000),
    ("France", "Europe", 67_391_582),
    ("India", "Asia", 1_380_004_385),
    ("Egypt", "Africa", 102_334_403),
    ("United States", "Americas", 329_484_123),
    ("New Zealand", "Oceania", 5_084_300),
    ("Italy", "Europe", 59_554_023),
    ("Indonesia", "Asia", 273_523_621),
    ("Ethiopia", "Africa", 114_963_583),
    ("Mexico", "Americas", 128_932_753),
    ("Papua New Guinea", "Oceania", 8_947_027),
    ("Spain", "Europe", 47_351_567),
    ("Pakistan", "Asia", 220_892_331),
    ("Kenya", "Africa", 53_771_300),
    ("Canada", "Americas", 38_005_238),
    ("Fiji", "Oceania", 896_444),
    ("Poland", "Europe", 37_950_802),
    ("Japan", "Asia", 125_836_021),
    ("South Africa", "Africa", 59_308_690),
    ("Argentina", "Americas", 45_376_763),
    ("Samoa", "Oceania", 198_410),
    ("Netherlands", "Europe", 16_655_799),
    ("Vietnam", "Asia", 97_338_583),
    ("Morocco", "Africa", 36_910_558),
    ("Colombia", "Americas", 50_882_884),
    ("Tuvalu", "Oceania", 11_792),
    ("Portugal", "Europe", 10_305_564),
    ("Mongolia", "Asia", 3_278_292),
    ("Ghana", "Africa", 31_072_945),
    ("Chile", "Americas", 19_116_209),
    ("Iceland", "Europe", 366_425),
    ("Bhutan", "Asia", 771_612),
    ("Seychelles", "Africa", 98_462),
    ("Jamaica", "Americas", 2_961_161),
    ("Vatican City", "Europe", 451),
    ("Bouvet Island", "Antarctic", 0),
    ("Unclaimed Reef", "", 0),
];

/// A small world: six regions plus one record without a region.
pub fn sample_countries() -> Vec<CountryRecord> {
    FIXTURE_COUNTRIES
        .iter()
        .map(|(name, region, population)| CountryRecord::new(*name, *region, *population))
        .collect()
}

/// JSON body in the shape the countries endpoint returns.
pub fn countries_json(countries: &[CountryRecord]) -> String {
    let entries = countries
        .iter()
        .map(|country| {
            let mut entry = json!({
                "name": { "common": country.name, "official": country.name },
                "population": country.population,
            });
            if !country.region.is_empty() {
                entry["region"] = json!(country.region);
            }
            entry
        })
        .collect::<Vec<_>>();
    serde_json::Value::Array(entries).to_string()
}

/// In-memory source serving a fixed dataset, or a fixed failure.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    countries: Vec<CountryRecord>,
    failure: Option<(u16, String)>,
}

impl FixtureSource {
    pub fn new(countries: Vec<CountryRecord>) -> Self {
        Self {
            countries,
            failure: None,
        }
    }

    pub fn sample() -> Self {
        Self::new(sample_countries())
    }

    pub fn failing(status: u16, body: impl Into<String>) -> Self {
        Self {
            countries: Vec::new(),
            failure: Some((status, body.into())),
        }
    }
}

impl DataSource for FixtureSource {
    fn fetch_countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        match &self.failure {
            Some((status, body)) => Err(FetchError::Status {
                endpoint: FIXTURE_ENDPOINT.to_owned(),
                status: *status,
                body: body.clone(),
            }),
            None => Ok(self.countries.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FixtureSource, countries_json, sample_countries};
    use globalview_app::{continents, summarize_by_continent};
    use globalview_source::{DataSource, decode_countries};

    #[test]
    fn sample_covers_every_region_and_an_unknown_one() {
        let countries = sample_countries();
        assert_eq!(
            continents(&countries),
            vec!["Europe", "Asia", "Africa", "Americas", "Oceania", "Antarctic"]
        );
        assert!(
            summarize_by_continent(&countries)
                .iter()
                .any(|summary| summary.continent == "Unknown")
        );
    }

    #[test]
    fn json_body_decodes_back_to_the_same_records() {
        let countries = sample_countries();
        let decoded = decode_countries(&countries_json(&countries)).expect("fixture should decode");
        assert_eq!(decoded, countries);
    }

    #[test]
    fn failing_fixture_reports_status() {
        let error = FixtureSource::failing(502, "bad gateway")
            .fetch_countries()
            .expect_err("fixture should fail");
        assert!(error.to_string().contains("502: bad gateway"));
        assert_eq!(
            FixtureSource::sample().fetch_countries().map(|c| c.len()).ok(),
            Some(42)
        );
    }
}
