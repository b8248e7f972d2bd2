// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashMap;

use crate::{ContinentSummary, CountryInContinent, CountryRecord, UNKNOWN_CONTINENT};

/// Sums population per region, in first-seen region order.
pub fn summarize_by_continent(countries: &[CountryRecord]) -> Vec<ContinentSummary> {
    let mut summaries: Vec<ContinentSummary> = Vec::new();
    let mut index_by_region: HashMap<&str, usize> = HashMap::new();

    for country in countries {
        let region = if country.region.is_empty() {
            UNKNOWN_CONTINENT
        } else {
            country.region.as_str()
        };

        match index_by_region.get(region) {
            Some(&index) => {
                let summary = &mut summaries[index];
                summary.population = summary.population.saturating_add(country.population);
            }
            None => {
                index_by_region.insert(region, summaries.len());
                summaries.push(ContinentSummary {
                    continent: region.to_owned(),
                    population: country.population,
                });
            }
        }
    }

    summaries
}

/// Countries whose region is byte-for-byte equal to `continent_name`.
pub fn filter_by_continent(
    countries: &[CountryRecord],
    continent_name: &str,
) -> Vec<CountryInContinent> {
    countries
        .iter()
        .filter(|country| country.region == continent_name)
        .map(|country| CountryInContinent {
            name: country.name.clone(),
            population: country.population,
        })
        .collect()
}

/// Distinct non-empty regions in first-seen order, for the navigation menu.
pub fn continents(countries: &[CountryRecord]) -> Vec<String> {
    let mut seen = Vec::<String>::new();
    for country in countries {
        if country.region.is_empty() || seen.iter().any(|name| *name == country.region) {
            continue;
        }
        seen.push(country.region.clone());
    }
    seen
}
