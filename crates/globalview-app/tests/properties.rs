// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use globalview_app::{
    ChartPoint, CountryInContinent, CountryRecord, apply_threshold, filter_by_continent,
    parse_threshold, summarize_by_continent,
};
use proptest::prelude::*;
use proptest::test_runner::Config;
use std::collections::HashSet;

fn region() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("Europe".to_owned()),
        Just("Asia".to_owned()),
        Just("asia".to_owned()),
        Just("Unknown".to_owned()),
        "[A-Za-z ]{1,10}",
    ]
}

fn countries() -> impl Strategy<Value = Vec<CountryRecord>> {
    prop::collection::vec(
        ("[A-Za-z]{1,12}", region(), 0_u64..10_000_000_000_u64),
        0..64,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(name, region, population)| CountryRecord::new(name, region, population))
            .collect()
    })
}

fn points() -> impl Strategy<Value = Vec<ChartPoint>> {
    prop::collection::vec(("[A-Za-z]{1,8}", 0_u64..5_000_000_u64), 0..32).prop_map(|rows| {
        rows.into_iter()
            .map(|(label, value)| ChartPoint::new(label, value))
            .collect()
    })
}

fn filter_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,12}",
        "[ +-]{0,2}[0-9]{1,8}[a-z .]{0,3}",
        "[a-z ]{0,6}[0-9]{0,4}",
    ]
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn summary_conserves_population_for_any_records(countries in countries()) {
        let input_total: u64 = countries.iter().map(|country| country.population).sum();
        let summaries = summarize_by_continent(&countries);
        let output_total: u64 = summaries.iter().map(|summary| summary.population).sum();
        prop_assert_eq!(input_total, output_total);

        let mut seen = HashSet::new();
        for summary in &summaries {
            prop_assert!(!summary.continent.is_empty());
            prop_assert!(seen.insert(summary.continent.clone()));
        }
    }

    #[test]
    fn continent_filter_returns_exactly_matching_records(
        countries in countries(),
        continent in region(),
    ) {
        let filtered = filter_by_continent(&countries, &continent);
        let expected = countries
            .iter()
            .filter(|country| country.region == continent)
            .map(|country| CountryInContinent {
                name: country.name.clone(),
                population: country.population,
            })
            .collect::<Vec<_>>();
        prop_assert_eq!(filtered.len(), expected.len());
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn threshold_is_idempotent_for_any_text(points in points(), text in filter_text()) {
        let once = apply_threshold(&points, &text);
        let twice = apply_threshold(&once, &text);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn threshold_keeps_exactly_values_at_or_above_minimum(
        points in points(),
        text in filter_text(),
    ) {
        let filtered = apply_threshold(&points, &text);
        match parse_threshold(&text) {
            None => prop_assert_eq!(filtered, points),
            Some(minimum) => {
                let expected = points
                    .iter()
                    .filter(|point| i128::from(point.value) >= i128::from(minimum))
                    .cloned()
                    .collect::<Vec<_>>();
                prop_assert_eq!(filtered, expected);
            }
        }
    }
}
