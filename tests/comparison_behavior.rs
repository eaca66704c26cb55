//! Behavior of the normalized comparison views.

use ashare_tests::{
    build_views, fetch_batch, normalize, provider_table, scenario_range, symbols, Adjustment,
    MarketCode, NoopPacer, Normalized, ReplayAdapter, TickerSymbol,
};

fn result_set_for(tables: &[(&str, ashare_core::RawTable)]) -> ashare_core::ResultSet {
    let mut adapter = ReplayAdapter::new();
    for (code, table) in tables {
        adapter = adapter.with_table(MarketCode::Shanghai, code, table.clone());
    }
    let tickers = symbols(&tables.iter().map(|(code, _)| *code).collect::<Vec<_>>());

    fetch_batch(
        &adapter,
        &tickers,
        &scenario_range(),
        Adjustment::default(),
        &NoopPacer,
    )
    .results
}

#[test]
fn every_included_price_series_starts_at_exactly_one() {
    let results = result_set_for(&[
        (
            "600519",
            provider_table(&[("2022-01-04", 100.0, 10), ("2022-01-05", 110.0, 20)]),
        ),
        (
            "000858",
            provider_table(&[("2022-01-04", 55.5, 10), ("2022-01-05", 44.4, 20)]),
        ),
    ]);

    let views = build_views(&results);
    for normalized in views.price.values() {
        assert_eq!(normalized.first_value(), Some(1.0));
    }
}

#[test]
fn every_included_volume_series_peaks_at_exactly_one_within_the_unit_interval() {
    let results = result_set_for(&[(
        "600519",
        provider_table(&[
            ("2022-01-04", 10.0, 500),
            ("2022-01-05", 11.0, 2_000),
            ("2022-01-06", 12.0, 1_250),
        ]),
    )]);

    let views = build_views(&results);
    let normalized = views.volume.get("600519").expect("must be included");

    let max = normalized
        .points
        .iter()
        .map(|point| point.value)
        .fold(f64::MIN, f64::max);
    assert_eq!(max, 1.0);
    assert!(normalized
        .points
        .iter()
        .all(|point| (0.0..=1.0).contains(&point.value)));
}

#[test]
fn degenerate_bases_are_flagged_and_excluded_without_dividing_by_zero() {
    let zero_close = provider_table(&[("2022-01-04", 0.0, 100), ("2022-01-05", 1.0, 200)]);
    let zero_volume = provider_table(&[("2022-01-04", 10.0, 0), ("2022-01-05", 11.0, 0)]);
    let results = result_set_for(&[("600519", zero_close), ("000858", zero_volume)]);

    let views = build_views(&results);

    // The zero-close ticker keeps its volume view; the zero-volume ticker
    // keeps its price view; both are flagged once.
    assert!(!views.price.contains_key("600519"));
    assert!(views.volume.contains_key("600519"));
    assert!(views.price.contains_key("000858"));
    assert!(!views.volume.contains_key("000858"));
    assert_eq!(views.excluded.len(), 2);
}

#[test]
fn normalization_of_the_scenario_series_brackets_the_period_return() {
    let table = provider_table(&[
        ("2022-01-04", 100.0, 1_000),
        ("2022-01-05", 102.0, 1_500),
        ("2022-01-06", 101.0, 900),
        ("2022-01-07", 105.0, 2_000),
        ("2022-01-10", 110.0, 1_800),
    ]);
    let symbol = TickerSymbol::parse("600519").expect("symbol must parse");
    let Normalized::Series(series) = normalize(&symbol, &table).expect("must normalize") else {
        panic!("expected a series");
    };

    let mut results = ashare_core::ResultSet::default();
    results.insert(symbol, series);
    let views = build_views(&results);

    let normalized = views.price.get("600519").expect("must be included");
    assert_eq!(normalized.first_value(), Some(1.0));
    assert_eq!(normalized.last_value(), Some(1.10));
}
