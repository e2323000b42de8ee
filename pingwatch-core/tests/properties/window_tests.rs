//! Property-based tests for rolling-window statistics and eviction

use std::collections::BTreeSet;

use proptest::prelude::*;

use pingwatch_core::monitoring::{HostSeries, Sample, WindowReport, WindowSpec, nearest_rank};

const NOW: f64 = 10_000.0;

/// Samples with non-decreasing timestamps within the last 20 minutes
fn arb_ordered_samples() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec(
        (0u32..1_200_000, prop::option::weighted(0.8, 1u32..500_000)),
        0..200,
    )
    .prop_map(|raw| {
        let mut raw = raw;
        raw.sort_by_key(|(age, _)| std::cmp::Reverse(*age));
        raw.into_iter()
            .map(|(age_ms, latency)| {
                let timestamp = NOW - f64::from(age_ms) / 1000.0;
                match latency {
                    Some(micros) => Sample::hit(timestamp, f64::from(micros) / 1000.0),
                    None => Sample::miss(timestamp),
                }
            })
            .collect()
    })
}

fn arb_windows() -> impl Strategy<Value = Vec<WindowSpec>> {
    prop::collection::btree_set(1u32..1_500, 1..5).prop_map(|secs| {
        // Shuffle-free but non-sorted order: largest first
        secs.into_iter()
            .rev()
            .map(|s| WindowSpec::from_secs(f64::from(s)))
            .collect()
    })
}

fn largest_window(windows: &[WindowSpec]) -> WindowSpec {
    windows
        .iter()
        .copied()
        .max_by(|a, b| a.secs().total_cmp(&b.secs()))
        .unwrap()
}

/// Hits and misses inside `window` at `now`, counting a repeated
/// (timestamp, kind) pair once since the series overwrites it
fn distinct_within(samples: &[Sample], window: WindowSpec, now: f64) -> (usize, usize) {
    let distinct: BTreeSet<(u64, bool)> = samples
        .iter()
        .filter(|s| window.contains(s.timestamp, now))
        .map(|s| (s.timestamp.to_bits(), s.is_miss()))
        .collect();
    let misses = distinct.iter().filter(|(_, miss)| *miss).count();
    (distinct.len() - misses, misses)
}

fn assert_largest_report(
    reports: &[WindowReport],
    largest: WindowSpec,
    hits: usize,
    misses: usize,
) -> Result<(), TestCaseError> {
    let report = reports.iter().find(|r| r.window == largest).unwrap();
    match report.metrics {
        Some(m) => {
            prop_assert_eq!(m.hit_count, hits);
            prop_assert_eq!(m.miss_count, misses);
        }
        None => prop_assert_eq!(hits, 0),
    }
    Ok(())
}

fn series_of(samples: &[Sample]) -> HostSeries {
    let mut series = HostSeries::new();
    for sample in samples {
        series.record(*sample);
    }
    series
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Reports come back in configured order, one per window
    #[test]
    fn reports_follow_configured_order(
        samples in arb_ordered_samples(),
        windows in arb_windows(),
    ) {
        let mut series = series_of(&samples);
        let reports = series.recompute(NOW, &windows);
        let order: Vec<WindowSpec> = reports.iter().map(|r| r.window).collect();
        prop_assert_eq!(order, windows);
    }

    /// A longer window never holds fewer samples than a shorter one
    #[test]
    fn larger_windows_nest_smaller_ones(
        samples in arb_ordered_samples(),
        windows in arb_windows(),
    ) {
        let mut series = series_of(&samples);
        let reports = series.recompute(NOW, &windows);
        // Windows are largest first, so counts must not increase
        let counts: Vec<(usize, usize)> = reports
            .iter()
            .map(|r| r.metrics.map_or((0, 0), |m| (m.hit_count, m.miss_count)))
            .collect();
        for pair in counts.windows(2) {
            if pair[1].0 > 0 {
                prop_assert!(pair[0].0 >= pair[1].0);
                prop_assert!(pair[0].1 >= pair[1].1);
            }
        }
    }

    /// Percentiles are ordered and the miss rate is a percentage
    #[test]
    fn metrics_are_consistent(
        samples in arb_ordered_samples(),
        windows in arb_windows(),
    ) {
        let mut series = series_of(&samples);
        for report in series.recompute(NOW, &windows) {
            if let Some(m) = report.metrics {
                prop_assert!(m.hit_count > 0);
                prop_assert!(m.min_ms <= m.p50_ms);
                prop_assert!(m.p50_ms <= m.p95_ms);
                prop_assert!(m.p95_ms <= m.max_ms);
                prop_assert!((0.0..100.0).contains(&m.miss_percent));
                let total = (m.hit_count + m.miss_count) as f64;
                prop_assert!((m.miss_percent - m.miss_count as f64 / total * 100.0).abs() < 1e-9);
            }
        }
    }

    /// Eviction drops exactly the samples outside the largest window
    #[test]
    fn eviction_keeps_only_the_largest_window(
        samples in arb_ordered_samples(),
        windows in arb_windows(),
    ) {
        let mut series = series_of(&samples);
        let reports = series.recompute(NOW, &windows);
        let largest = largest_window(&windows);

        for sample in series.live() {
            prop_assert!(largest.contains(sample.timestamp, NOW));
        }
        let (hits, misses) = distinct_within(&samples, largest, NOW);
        prop_assert_eq!(series.len(), hits + misses);
        assert_largest_report(&reports, largest, hits, misses)?;
    }

    /// Sliding `now` forward evicts step by step without losing live samples
    #[test]
    fn sliding_now_tracks_the_largest_window(
        samples in arb_ordered_samples(),
        windows in arb_windows(),
        step_secs in 1u32..120,
    ) {
        let mut series = series_of(&samples);
        let largest = largest_window(&windows);

        for tick in 0..20u32 {
            let now = NOW + f64::from(tick * step_secs);
            let reports = series.recompute(now, &windows);
            let (hits, misses) = distinct_within(&samples, largest, now);
            prop_assert_eq!(series.len(), hits + misses);
            assert_largest_report(&reports, largest, hits, misses)?;
        }
    }

    /// Nearest rank picks `sorted[floor(p / 100 * n)]`, clamped
    #[test]
    fn nearest_rank_matches_definition(
        mut values in prop::collection::vec(0.0f64..10_000.0, 1..100),
        percentile in 0.0f64..=100.0,
    ) {
        values.sort_by(f64::total_cmp);
        let n = values.len();
        let index = ((percentile / 100.0 * n as f64).floor() as usize).min(n - 1);
        prop_assert_eq!(nearest_rank(&values, percentile), Some(values[index]));
    }
}

#[test]
fn test_window_with_only_misses_has_no_metrics() {
    let mut series = series_of(&[Sample::miss(NOW - 1.0), Sample::miss(NOW - 2.0)]);
    let reports = series.recompute(NOW, &[WindowSpec::from_secs(10.0)]);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].metrics.is_none());
}
