//! Pairing of range1 and range2 groups and per-metric percent change.

use indexmap::IndexMap;

use crate::stats::{AggregatedGroup, ComparisonRow, MetricValues};

/// Percent change from `v1` to `v2`.
///
/// A one-sided zero reads as +100 or -100, both zero as 0, and a non-finite
/// result collapses to 0.
pub fn percent_change(v1: f64, v2: f64) -> f64 {
    let change = match (v1 != 0.0, v2 != 0.0) {
        (true, true) => (v2 - v1) / v1 * 100.0,
        (false, true) => 100.0,
        (true, false) => -100.0,
        (false, false) => 0.0,
    };
    if change.is_finite() {
        change
    } else {
        0.0
    }
}

pub fn percent_changes(
    before: &MetricValues,
    after: &MetricValues,
    metric_keys: &[String],
) -> MetricValues {
    metric_keys
        .iter()
        .map(|key| {
            let v1 = before.get(key).copied().unwrap_or(0.0);
            let v2 = after.get(key).copied().unwrap_or(0.0);
            (key.clone(), percent_change(v1, v2))
        })
        .collect()
}

fn project(
    group: Option<&AggregatedGroup>,
    dimension_value: &Option<String>,
    metric_keys: &[String],
) -> AggregatedGroup {
    match group {
        Some(g) => AggregatedGroup {
            dimension_value: dimension_value.clone(),
            metrics: metric_keys
                .iter()
                .map(|k| (k.clone(), g.metric(k)))
                .collect(),
        },
        None => AggregatedGroup::zeroed(dimension_value.clone(), metric_keys),
    }
}

/// One row per dimension value seen on either side: range1's order first,
/// then values only range2 has. A missing side compares as all zeros.
pub fn compare(
    range1_groups: &[AggregatedGroup],
    range2_groups: &[AggregatedGroup],
    metric_keys: &[String],
) -> Vec<ComparisonRow> {
    let mut sides: IndexMap<Option<String>, (Option<&AggregatedGroup>, Option<&AggregatedGroup>)> =
        IndexMap::new();

    for group in range1_groups {
        let side = sides.entry(group.dimension_value.clone()).or_default();
        side.0.get_or_insert(group);
    }
    for group in range2_groups {
        let side = sides.entry(group.dimension_value.clone()).or_default();
        side.1.get_or_insert(group);
    }

    sides
        .into_iter()
        .map(|(dimension_value, (left, right))| {
            let range1 = project(left, &dimension_value, metric_keys);
            let range2 = project(right, &dimension_value, metric_keys);
            let percent_change = percent_changes(&range1.metrics, &range2.metrics, metric_keys);
            let delta = metric_keys
                .iter()
                .map(|k| (k.clone(), range2.metric(k) - range1.metric(k)))
                .collect();

            ComparisonRow {
                dimension_value,
                range1,
                range2,
                percent_change,
                delta,
            }
        })
        .collect()
}
