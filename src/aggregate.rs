//! Reduction of a range's raw records into per-dimension metric totals.

use indexmap::IndexMap;
use serde_json::Value;

use crate::platform::{AggregationMode, MetricSpec, RESERVED_FIELDS};
use crate::stats::{AggregatedGroup, MetricValues, RawRecord};

/// Group label for records whose dimension field is missing or null.
pub const MISSING_DIMENSION: &str = "(not set)";

/// Numeric reading of a payload value. Numeric strings count; anything
/// non-finite does not.
pub fn parse_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn dimension_label(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING_DIMENSION.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Metric keys across `records` in first-seen order.
///
/// Skips `date`/`start`/`end`, the dimension key and the platform's label
/// columns by name. Any other key is a metric once some row holds a number
/// for it; keys that only ever carry text or null are dropped.
pub fn discover_metric_keys<'a, I>(
    records: I,
    dimension_key: Option<&str>,
    spec: &MetricSpec,
) -> Vec<String>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut numeric: IndexMap<&'a str, bool> = IndexMap::new();

    for record in records {
        for (key, value) in record {
            let key = key.as_str();
            if RESERVED_FIELDS.contains(&key) || dimension_key == Some(key) || spec.is_label(key) {
                continue;
            }
            let seen = numeric.entry(key).or_default();
            *seen |= parse_number(value).is_some();
        }
    }

    numeric
        .into_iter()
        .filter(|(_, seen)| *seen)
        .map(|(k, _)| k.to_string())
        .collect()
}

#[derive(Default)]
struct Partition {
    count: usize,
    sums: MetricValues,
}

impl Partition {
    fn add_record(&mut self, record: &RawRecord, metric_keys: &[String]) {
        self.count += 1;
        for key in metric_keys {
            let value = record.get(key).and_then(parse_number).unwrap_or(0.0);
            *self.sums.entry(key.clone()).or_insert(0.0) += value;
        }
    }

    fn finish(
        self,
        dimension_value: Option<String>,
        metric_keys: &[String],
        spec: &MetricSpec,
    ) -> AggregatedGroup {
        let metrics = metric_keys
            .iter()
            .map(|key| {
                let sum = self.sums.get(key).copied().unwrap_or(0.0);
                let value = match spec.mode_of(key) {
                    AggregationMode::Sum => sum,
                    AggregationMode::Average if self.count == 0 => 0.0,
                    AggregationMode::Average => sum / self.count as f64,
                };
                (key.clone(), value)
            })
            .collect();

        AggregatedGroup {
            dimension_value,
            metrics,
        }
    }
}

/// Reduces `records` into groups keyed by `dimension_key`, in first-seen
/// order, or into exactly one `None` group when there is no dimension.
pub fn aggregate(
    records: &[RawRecord],
    dimension_key: Option<&str>,
    spec: &MetricSpec,
) -> Vec<AggregatedGroup> {
    let metric_keys = discover_metric_keys(records, dimension_key, spec);
    aggregate_metrics(records, dimension_key, spec, &metric_keys)
}

/// [`aggregate`] over a fixed metric key list; every group carries every key.
pub fn aggregate_metrics(
    records: &[RawRecord],
    dimension_key: Option<&str>,
    spec: &MetricSpec,
    metric_keys: &[String],
) -> Vec<AggregatedGroup> {
    let Some(dimension_key) = dimension_key else {
        let mut all = Partition::default();
        for record in records {
            all.add_record(record, metric_keys);
        }
        return vec![all.finish(None, metric_keys, spec)];
    };

    let mut partitions: IndexMap<String, Partition> = IndexMap::new();
    for record in records {
        partitions
            .entry(dimension_label(record.get(dimension_key)))
            .or_default()
            .add_record(record, metric_keys);
    }

    partitions
        .into_iter()
        .map(|(label, partition)| partition.finish(Some(label), metric_keys, spec))
        .collect()
}

/// Column totals across groups, as plotted for a whole range.
pub fn totals(groups: &[AggregatedGroup], metric_keys: &[String]) -> MetricValues {
    metric_keys
        .iter()
        .map(|key| (key.clone(), groups.iter().map(|g| g.metric(key)).sum()))
        .collect()
}
