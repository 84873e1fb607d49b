use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::platform::PlatformId;
use crate::range::DateRange;

/// One row of a backend payload: field name to string, number or null.
pub type RawRecord = Map<String, Value>;

pub type MetricValues = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedGroup {
    /// `None` only for ungrouped tables.
    pub dimension_value: Option<String>,
    pub metrics: MetricValues,
}

impl AggregatedGroup {
    pub fn zeroed(dimension_value: Option<String>, metric_keys: &[String]) -> Self {
        Self {
            dimension_value,
            metrics: metric_keys.iter().map(|k| (k.clone(), 0.0)).collect(),
        }
    }

    pub fn metric(&self, key: &str) -> f64 {
        self.metrics.get(key).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub dimension_value: Option<String>,
    pub range1: AggregatedGroup,
    pub range2: AggregatedGroup,
    pub percent_change: MetricValues,
    /// `range2 - range1` per metric.
    pub delta: MetricValues,
}

/// Comparison of one named sub-table of a platform payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableComparison {
    pub name: String,
    pub title: String,
    pub dimension_key: Option<String>,
    pub metric_keys: Vec<String>,
    pub range1_totals: MetricValues,
    pub range2_totals: MetricValues,
    pub total_change: MetricValues,
    pub rows: Vec<ComparisonRow>,
}

impl TableComparison {
    pub fn row(&self, dimension_value: Option<&str>) -> Option<&ComparisonRow> {
        self.rows
            .iter()
            .find(|r| r.dimension_value.as_deref() == dimension_value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub platform: PlatformId,
    pub range1: DateRange,
    pub range2: DateRange,
    pub tables: Vec<TableComparison>,
}

impl ComparisonResult {
    pub fn table(&self, name: &str) -> Option<&TableComparison> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Attaches range metadata to already-computed tables.
pub fn assemble(
    platform: PlatformId,
    range1: DateRange,
    range2: DateRange,
    tables: Vec<TableComparison>,
) -> ComparisonResult {
    ComparisonResult {
        platform,
        range1,
        range2,
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_assemble_echoes_ranges() {
        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let r1 = DateRange::new(d("2024-05-01"), d("2024-05-07")).unwrap();
        let r2 = DateRange::new(d("2024-05-08"), d("2024-05-14")).unwrap();
        let result = assemble(PlatformId::Cdn, r1, r2, Vec::new());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["platform"], "cdn");
        assert_eq!(json["range1"]["start"], "2024-05-01");
        assert_eq!(json["range2"]["end"], "2024-05-14");
        assert_eq!(json["tables"], serde_json::json!([]));
    }

    #[test]
    fn test_zeroed_group_and_metric_lookup() {
        let keys = vec!["views".to_string(), "users".to_string()];
        let group = AggregatedGroup::zeroed(Some("/home".to_string()), &keys);
        assert_eq!(group.metrics.len(), 2);
        assert_eq!(group.metric("views"), 0.0);
        assert_eq!(group.metric("missing"), 0.0);
    }
}
