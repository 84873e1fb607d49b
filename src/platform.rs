//! Platform adapters: which field rows group by and how each metric reduces.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::CompareError;

/// Metrics reported by the web-analytics platform as per-row averages.
pub const AVERAGED_WEB_METRICS: [&str; 4] = [
    "avg_engagement_time",
    "avg_engagement_rate",
    "avg_views_per_user",
    "avg_bounce_rate",
];

/// Fields that describe a row rather than measure it.
pub const RESERVED_FIELDS: [&str; 3] = ["date", "start", "end"];

/// Label columns of the flat search-console tables.
pub const SEARCH_LABEL_FIELDS: [&str; 4] = ["query", "page", "country", "device"];

/// Label columns that can appear in web-analytics rows besides the grouping one.
pub const WEB_LABEL_FIELDS: [&str; 5] = [
    "page_path",
    "page_title",
    "source_medium",
    "country",
    "browser",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformId {
    Cdn,
    Search,
    WebAnalytics,
}

impl PlatformId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformId::Cdn => "cdn",
            PlatformId::Search => "search",
            PlatformId::WebAnalytics => "web-analytics",
        }
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformId {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cdn" | "cloudflare" | "cf" => Ok(PlatformId::Cdn),
            "search" | "gsc" => Ok(PlatformId::Search),
            "web-analytics" | "web_analytics" | "ga4" => Ok(PlatformId::WebAnalytics),
            _ => Err(CompareError::UnknownPlatform(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregationMode {
    Sum,
    Average,
}

/// Per-platform metric reduction table. Keys without an entry reduce by sum.
/// Label columns are never metrics, whatever their values look like.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricSpec {
    modes: IndexMap<String, AggregationMode>,
    labels: IndexSet<String>,
}

impl MetricSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, mode: AggregationMode) -> Self {
        self.modes.insert(key.to_string(), mode);
        self
    }

    pub fn with_labels(mut self, keys: &[&str]) -> Self {
        self.labels.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn mode_of(&self, key: &str) -> AggregationMode {
        self.modes.get(key).copied().unwrap_or(AggregationMode::Sum)
    }

    pub fn is_label(&self, key: &str) -> bool {
        self.labels.contains(key)
    }
}

/// Capabilities of one platform for one sub-table, chosen once per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformAdapter {
    Cdn,
    Search,
    WebAnalytics { dimension_key: &'static str },
}

impl PlatformAdapter {
    pub fn for_table(platform: PlatformId, table: &str) -> Self {
        match platform {
            PlatformId::Cdn => PlatformAdapter::Cdn,
            PlatformId::Search => PlatformAdapter::Search,
            PlatformId::WebAnalytics => PlatformAdapter::WebAnalytics {
                dimension_key: web_dimension_key(table),
            },
        }
    }

    pub fn dimension_key(&self) -> Option<&'static str> {
        match *self {
            PlatformAdapter::Cdn | PlatformAdapter::Search => None,
            PlatformAdapter::WebAnalytics { dimension_key } => Some(dimension_key),
        }
    }

    pub fn metric_spec(&self) -> MetricSpec {
        match self {
            PlatformAdapter::Cdn => MetricSpec::new()
                .with("total_page_views", AggregationMode::Sum)
                .with("total_visits", AggregationMode::Sum),
            PlatformAdapter::Search => MetricSpec::new().with_labels(&SEARCH_LABEL_FIELDS),
            PlatformAdapter::WebAnalytics { .. } => AVERAGED_WEB_METRICS
                .iter()
                .fold(MetricSpec::new().with_labels(&WEB_LABEL_FIELDS), |spec, key| {
                    spec.with(key, AggregationMode::Average)
                }),
        }
    }
}

fn web_dimension_key(table: &str) -> &'static str {
    if table.contains("traffic_acquisition") {
        "source_medium"
    } else if table.contains("country_metrics") {
        "country"
    } else if table.contains("browser_metrics") {
        "browser"
    } else {
        "page_path"
    }
}

/// `ga4_top_pages_daily` -> `TOP_PAGES`
pub fn display_title(table: &str) -> String {
    let trimmed = table
        .strip_prefix("ga4_")
        .or_else(|| table.strip_prefix("gsc_"))
        .unwrap_or(table);
    trimmed
        .strip_suffix("_daily")
        .unwrap_or(trimmed)
        .to_uppercase()
}
