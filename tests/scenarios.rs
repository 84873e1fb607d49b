//! End-to-end comparisons for each platform.

mod common;

use common::{date_range, payload, records};
use rangecmp::aggregate::aggregate;
use rangecmp::range::resolve;
use rangecmp::{compare, compare_platform, percent_change, CompareError, PlatformAdapter, PlatformId};
use serde_json::json;

#[test]
fn test_cdn_page_views_up_half_visits_flat() {
    let result = compare_platform(
        PlatformId::Cdn,
        date_range("2024-05-01", "2024-05-07"),
        date_range("2024-05-08", "2024-05-14"),
        &payload(PlatformId::Cdn, json!([{"total_page_views": 100, "total_visits": 50}])),
        &payload(PlatformId::Cdn, json!([{"total_page_views": 150, "total_visits": 50}])),
        None,
    )
    .expect("comparison should succeed");

    assert_eq!(result.tables.len(), 1);
    let summary = &result.tables[0];
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].dimension_value, None);
    assert_eq!(summary.rows[0].percent_change["total_page_views"], 50.0);
    assert_eq!(summary.rows[0].percent_change["total_visits"], 0.0);
    assert_eq!(result.range1, date_range("2024-05-01", "2024-05-07"));
    assert_eq!(result.range2, date_range("2024-05-08", "2024-05-14"));
}

#[test]
fn test_web_analytics_page_only_in_one_range() {
    let result = compare_platform(
        PlatformId::WebAnalytics,
        date_range("2024-04-01", "2024-04-30"),
        date_range("2024-05-01", "2024-05-31"),
        &payload(
            PlatformId::WebAnalytics,
            json!({"ga4_top_pages_daily": [{"page_path": "/home", "views": 100}]}),
        ),
        &payload(
            PlatformId::WebAnalytics,
            json!({"ga4_top_pages_daily": [{"page_path": "/about", "views": 20}]}),
        ),
        Some(2),
    )
    .unwrap();

    let pages = result.table("ga4_top_pages_daily").unwrap();
    assert_eq!(pages.rows.len(), 2);

    let home = pages.row(Some("/home")).unwrap();
    assert_eq!(home.range2.metric("views"), 0.0);
    assert_eq!(home.percent_change["views"], -100.0);

    let about = pages.row(Some("/about")).unwrap();
    assert_eq!(about.range1.metric("views"), 0.0);
    assert_eq!(about.percent_change["views"], 100.0);
}

#[test]
fn test_average_engagement_time_is_averaged() {
    let adapter = PlatformAdapter::for_table(PlatformId::WebAnalytics, "ga4_top_pages_daily");
    let rows = records(json!([
        {"date": "2024-05-01", "page_path": "/", "avg_engagement_time": 30},
        {"date": "2024-05-02", "page_path": "/", "avg_engagement_time": 60},
        {"date": "2024-05-03", "page_path": "/", "avg_engagement_time": 90}
    ]));
    let groups = aggregate(&rows, adapter.dimension_key(), &adapter.metric_spec());
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].metric("avg_engagement_time"), 60.0);
}

#[test]
fn test_inverted_custom_range_is_invalid() {
    let today = rangecmp::range::parse_iso_date("2024-06-01").unwrap();
    let err = resolve(
        "custom",
        Some("2024-05-10"),
        Some("2024-05-01"),
        PlatformId::WebAnalytics,
        today,
    )
    .unwrap_err();
    assert!(matches!(err, CompareError::InvalidRange(_)));
}

#[test]
fn test_unknown_platform_is_rejected() {
    let err = "adobe".parse::<PlatformId>().unwrap_err();
    assert_eq!(err, CompareError::UnknownPlatform("adobe".to_string()));
    assert_eq!(err.to_string(), "Unknown platform: adobe");
}

#[test]
fn test_percent_change_edge_cases() {
    assert_eq!(percent_change(0.0, 0.0), 0.0);
    assert_eq!(percent_change(5.0, 0.0), -100.0);
    assert_eq!(percent_change(0.0, 5.0), 100.0);
}

#[test]
fn test_country_table_with_missing_dimension_and_mixed_values() {
    let adapter = PlatformAdapter::for_table(PlatformId::WebAnalytics, "ga4_country_metrics_daily");
    let spec = adapter.metric_spec();
    let key = adapter.dimension_key();

    let r1 = aggregate(
        &records(json!([
            {"country": "India", "total_active_users": "12", "avg_engagement_rate": 0.5},
            {"country": null, "total_active_users": 3, "avg_engagement_rate": "n/a"}
        ])),
        key,
        &spec,
    );
    let r2 = aggregate(
        &records(json!([
            {"country": "India", "total_active_users": 18, "avg_engagement_rate": 0.25},
            {"country": "India", "total_active_users": 0, "avg_engagement_rate": 0.75}
        ])),
        key,
        &spec,
    );
    let metric_keys = vec!["total_active_users".to_string(), "avg_engagement_rate".to_string()];
    let rows = compare(&r1, &r2, &metric_keys);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].dimension_value.as_deref(), Some("India"));
    assert_eq!(rows[0].percent_change["total_active_users"], 50.0);
    assert_eq!(rows[0].percent_change["avg_engagement_rate"], 0.0);
    assert_eq!(rows[1].dimension_value.as_deref(), Some("(not set)"));
    assert_eq!(rows[1].range1.metric("avg_engagement_rate"), 0.0);
    assert_eq!(rows[1].percent_change["total_active_users"], -100.0);
}

#[test]
fn test_search_lag_only_for_relative_ranges() {
    let today = rangecmp::range::parse_iso_date("2024-06-10").unwrap();
    let relative = resolve("7", None, None, PlatformId::Search, today).unwrap();
    assert_eq!(relative, date_range("2024-06-01", "2024-06-07"));

    let custom = resolve(
        "custom",
        Some("2024-06-04"),
        Some("2024-06-10"),
        PlatformId::Search,
        today,
    )
    .unwrap();
    assert_eq!(custom, date_range("2024-06-04", "2024-06-10"));
}
