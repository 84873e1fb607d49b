//! Per-platform comparison: payloads in, [`ComparisonResult`] out.

use anyhow::{Context, Result};
use indexmap::IndexSet;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregate::{aggregate_metrics, discover_metric_keys, totals};
use crate::compare::{compare, percent_changes};
use crate::payload::Payload;
use crate::platform::{display_title, PlatformAdapter, PlatformId};
use crate::range::{resolve_today, DateRange};
use crate::stats::{assemble, ComparisonResult, RawRecord, TableComparison};
use crate::Args;

/// Aggregates and compares one sub-table of both ranges.
pub fn compare_table(
    platform: PlatformId,
    name: &str,
    range1_records: &[RawRecord],
    range2_records: &[RawRecord],
) -> TableComparison {
    let adapter = PlatformAdapter::for_table(platform, name);
    let dimension_key = adapter.dimension_key();
    let spec = adapter.metric_spec();

    let metric_keys = discover_metric_keys(
        range1_records.iter().chain(range2_records),
        dimension_key,
        &spec,
    );

    let groups1 = aggregate_metrics(range1_records, dimension_key, &spec, &metric_keys);
    let groups2 = aggregate_metrics(range2_records, dimension_key, &spec, &metric_keys);

    let range1_totals = totals(&groups1, &metric_keys);
    let range2_totals = totals(&groups2, &metric_keys);
    let total_change = percent_changes(&range1_totals, &range2_totals, &metric_keys);
    let rows = compare(&groups1, &groups2, &metric_keys);

    debug!(
        action = "compare",
        component = "table",
        table = name,
        dimension_key = dimension_key.unwrap_or("-"),
        metric_count = metric_keys.len(),
        range1_groups = groups1.len(),
        range2_groups = groups2.len(),
        row_count = rows.len(),
        "Compared table"
    );

    TableComparison {
        name: name.to_string(),
        title: display_title(name),
        dimension_key: dimension_key.map(str::to_string),
        metric_keys,
        range1_totals,
        range2_totals,
        total_change,
        rows,
    }
}

/// Compares every sub-table present in either payload, in first-seen order.
pub fn compare_platform(
    platform: PlatformId,
    range1: DateRange,
    range2: DateRange,
    payload1: &Payload,
    payload2: &Payload,
    max_workers: Option<usize>,
) -> Result<ComparisonResult> {
    let start_time = Instant::now();

    let names: Vec<&str> = payload1
        .tables
        .keys()
        .chain(payload2.tables.keys())
        .map(String::as_str)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect();

    let max_workers = max_workers.unwrap_or_else(|| {
        let cpu_count = num_cpus::get();
        std::cmp::min(cpu_count, 8)
    });

    info!(
        action = "start",
        component = "comparison",
        platform = %platform,
        table_count = names.len(),
        worker_count = max_workers,
        "Starting comparison"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_workers)
        .build()
        .context("Failed to build comparison worker pool")?;

    let tables: Vec<TableComparison> = pool.install(|| {
        names
            .par_iter()
            .map(|name| {
                compare_table(
                    platform,
                    name,
                    payload1.records(name),
                    payload2.records(name),
                )
            })
            .collect()
    });

    info!(
        action = "complete",
        component = "comparison",
        platform = %platform,
        row_count = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
        duration_ms = start_time.elapsed().as_millis(),
        "Comparison completed"
    );

    Ok(assemble(platform, range1, range2, tables))
}

/// Resolves ranges, loads both payload files and compares them.
pub fn analyze_comparison(args: &Args) -> Result<ComparisonResult> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "analysis", "Starting range comparison");

    let platform: PlatformId = args.platform.parse()?;

    let range1 = resolve_today(
        &args.range1,
        args.start1.as_deref(),
        args.end1.as_deref(),
        platform,
    )
    .context("Failed to resolve range 1")?;
    let range2 = resolve_today(
        &args.range2,
        args.start2.as_deref(),
        args.end2.as_deref(),
        platform,
    )
    .context("Failed to resolve range 2")?;

    let payload1 = Payload::from_file(platform, &args.input1)?;
    let payload2 = Payload::from_file(platform, &args.input2)?;

    let result = compare_platform(
        platform,
        range1,
        range2,
        &payload1,
        &payload2,
        args.workers,
    )?;

    info!(
        action = "complete",
        component = "analysis",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Analysis completed successfully"
    );

    Ok(result)
}
