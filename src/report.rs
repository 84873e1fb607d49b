use std::fmt;

use crate::stats::{ComparisonResult, ComparisonRow, TableComparison};
use crate::utils::{format_number, format_percent};
use crate::Args;

/// Text report; `top` caps the dimension rows listed per table.
pub struct Report<'a> {
    pub result: &'a ComparisonResult,
    pub top: Option<usize>,
}

fn write_metric_lines(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    row: &ComparisonRow,
    metric_keys: &[String],
) -> fmt::Result {
    for key in metric_keys {
        writeln!(
            f,
            "{}{}: {} -> {} ({})",
            indent,
            key,
            format_number(row.range1.metric(key)),
            format_number(row.range2.metric(key)),
            format_percent(row.percent_change.get(key).copied().unwrap_or(0.0))
        )?;
    }
    Ok(())
}

fn write_table(
    f: &mut fmt::Formatter<'_>,
    table: &TableComparison,
    top: Option<usize>,
) -> fmt::Result {
    writeln!(f)?;

    if table.metric_keys.is_empty() {
        return writeln!(f, "[{}] No data available.", table.title);
    }

    let Some(dimension_key) = &table.dimension_key else {
        writeln!(f, "[{}]", table.title)?;
        if let Some(row) = table.rows.first() {
            write_metric_lines(f, "  ", row, &table.metric_keys)?;
        }
        return Ok(());
    };

    let shown = top.unwrap_or(table.rows.len()).min(table.rows.len());
    writeln!(
        f,
        "[{}] by {} ({} of {} rows)",
        table.title,
        dimension_key,
        shown,
        table.rows.len()
    )?;
    for row in table.rows.iter().take(shown) {
        writeln!(f, "- {}", row.dimension_value.as_deref().unwrap_or("-"))?;
        write_metric_lines(f, "    ", row, &table.metric_keys)?;
    }

    writeln!(f, "  Totals:")?;
    for key in &table.metric_keys {
        writeln!(
            f,
            "    {}: {} -> {} ({})",
            key,
            format_number(table.range1_totals.get(key).copied().unwrap_or(0.0)),
            format_number(table.range2_totals.get(key).copied().unwrap_or(0.0)),
            format_percent(table.total_change.get(key).copied().unwrap_or(0.0))
        )?;
    }
    Ok(())
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(
            f,
            "--- {} Comparison ---",
            result.platform.as_str().to_uppercase()
        )?;
        writeln!(f, "Range 1: {} ({} days)", result.range1, result.range1.days())?;
        writeln!(f, "Range 2: {} ({} days)", result.range2, result.range2.days())?;

        if result.tables.is_empty() {
            writeln!(f, "\nNo data available for comparison.")?;
        }
        for table in &result.tables {
            write_table(f, table, self.top)?;
        }
        Ok(())
    }
}

pub fn render_report(result: &ComparisonResult, top: Option<usize>) -> String {
    Report { result, top }.to_string()
}

pub fn to_json(result: &ComparisonResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

pub fn print_comparison_results(result: &ComparisonResult, args: &Args) -> anyhow::Result<()> {
    if args.json {
        println!("{}", to_json(result)?);
    } else {
        print!(
            "{}",
            Report {
                result,
                top: args.top
            }
        );
    }
    Ok(())
}
