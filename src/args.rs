use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rangecmp",
    about = "Compare two date ranges of web-analytics data and report percent change",
    version,
    long_about = None
)]
pub struct Args {
    /// Source platform: cdn, search or web-analytics (cloudflare, gsc, ga4 also accepted)
    #[arg(short, long)]
    pub platform: String,

    /// First range: today, a number of days, or custom
    #[arg(long, default_value = "custom")]
    pub range1: String,

    /// First range start date (YYYY-MM-DD) for a custom range
    #[arg(long)]
    pub start1: Option<String>,

    /// First range end date (YYYY-MM-DD) for a custom range
    #[arg(long)]
    pub end1: Option<String>,

    /// Second range: today, a number of days, or custom
    #[arg(long, default_value = "custom")]
    pub range2: String,

    /// Second range start date (YYYY-MM-DD) for a custom range
    #[arg(long)]
    pub start2: Option<String>,

    /// Second range end date (YYYY-MM-DD) for a custom range
    #[arg(long)]
    pub end2: Option<String>,

    /// JSON payload fetched for the first range
    #[arg(long)]
    pub input1: PathBuf,

    /// JSON payload fetched for the second range
    #[arg(long)]
    pub input2: PathBuf,

    /// Print the comparison as JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    /// Number of dimension rows to display per table
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
