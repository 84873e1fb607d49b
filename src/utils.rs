use time::macros::format_description;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "error" }));

    let timer = LocalTime::new(format_description!(
        "[hour]:[minute]:[second].[subsecond digits:3]"
    ));

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .try_init();
}

fn group_thousands(digits: &str) -> String {
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(",")
}

/// Thousands-separated, with two decimals only when the value has a fraction.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return "-".to_string();
    }
    let rounded = format!("{:.2}", num.abs());
    let sign = if num < 0.0 && rounded != "0.00" { "-" } else { "" };
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    if fraction == "00" {
        format!("{}{}", sign, group_thousands(whole))
    } else {
        format!("{}{}.{}", sign, group_thousands(whole), fraction)
    }
}

/// `+12.50%`, `-100.00%`, `0.00%`
pub fn format_percent(change: f64) -> String {
    let sign = if change > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, change)
}

pub fn validate_args(args: &crate::args::Args) -> anyhow::Result<()> {
    if let Some(top) = args.top {
        if top == 0 {
            anyhow::bail!("--top must be greater than 0");
        }
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            anyhow::bail!("--workers must be greater than 0");
        }
    }

    Ok(())
}
