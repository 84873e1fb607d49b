use anyhow::Result;
use clap::Parser;
use tracing::error;

use rangecmp::report::print_comparison_results;
use rangecmp::utils::{setup_logging, validate_args};
use rangecmp::{analyze_comparison, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);
    validate_args(&args)?;

    match analyze_comparison(&args) {
        Ok(result) => print_comparison_results(&result, &args),
        Err(e) => {
            error!(action = "error", component = "main", error = %format!("{:#}", e), "Comparison failed");
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
