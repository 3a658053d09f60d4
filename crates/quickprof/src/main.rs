//! CLI entry point for the quick data profiler.

use clap::Parser;
use clap::error::ErrorKind;
use quickprof::{ReportConfig, ReportPipeline};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Usage: quickprof <data_file>";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Quick data profiling: one HTML report for a CSV or Excel file",
    long_about = "Profiles a tabular dataset and writes a self-contained HTML report.\n\n\
                  Charts are written to ./images, the report to ./report.html. A \
                  report_template.html in the working directory overrides the \
                  bundled template.\n\n\
                  EXAMPLES:\n  \
                  quickprof sales.csv\n  \
                  quickprof survey.xlsx\n  \
                  RUST_LOG=debug quickprof data.csv"
)]
struct Args {
    /// Path to the data file (.csv, .xlsx or .xls)
    #[arg(value_name = "data_file")]
    data_file: PathBuf,
}

/// Initialize the tracing subscriber from `RUST_LOG`, defaulting to `info`.
///
/// Logs go to stderr; stdout only carries the final result line.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            println!("{USAGE}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging();

    let pipeline = match ReportPipeline::builder()
        .config(ReportConfig::default())
        .build()
    {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run(&args.data_file) {
        Ok(outcome) => {
            println!("Report generated: {}", outcome.report_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
