//! Profile Decorator CLI
//!
//! Runs the product counter demo under the profiling decorator and
//! inspects the reports it writes.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

mod commands;

use commands::{display_version, execute_demo, validate_args, validate_report_file, DemoArgs};

/// Profile Decorator - profile callables into report files
#[derive(Parser, Debug)]
#[command(name = "profile-decorator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Profile three product counters and write one report each
    Demo {
        /// Number of products sold
        #[arg(short, long, default_value = "1000000")]
        num: usize,

        /// Seed for product generation
        #[arg(long, default_value = "20")]
        seed: u64,

        /// Directory for the reports (defaults to the current directory)
        #[arg(short, long, env = "PROFILE_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Sort key; repeat to break ties (e.g. --sort calls --sort cumulative)
        #[arg(short, long = "sort", default_value = "cumulative")]
        sort: Vec<String>,

        /// Statistic lines per report
        #[arg(short, long, default_value = "10")]
        lines: usize,

        /// Print every statistic line
        #[arg(long, conflicts_with = "lines")]
        all_lines: bool,

        /// Keep directory prefixes in file names
        #[arg(long)]
        keep_dirs: bool,

        /// Write JSON reports instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a JSON profile report
    Validate {
        /// Path to the report
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Demo {
            num,
            seed,
            output_dir,
            sort,
            lines,
            all_lines,
            keep_dirs,
            json,
        } => {
            let args = DemoArgs {
                num_products: num,
                seed,
                output_dir,
                sort_by: sort,
                lines_to_print: (!all_lines).then_some(lines),
                strip_dirs: !keep_dirs,
                json,
            };

            // Validate args first
            validate_args(&args)?;

            execute_demo(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
