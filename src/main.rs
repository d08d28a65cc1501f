#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # rawgrades
//!
//! Converts a raw grade report (and optionally a partner roster) into a CSV
//! that Canvas accepts for gradebook import.
//!
//! ```text
//! rawgrades convert --config project4.json
//! ```
//!
//! See [`rawgrades::config::Config`] for the keys the JSON file accepts.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use rawgrades::{Config, Summary, constants::LOG_ENV_VAR, pipeline};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

/// Arguments shared by every subcommand that runs the pipeline.
#[derive(Debug, Clone)]
struct RunArgs {
    /// Path to the JSON config file
    config: PathBuf,
    /// Print the summary as JSON instead of a table
    json:   bool,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Convert and write the Canvas file
    Convert {
        /// Common arguments
        args:   RunArgs,
        /// Overrides `output_file` from the config
        output: Option<PathBuf>,
    },
    /// Parse and merge only, then print the summary without writing
    Check(RunArgs),
}

/// Parsed command line.
#[derive(Debug, Clone)]
struct Options {
    /// Log at DEBUG
    verbose: bool,
    /// Log errors only
    quiet:   bool,
    /// What to do
    cmd:     Cmd,
}

/// Parse the command line arguments and return an `Options` struct
fn options() -> Options {
    /// parses the config path and output style
    fn run_args() -> impl Parser<RunArgs> {
        let config = short('c')
            .long("config")
            .help("Path to JSON configuration file (e.g. config.json)")
            .argument::<PathBuf>("PATH");
        let json = long("json")
            .help("Print the summary as JSON")
            .switch();
        construct!(RunArgs { config, json })
    }

    let args = run_args();
    let output = short('o')
        .long("output")
        .help("Write the Canvas file here instead of the configured output_file")
        .argument::<PathBuf>("PATH")
        .optional();
    let convert = construct!(Cmd::Convert { args, output })
    .to_options()
    .command("convert")
    .help("Convert raw grades to a Canvas import CSV");

    let check = construct!(Cmd::Check(run_args()))
        .to_options()
        .command("check")
        .help("Validate inputs and preview the merged grades");

    let verbose = short('v')
        .long("verbose")
        .help("Show debug logs")
        .switch();
    let quiet = short('q')
        .long("quiet")
        .help("Only show errors")
        .switch();
    let cmd = construct!([convert, check]);

    construct!(Options {
        verbose,
        quiet,
        cmd
    })
    .to_options()
    .descr("Convert raw grade files to Canvas approved CSVs!")
    .run()
}

/// Installs the `tracing` subscriber; `RAWGRADES_LOG` wins over the flags.
fn init_tracing(options: &Options) {
    let default_level = if options.verbose {
        "debug"
    } else if options.quiet {
        "error"
    } else {
        "info"
    };
    let filter_layer = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();
}

/// Loads the config named in `args`.
fn load(args: &RunArgs) -> Result<Config> {
    Config::load(&args.config)
        .with_context(|| format!("Could not load config {}", args.config.display()))
}

/// Prints the run summary in the requested style.
fn print_summary(conversion: &pipeline::Conversion, json: bool) -> Result<()> {
    let summary = Summary::new(conversion);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Could not serialize summary")?
        );
    } else {
        println!("{}", summary.render());
    }
    Ok(())
}

/// Executes a parsed command.
fn execute(cmd: Cmd) -> Result<()> {
    match cmd {
        Cmd::Convert { args, output } => {
            let mut config = load(&args)?;
            if let Some(output) = output {
                config.set_output_file(output);
            }

            let conversion = pipeline::run(&config).context("Conversion failed")?;
            print_summary(&conversion, args.json)?;
            conversion.write().context("Conversion failed")?;
        }
        Cmd::Check(args) => {
            let config = load(&args)?;
            let conversion = pipeline::run(&config).context("Check failed")?;
            print_summary(&conversion, args.json)?;
            tracing::info!(
                "Check only, not writing {}",
                conversion.config().output_file().display()
            );
        }
    }

    Ok(())
}

/// Entry point; exits non-zero on any fatal error.
fn main() -> ExitCode {
    dotenv().ok();

    let options = options();
    init_tracing(&options);

    match execute(options.cmd) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
