use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use sitegen::{TOOL_NAME, config};

/// Templated static website generator.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Directory holding `config.json`, `templates/` and `static/`.
    input_dir: PathBuf,

    /// Output directory [default: <INPUT_DIR>/html]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print more output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    logger_setup(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{TOOL_NAME} error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let output = cli
        .output
        .unwrap_or_else(|| cli.input_dir.join(config::DEFAULT_OUTPUT_DIR));

    sitegen::build(cli.input_dir, output)?;

    Ok(())
}

fn logger_setup(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG wins over the flag
    env_logger::builder()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
