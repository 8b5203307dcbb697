use std::io::Write;

use clap::{ArgAction, Parser, Subcommand};
use testlink_results_cli::{
    parse::{run_parse, ParseArgs},
    seek::{run_seek, SeekArgs},
};

#[derive(Debug, Parser)]
#[command(
    version = std::env!("CARGO_PKG_VERSION"),
    name = "testlink-results",
    about = "Match JUnit test reports against a TestLink catalog",
)]
struct Cli {
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity.")]
    verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan a directory for reports and print the per-test-case results
    Seek(SeekArgs),
    /// Parse report files and print the suites found in them
    Parse(ParseArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose)?;

    let exit_code = match run(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            log::error!("Error: {:?}", e);
            exitcode::SOFTWARE
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    log::debug!("Starting testlink-results {}", env!("CARGO_PKG_VERSION"));
    match cli.command {
        Commands::Seek(seek_args) => run_seek(seek_args),
        Commands::Parse(parse_args) => run_parse(parse_args),
    }
}

fn setup_logger(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);
    if let Ok(log) = std::env::var("TESTLINK_LOG") {
        builder.parse_filters(&log);
    }
    builder.try_init()?;
    Ok(())
}
