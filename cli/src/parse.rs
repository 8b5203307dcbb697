use std::{path::PathBuf, sync::Arc};

use clap::Args;
use serde::Serialize;
use testlink_results::{junit::JunitReportParser, junit::ParsedSuite, LogListener, ReportParser};

use crate::output::write_json;

#[derive(Args, Clone, Debug)]
pub struct ParseArgs {
    #[arg(required = true, help = "JUnit report files to parse.")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ParsedFile {
    path: PathBuf,
    suites: Vec<ParsedSuite>,
}

/// Prints every readable report and exits with `DATAERR` if any file could not be parsed.
pub fn run_parse(parse_args: ParseArgs) -> anyhow::Result<i32> {
    let parser = JunitReportParser::new(Arc::new(LogListener));

    let mut parsed_files = Vec::with_capacity(parse_args.files.len());
    let mut num_unparseable = 0;
    for path in parse_args.files {
        match parser.parse(&path) {
            Ok(suites) => {
                if suites.is_empty() {
                    log::warn!("No test suites found in {}", path.display());
                }
                parsed_files.push(ParsedFile { path, suites });
            }
            Err(e) => {
                log::error!("{:?}", anyhow::Error::from(e));
                num_unparseable += 1;
            }
        }
    }

    write_json(&parsed_files, None)?;

    if num_unparseable == 0 {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
