use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use anyhow::Context;
use serde::Serialize;
use testlink_results::{ExecutionStatus, ResultMap};

/// Pretty JSON to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, serialized + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", serialized)?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub passed: usize,
    pub failed: usize,
    pub blocked: usize,
    pub not_run: usize,
}

impl StatusCounts {
    pub fn from_results<T>(results: &ResultMap<T>) -> Self {
        results
            .values()
            .fold(Self::default(), |mut counts, wrapper| {
                match wrapper.execution_status() {
                    ExecutionStatus::Passed => counts.passed += 1,
                    ExecutionStatus::Failed => counts.failed += 1,
                    ExecutionStatus::Blocked => counts.blocked += 1,
                    ExecutionStatus::NotRun => counts.not_run += 1,
                }
                counts
            })
    }
}

pub fn log_summary<T>(results: &ResultMap<T>) {
    let StatusCounts {
        passed,
        failed,
        blocked,
        not_run,
    } = StatusCounts::from_results(results);
    log::info!(
        "{} test case(s) matched: {} passed, {} failed, {} blocked, {} not run",
        results.len(),
        passed,
        failed,
        blocked,
        not_run
    );
}
