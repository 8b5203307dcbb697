use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::{Args, ValueEnum};
use testlink_results::{
    CatalogTestCase, JunitSuitesSeeker, JunitTestCasesSeeker, LogListener, ResultSeeker,
    SeekerConfig, TestCaseKey,
};

use crate::output::{log_summary, write_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeekBy {
    /// Match each test case against the catalog.
    TestCases,
    /// Match each test suite by its name.
    Suites,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyArg {
    QualifiedName,
    ClassName,
    Name,
}

impl From<KeyArg> for TestCaseKey {
    fn from(key: KeyArg) -> Self {
        match key {
            KeyArg::QualifiedName => TestCaseKey::QualifiedName,
            KeyArg::ClassName => TestCaseKey::ClassName,
            KeyArg::Name => TestCaseKey::Name,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct SeekArgs {
    #[arg(
        long,
        env = "TESTLINK_RESULTS_ROOT",
        help = "Directory to scan for test reports."
    )]
    pub root: PathBuf,
    #[arg(
        long,
        env = "TESTLINK_INCLUDES",
        default_value = "**/TEST-*.xml",
        help = "Comma-separated list of glob patterns, relative to the root directory."
    )]
    pub includes: String,
    #[arg(
        long,
        env = "TESTLINK_CATALOG",
        help = "JSON file listing the catalog test cases and their custom fields."
    )]
    pub catalog: PathBuf,
    #[arg(
        long,
        env = "TESTLINK_KEY_CUSTOM_FIELD",
        help = "Name of the custom field holding each test case's key."
    )]
    pub key_custom_field: String,
    #[arg(long, value_enum, default_value_t = SeekBy::TestCases, help = "What to match against the catalog.")]
    pub by: SeekBy,
    #[arg(long, value_enum, default_value_t = KeyArg::QualifiedName, help = "Key computed for each test case.")]
    pub key: KeyArg,
    #[arg(long, help = "Write the results to this file instead of stdout.")]
    pub output: Option<PathBuf>,
}

pub fn read_catalog(path: &PathBuf) -> anyhow::Result<Vec<CatalogTestCase>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))
}

pub fn run_seek(seek_args: SeekArgs) -> anyhow::Result<i32> {
    let SeekArgs {
        root,
        includes,
        catalog,
        key_custom_field,
        by,
        key,
        output,
    } = seek_args;

    if key_custom_field.trim().is_empty() {
        log::error!("A key custom field name is required.");
        return Ok(exitcode::USAGE);
    }

    let catalog = read_catalog(&catalog)?;
    log::info!("Loaded {} catalog test case(s)", catalog.len());

    let config = SeekerConfig::new(includes, key_custom_field).with_test_case_key(key.into());
    let listener = Arc::new(LogListener);

    match by {
        SeekBy::TestCases => {
            let results = JunitTestCasesSeeker::new(config, catalog, listener)
                .seek(&root)
                .context("Failed to seek test results")?;
            log_summary(&results);
            write_json(&results, output.as_deref())?;
        }
        SeekBy::Suites => {
            let results = JunitSuitesSeeker::new(config, catalog, listener)
                .seek(&root)
                .context("Failed to seek test results")?;
            log_summary(&results);
            write_json(&results, output.as_deref())?;
        }
    }

    Ok(exitcode::OK)
}
