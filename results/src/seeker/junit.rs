use std::{path::Path, sync::Arc};

use super::{seek_reports, Observation, ResultMap, ResultSeeker, ScanInputs, SeekerConfig};
use crate::{
    catalog::CatalogTestCase,
    error::SeekerError,
    file_set::{FileSetScanner, GlobFileSetScanner},
    junit::{JunitReportParser, ParsedSuite, ParsedTestCase},
    listener::BuildListener,
    status::{suite_notes, suite_status, test_case_notes, test_case_status},
};

/// Matches every JUnit test case against the catalog, keyed per [`SeekerConfig::test_case_key`].
pub struct JunitTestCasesSeeker {
    config: SeekerConfig,
    catalog: Vec<CatalogTestCase>,
    listener: Arc<dyn BuildListener>,
    parser: JunitReportParser,
    scanner: Box<dyn FileSetScanner>,
}

impl JunitTestCasesSeeker {
    pub fn new(
        config: SeekerConfig,
        catalog: Vec<CatalogTestCase>,
        listener: Arc<dyn BuildListener>,
    ) -> Self {
        Self {
            parser: JunitReportParser::new(listener.clone()),
            scanner: Box::new(GlobFileSetScanner),
            config,
            catalog,
            listener,
        }
    }

    pub fn with_scanner<S: FileSetScanner + 'static>(mut self, scanner: S) -> Self {
        self.scanner = Box::new(scanner);
        self
    }

    pub fn config(&self) -> &SeekerConfig {
        &self.config
    }

    fn observe(&self, suite: &ParsedSuite) -> Vec<Observation<ParsedTestCase>> {
        suite
            .test_cases()
            .iter()
            .map(|test_case| Observation {
                key: self.config.test_case_key.key_for(test_case),
                status: test_case_status(test_case),
                notes: test_case_notes(test_case),
                record: test_case.clone(),
            })
            .collect()
    }
}

impl ResultSeeker for JunitTestCasesSeeker {
    type Record = ParsedTestCase;

    fn seek(&self, root: &Path) -> Result<ResultMap<ParsedTestCase>, SeekerError> {
        seek_reports(
            root,
            ScanInputs {
                config: &self.config,
                catalog: &self.catalog,
                scanner: self.scanner.as_ref(),
                listener: self.listener.as_ref(),
            },
            &self.parser,
            |suite| self.observe(suite),
        )
    }
}

/// Matches whole JUnit suites against the catalog by suite name.
pub struct JunitSuitesSeeker {
    config: SeekerConfig,
    catalog: Vec<CatalogTestCase>,
    listener: Arc<dyn BuildListener>,
    parser: JunitReportParser,
    scanner: Box<dyn FileSetScanner>,
}

impl JunitSuitesSeeker {
    pub fn new(
        config: SeekerConfig,
        catalog: Vec<CatalogTestCase>,
        listener: Arc<dyn BuildListener>,
    ) -> Self {
        Self {
            parser: JunitReportParser::new(listener.clone()),
            scanner: Box::new(GlobFileSetScanner),
            config,
            catalog,
            listener,
        }
    }

    pub fn with_scanner<S: FileSetScanner + 'static>(mut self, scanner: S) -> Self {
        self.scanner = Box::new(scanner);
        self
    }
}

impl ResultSeeker for JunitSuitesSeeker {
    type Record = ParsedSuite;

    fn seek(&self, root: &Path) -> Result<ResultMap<ParsedSuite>, SeekerError> {
        seek_reports(
            root,
            ScanInputs {
                config: &self.config,
                catalog: &self.catalog,
                scanner: self.scanner.as_ref(),
                listener: self.listener.as_ref(),
            },
            &self.parser,
            |suite: &ParsedSuite| {
                vec![Observation {
                    key: suite.name.clone(),
                    status: suite_status(suite),
                    notes: suite_notes(suite),
                    record: suite.clone(),
                }]
            },
        )
    }
}
