use std::{
    collections::HashSet,
    path::{Component, Path, PathBuf},
};

use glob::{glob_with, MatchOptions, Pattern, PatternError};

use crate::error::ScanError;

/// Enumerates report files under a root directory.
///
/// Returned paths are relative to `root`. Their order is the visitation order of the scan,
/// which decides the last-seen tie-breaks when results are merged.
pub trait FileSetScanner {
    fn scan(&self, root: &Path, includes: &str) -> Result<Vec<PathBuf>, ScanError>;
}

/// Comma-separated glob patterns, resolved against the root directory.
///
/// Patterns are visited in the order given and each pattern's matches come back in
/// alphabetical order. A file matched by several patterns is listed once, at its first match.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobFileSetScanner;

impl FileSetScanner for GlobFileSetScanner {
    fn scan(&self, root: &Path, includes: &str) -> Result<Vec<PathBuf>, ScanError> {
        if !root.exists() {
            return Err(ScanError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }
        // glob drops a leading `./` from what it yields, so match against the root without it.
        let root = normalize_root(root);
        let root_str = root
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Root(root.clone()))?;
        let escaped_root = Pattern::escape(root_str);

        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();
        for include in split_includes(includes) {
            if Path::new(include).has_root() {
                return Err(ScanError::Pattern {
                    pattern: String::from(include),
                    source: PatternError {
                        pos: 0,
                        msg: "include patterns must be relative to the root directory",
                    },
                });
            }
            let pattern = Path::new(&escaped_root).join(include);
            let entries = glob_with(&pattern.to_string_lossy(), options).map_err(|source| {
                ScanError::Pattern {
                    pattern: String::from(include),
                    source,
                }
            })?;
            for entry in entries {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }
                let relative = path
                    .strip_prefix(&root)
                    .map_err(|_| ScanError::OutsideRoot(path.clone()))?
                    .to_path_buf();
                if seen.insert(relative.clone()) {
                    paths.push(relative);
                }
            }
        }

        Ok(paths)
    }
}

fn normalize_root(root: &Path) -> PathBuf {
    root.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Trimmed, non-blank tokens of a comma-separated include expression.
pub fn split_includes(includes: &str) -> impl Iterator<Item = &str> {
    includes
        .split(',')
        .map(str::trim)
        .filter(|include| !include.is_empty())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "<testsuite/>").unwrap();
    }

    #[test]
    fn splits_and_trims_includes() {
        let includes: Vec<_> = split_includes(" TEST-*.xml, ,**/junit/*.xml,").collect();
        assert_eq!(includes, ["TEST-*.xml", "**/junit/*.xml"]);
        assert_eq!(split_includes("   ").count(), 0);
    }

    #[test]
    fn matches_relative_to_root_in_order() {
        let temp_dir = tempdir().unwrap();
        touch(temp_dir.path(), "TEST-b.xml");
        touch(temp_dir.path(), "TEST-a.xml");
        touch(temp_dir.path(), "other.xml");
        touch(temp_dir.path(), "nested/TEST-c.xml");

        let paths = GlobFileSetScanner
            .scan(temp_dir.path(), "TEST-*.xml")
            .unwrap();
        assert_eq!(paths, [PathBuf::from("TEST-a.xml"), PathBuf::from("TEST-b.xml")]);

        let paths = GlobFileSetScanner
            .scan(temp_dir.path(), "**/TEST-c.xml, TEST-*.xml")
            .unwrap();
        assert_eq!(
            paths,
            [
                PathBuf::from("nested/TEST-c.xml"),
                PathBuf::from("TEST-a.xml"),
                PathBuf::from("TEST-b.xml"),
            ]
        );
    }

    #[test]
    fn overlapping_patterns_list_file_once() {
        let temp_dir = tempdir().unwrap();
        touch(temp_dir.path(), "TEST-a.xml");

        let paths = GlobFileSetScanner
            .scan(temp_dir.path(), "TEST-*.xml,*.xml")
            .unwrap();
        assert_eq!(paths, [PathBuf::from("TEST-a.xml")]);
    }

    #[test]
    fn directories_are_skipped() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("TEST-dir.xml")).unwrap();
        assert!(GlobFileSetScanner
            .scan(temp_dir.path(), "TEST-*.xml")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn blank_includes_match_nothing() {
        let temp_dir = tempdir().unwrap();
        touch(temp_dir.path(), "TEST-a.xml");
        assert!(GlobFileSetScanner.scan(temp_dir.path(), "").unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            GlobFileSetScanner.scan(&missing, "*.xml"),
            Err(ScanError::RootNotFound(_))
        ));
    }

    #[test]
    fn current_dir_prefixed_root() {
        let temp_dir = tempfile::Builder::new()
            .prefix("scan-")
            .tempdir_in(".")
            .unwrap();
        let root = Path::new(".").join(temp_dir.path().file_name().unwrap());
        touch(&root, "TEST-a.xml");
        touch(&root, "nested/TEST-b.xml");

        let paths = GlobFileSetScanner
            .scan(&root, "TEST-*.xml, nested/TEST-*.xml")
            .unwrap();
        assert_eq!(
            paths,
            [PathBuf::from("TEST-a.xml"), PathBuf::from("nested/TEST-b.xml")]
        );
        assert!(paths.iter().all(|path| root.join(path).is_file()));
    }

    #[test]
    fn normalizes_leading_current_dir() {
        assert_eq!(normalize_root(Path::new("./reports")), PathBuf::from("reports"));
        assert_eq!(normalize_root(Path::new("./a/./b")), PathBuf::from("a/b"));
        assert_eq!(normalize_root(Path::new(".")), PathBuf::new());
        assert_eq!(normalize_root(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn absolute_include_is_an_error() {
        let temp_dir = tempdir().unwrap();
        assert!(matches!(
            GlobFileSetScanner.scan(temp_dir.path(), "TEST-*.xml, /etc/*.xml"),
            Err(ScanError::Pattern { pattern, .. }) if pattern == "/etc/*.xml"
        ));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let temp_dir = tempdir().unwrap();
        assert!(matches!(
            GlobFileSetScanner.scan(temp_dir.path(), "TEST-[.xml"),
            Err(ScanError::Pattern { .. })
        ));
    }
}
