use std::path::PathBuf;

/// Path of a checked-in fixture, relative to the manifest directory of the crate under test.
pub fn get_test_file_path(file: &str) -> PathBuf {
    PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap()).join(file)
}
