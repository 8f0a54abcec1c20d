use std::fs;
use std::path::{Path, PathBuf};

use wrapkit_ast::ClassDescriptor;
use wrapkit_hierarchy::{Database, DatabaseBuilder};

/// Get path to a fixture under tests/fixtures/
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a test fixture from tests/fixtures/
pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// The sample hierarchy in tests/fixtures/hierarchy/
pub fn load_hierarchy() -> Database {
    let mut builder = DatabaseBuilder::new();
    let report = builder
        .load_dir(fixture_path("hierarchy"))
        .expect("fixture directory is readable");
    assert!(report.failed.is_empty(), "fixture sources failed: {:?}", report.failed);
    builder.build()
}

/// A class description from tests/fixtures/classes/
pub fn load_class(name: &str) -> ClassDescriptor {
    let text = load_fixture(&format!("classes/{}.json", name));
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Invalid class fixture {}: {}", name, e))
}
