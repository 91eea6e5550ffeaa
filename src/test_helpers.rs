//! Shared test utilities for the folio test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let content = content::load(tmp.path()).unwrap();
//! assert_eq!(nav_anchors(&content), vec!["about", "now", "publications", "contact"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::content::SiteContent;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write the smallest valid `profile.toml` into `dir`.
pub fn write_minimal_profile(dir: &Path) {
    std::fs::write(
        dir.join("profile.toml"),
        r#"
name = "Test Person"
brand = "testperson"
email = "test@example.org"
headline = "I test things."
"#,
    )
    .unwrap();
}

// =========================================================================
// Extractors
// =========================================================================

/// Navigation anchors in page order.
pub fn nav_anchors(content: &SiteContent) -> Vec<String> {
    content
        .navigation()
        .into_iter()
        .map(|item| item.anchor)
        .collect()
}

/// Count non-overlapping occurrences of `needle` in rendered HTML.
pub fn count_occurrences(html: &str, needle: &str) -> usize {
    html.matches(needle).count()
}
