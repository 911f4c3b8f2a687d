//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - The transition engine stays headless (no terminal crates)
//! - No sleeping in the engine; all timing flows through `update(delta)`
//! - No `unwrap()`/`expect()` in production code
//! - Views never drive the orchestrator directly
//!
//! The helpers below locate workspace sources and strip test code so the
//! checks in `tests/` only look at what ships.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Workspace root, two levels above this crate
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// Every `.rs` file under `dir`, relative to the workspace root
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(workspace_root().join(dir))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// A source line outside comments and `#[cfg(test)]` modules
#[derive(Debug)]
pub struct ProductionLine {
    /// File the line came from
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Line text
    pub text: String,
}

/// Production lines of `path`: everything before the first `#[cfg(test)]`,
/// minus comment lines
pub fn production_lines(path: &Path) -> Vec<ProductionLine> {
    let Ok(source) = fs::read_to_string(path) else {
        return Vec::new();
    };
    source
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .map(|(i, line)| ProductionLine {
            path: path.to_path_buf(),
            number: i + 1,
            text: line.to_string(),
        })
        .collect()
}

/// Production lines under `dir` containing any of `needles`
pub fn find_violations(dir: &str, needles: &[&str]) -> Vec<ProductionLine> {
    rust_sources(dir)
        .iter()
        .flat_map(|path| production_lines(path))
        .filter(|line| needles.iter().any(|n| line.text.contains(n)))
        .collect()
}

/// Human-readable report of violations
pub fn report(violations: &[ProductionLine]) -> String {
    violations
        .iter()
        .map(|v| format!("{}:{}: {}", v.path.display(), v.number, v.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").is_file());
    }

    #[test]
    fn test_test_modules_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("sample.rs");
        fs::write(
            &file,
            "fn a() {}\n// x.unwrap()\n#[cfg(test)]\nmod tests { fn b() { x.unwrap(); } }\n",
        )
        .expect("write sample");

        let lines = production_lines(&file);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "fn a() {}");
    }
}
