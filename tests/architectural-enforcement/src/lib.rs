//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce the workspace's
//! architectural rules:
//! - No sleep() calls in production code outside frame limiting
//! - No blocking I/O inside async functions
//! - `tutor-core` stays surface agnostic (no terminal crates)
//!
//! The helpers here walk source trees relative to the workspace root so the
//! checks work no matter which directory `cargo test` runs from.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the workspace (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// A production source file, already split into lines
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Lines before the file's `#[cfg(test)]` module
    pub fn production_lines(&self) -> &[String] {
        let end = self
            .lines
            .iter()
            .position(|l| l.trim_start().starts_with("#[cfg(test)]"))
            .unwrap_or(self.lines.len());
        &self.lines[..end]
    }
}

/// Every `.rs` file under `dir` (relative to the workspace root)
///
/// A missing directory yields nothing.
pub fn rust_files(dir: &str) -> Vec<SourceFile> {
    let path = workspace_root().join(dir);
    if !path.exists() {
        return Vec::new();
    }

    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            Some(SourceFile {
                path: e.path().to_path_buf(),
                lines: content.lines().map(str::to_string).collect(),
            })
        })
        .collect()
}

/// The part of a line before any `//` comment
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// Whether `lines[idx]` sits inside an `async fn`
///
/// Scans backwards to the nearest function header.
pub fn is_in_async_function(lines: &[String], idx: usize) -> bool {
    for line in lines[..idx].iter().rev() {
        let line = line.trim();

        if line.contains("async fn ") {
            return true;
        }
        if line.contains("fn ") && !line.starts_with("//") {
            return false;
        }
        if line.starts_with("mod ") || (line.starts_with("impl") && line.contains('{')) {
            return false;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_async_detection() {
        let code = lines(&[
            "pub async fn lookup(&self) {",
            "    let text = std::fs::read_to_string(\"a\");",
            "}",
        ]);
        assert!(is_in_async_function(&code, 1));
    }

    #[test]
    fn test_sync_detection() {
        let code = lines(&[
            "async fn outer() {}",
            "fn load() {",
            "    let text = std::fs::read_to_string(\"a\");",
            "}",
        ]);
        assert!(!is_in_async_function(&code, 2));
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let a = 1; // sleep(1)"), "let a = 1; ");
    }

    #[test]
    fn test_production_lines_stop_at_tests() {
        let file = SourceFile {
            path: PathBuf::from("x.rs"),
            lines: lines(&["fn a() {}", "#[cfg(test)]", "mod tests {}"]),
        };
        assert_eq!(file.production_lines().len(), 1);
    }

    #[test]
    fn test_workspace_root_has_members() {
        assert!(workspace_root().join("tutor/core/src").exists());
        assert!(workspace_root().join("tui/src").exists());
    }
}
