//! Integration Test: Core / Surface Separation
//!
//! **Policy**: `tutor-core` knows nothing about terminals. It talks to
//! surfaces only through `SurfaceEvent` and `TutorMessage`, so it must not
//! depend on or import ratatui or crossterm.

use std::fs;

use architectural_enforcement::{code_part, rust_files, workspace_root};

const SURFACE_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_does_not_import_surface_crates() {
    let mut violations = Vec::new();

    for file in rust_files("tutor/core") {
        for (idx, line) in file.lines.iter().enumerate() {
            let code = code_part(line);
            for krate in SURFACE_CRATES {
                if code.contains(&format!("{krate}::")) {
                    violations.push(format!(
                        "{}:{} - {}",
                        file.path.display(),
                        idx + 1,
                        line.trim()
                    ));
                }
            }
        }
    }

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        panic!(
            "\ntutor-core references a terminal crate {} time(s). Move rendering into the TUI.",
            violations.len()
        );
    }
}

#[test]
fn test_core_manifest_has_no_surface_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("tutor/core/Cargo.toml"))
        .expect("tutor/core/Cargo.toml should be readable");

    for krate in SURFACE_CRATES {
        let declared = manifest.lines().any(|l| {
            let l = l.trim_start();
            l.starts_with(&format!("{krate} ")) || l.starts_with(&format!("{krate}."))
        });
        assert!(!declared, "tutor-core must not depend on {krate}");
    }
}

#[test]
fn test_tui_does_not_reach_into_board_internals() {
    // The TUI renders BoardFrame snapshots; quiz grading stays in the core
    for file in rust_files("tui/src") {
        for line in file.production_lines() {
            assert!(
                !code_part(line).contains("stroke_matches"),
                "{} grades strokes itself",
                file.path.display()
            );
        }
    }
}
