//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions MUST NOT perform blocking I/O.
//! - Files: `std::fs` only from synchronous functions (config loading,
//!   log file setup before the runtime does any work)
//! - Processes: speech goes through `tokio::process`, never `std::process::Command`
//! - HTTP: `reqwest::blocking` is never used

use architectural_enforcement::{code_part, is_in_async_function, rust_files, SourceFile};

#[test]
fn test_no_blocking_io_in_async_functions() {
    let mut violations = Vec::new();

    for dir in ["tui/src", "tutor/core/src"] {
        for file in rust_files(dir) {
            check_file(&file, &mut violations);
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking I/O found in async code!\n");
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        eprintln!("\n✅ Use instead:");
        eprintln!("  - tokio::fs, or move the call into a synchronous helper");
        eprintln!("  - tokio::process::Command");
        eprintln!("  - the async reqwest::Client");

        panic!("\nFound {} blocking I/O violation(s).", violations.len());
    }
}

fn check_file(file: &SourceFile, violations: &mut Vec<String>) {
    let lines = file.production_lines();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        let reason = if code.contains("reqwest::blocking") {
            Some("Blocking HTTP client")
        } else if code.contains("std::process::Command") {
            Some("Blocking process spawn")
        } else if (code.contains("std::fs::") || code.contains(" fs::"))
            && is_in_async_function(lines, idx)
        {
            Some("Blocking file I/O in async")
        } else {
            None
        };

        if let Some(reason) = reason {
            violations.push(format!(
                "{}:{} - {}: {}",
                file.path.display(),
                idx + 1,
                reason,
                line.trim()
            ));
        }
    }
}
