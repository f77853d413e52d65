//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the TUI and the Tutor core MUST NOT sleep.
//! Work waits on I/O (channels, terminal events, HTTP responses) instead.
//! **Exceptions**: frame rate limiting in `tui/src/app.rs`, test code.

use architectural_enforcement::{code_part, rust_files, SourceFile};

struct SleepPolicy {
    allow_frame_limiting: bool,
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for file in rust_files("tui/src") {
        check_file(
            &file,
            &mut violations,
            &SleepPolicy {
                allow_frame_limiting: true,
            },
        );
    }
    for file in rust_files("tutor/core/src") {
        check_file(
            &file,
            &mut violations,
            &SleepPolicy {
                allow_frame_limiting: false,
            },
        );
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Sleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }
        eprintln!("\n✅ ACCEPTABLE sleep uses:");
        eprintln!("  - Frame rate limiting in the TUI event loop");
        eprintln!("  - Test code (#[cfg(test)] modules)");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep to wait for a lookup or stroke load (poll the task handle)");
        eprintln!("  - std::thread::sleep anywhere (blocks the runtime)");

        panic!(
            "\nFound {} sleep violation(s) in production code.",
            violations.len()
        );
    }
}

fn check_file(file: &SourceFile, violations: &mut Vec<String>, policy: &SleepPolicy) {
    let lines = file.production_lines();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }

        let blocking = code.contains("thread::sleep");
        if !blocking
            && policy.allow_frame_limiting
            && file.path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(lines, idx)
        {
            continue;
        }

        violations.push(format!(
            "{}:{} - {}",
            file.path.display(),
            idx + 1,
            line.trim()
        ));
    }
}

/// Check if sleep is used for frame rate limiting
fn is_frame_limiting_context(lines: &[String], idx: usize) -> bool {
    let range = idx.saturating_sub(10)..std::cmp::min(idx + 5, lines.len());
    lines[range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps")
    })
}

#[test]
fn test_frame_limiting_detection() {
    let lines: Vec<String> = [
        "// Frame rate limiting",
        "let elapsed = frame_start.elapsed();",
        "tokio::time::sleep(FRAME_DURATION - elapsed).await;",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert!(is_frame_limiting_context(&lines, 2));

    let lines: Vec<String> = ["tokio::time::sleep(Duration::from_millis(50)).await;"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(!is_frame_limiting_context(&lines, 0));
}
