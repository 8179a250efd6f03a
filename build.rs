// SPDX-License-Identifier: AGPL-3.0-or-later
use std::env;
use std::process::Command;

fn main() {
    // --- rustc --version -> CPUISFAST_RUSTC_VERSION ---
    // Recorded with every result as the runtime version.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    println!("cargo:rerun-if-env-changed=RUSTC");

    let version = Command::new(&rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|text| parse_rustc_version(&text))
        .unwrap_or_default();
    println!("cargo:rustc-env=CPUISFAST_RUSTC_VERSION={}", version);
}

/// "rustc 1.82.0 (f6e511eec 2024-10-15)" -> "1.82.0"
fn parse_rustc_version(text: &str) -> Option<String> {
    text.split_whitespace().nth(1).map(|v| v.to_string())
}
