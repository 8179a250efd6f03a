// SPDX-License-Identifier: AGPL-3.0-or-later
//! Host description recorded alongside every benchmark result.
//!
//! # Platform Support
//!
//! - **Linux / macOS / BSD**: architecture from `uname -m`
//! - **Windows**: architecture from `PROCESSOR_ARCHITECTURE`
//!
//! System names follow the spelling already present in collected data
//! (`Linux`, `Darwin`, `Windows`, `FreeBSD`, ...).
//!
//! # Examples
//!
//! ```no_run
//! use cpuisfast::platform::HostInfo;
//!
//! let host = HostInfo::detect();
//! println!("This is running on {} {} {} {}",
//!     host.system, host.arch, host.implementation, host.runtime_version);
//! ```

use serde::{Deserialize, Serialize};

/// Name recorded as the language runtime.
pub const RUNTIME_IMPLEMENTATION: &str = "rustc";

/// Operating system family, used to pick a CPU-name extraction method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Windows,
    MacOS,
    Bsd,
    Unknown,
}

impl OsFamily {
    /// Family of the running system.
    pub fn current() -> Self {
        Self::from_system_name(&system_name())
    }

    /// Classify a system name as reported by [`system_name`].
    pub fn from_system_name(name: &str) -> Self {
        match name {
            "Windows" => Self::Windows,
            "Darwin" => Self::MacOS,
            "Linux" => Self::Linux,
            "DragonFly" => Self::Bsd,
            other if other.to_lowercase().contains("bsd") => Self::Bsd,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "Linux"),
            Self::Windows => write!(f, "Windows"),
            Self::MacOS => write!(f, "macOS"),
            Self::Bsd => write!(f, "BSD"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Operating system, architecture and runtime of this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInfo {
    /// System name (e.g. "Linux", "Darwin", "Windows", "OpenBSD")
    pub system: String,
    /// Machine architecture (e.g. "x86_64", "arm64", "AMD64")
    pub arch: String,
    /// Language runtime name
    pub implementation: String,
    /// Runtime version
    pub runtime_version: String,
}

impl HostInfo {
    /// Gather host information for the running machine.
    pub fn detect() -> Self {
        Self {
            system: system_name(),
            arch: machine_arch(),
            implementation: RUNTIME_IMPLEMENTATION.to_string(),
            runtime_version: runtime_version().to_string(),
        }
    }
}

/// System name of the running OS.
pub fn system_name() -> String {
    system_name_for(std::env::consts::OS)
}

/// Map a target OS identifier to the display name used in results.
pub fn system_name_for(os: &str) -> String {
    match os {
        "linux" | "android" => "Linux".to_string(),
        "macos" => "Darwin".to_string(),
        "windows" => "Windows".to_string(),
        "freebsd" => "FreeBSD".to_string(),
        "openbsd" => "OpenBSD".to_string(),
        "netbsd" => "NetBSD".to_string(),
        "dragonfly" => "DragonFly".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Machine architecture as the OS reports it.
pub fn machine_arch() -> String {
    reported_arch()
        .filter(|arch| !arch.is_empty())
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}

#[cfg(unix)]
fn reported_arch() -> Option<String> {
    let output = std::process::Command::new("uname").arg("-m").output().ok()?;
    if !output.status.success() {
        log::debug!("uname -m exited with {}", output.status);
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(windows)]
fn reported_arch() -> Option<String> {
    std::env::var("PROCESSOR_ARCHITECTURE")
        .ok()
        .map(|a| a.trim().to_string())
}

#[cfg(not(any(unix, windows)))]
fn reported_arch() -> Option<String> {
    None
}

/// Compiler version this binary was built with.
pub fn runtime_version() -> &'static str {
    let captured = env!("CPUISFAST_RUSTC_VERSION");
    if captured.is_empty() {
        env!("CARGO_PKG_RUST_VERSION")
    } else {
        captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_name_mapping() {
        assert_eq!(system_name_for("linux"), "Linux");
        assert_eq!(system_name_for("macos"), "Darwin");
        assert_eq!(system_name_for("windows"), "Windows");
        assert_eq!(system_name_for("openbsd"), "OpenBSD");
        assert_eq!(system_name_for("solaris"), "Solaris");
        assert_eq!(system_name_for(""), "");
    }

    #[test]
    fn test_os_family_lookup() {
        assert_eq!(OsFamily::from_system_name("Linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_system_name("Darwin"), OsFamily::MacOS);
        assert_eq!(OsFamily::from_system_name("Windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_system_name("FreeBSD"), OsFamily::Bsd);
        assert_eq!(OsFamily::from_system_name("NetBSD"), OsFamily::Bsd);
        assert_eq!(OsFamily::from_system_name("DragonFly"), OsFamily::Bsd);
        assert_eq!(OsFamily::from_system_name("Haiku"), OsFamily::Unknown);
    }

    #[test]
    fn test_os_family_display() {
        assert_eq!(OsFamily::MacOS.to_string(), "macOS");
        assert_eq!(OsFamily::Bsd.to_string(), "BSD");
    }

    #[test]
    fn test_host_info_detect() {
        let host = HostInfo::detect();
        assert!(!host.system.is_empty());
        assert!(!host.arch.is_empty());
        assert_eq!(host.implementation, "rustc");
        assert!(!host.runtime_version.is_empty());
    }

    #[test]
    fn test_host_info_serialization() {
        let host = HostInfo {
            system: "Linux".into(),
            arch: "x86_64".into(),
            implementation: "rustc".into(),
            runtime_version: "1.82.0".into(),
        };
        let json = serde_json::to_string(&host).unwrap();
        assert!(json.contains("x86_64"));
        let back: HostInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, host);
    }
}
