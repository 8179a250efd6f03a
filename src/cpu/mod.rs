// SPDX-License-Identifier: AGPL-3.0-or-later
//! CPU model name detection.
//!
//! Each OS family has one extraction method; anything that goes wrong falls
//! back to the machine architecture string so a run never fails here.
//!
//! ## Platform Support
//!
//! - **Windows**: registry `ProcessorNameString`, then `PROCESSOR_IDENTIFIER`
//! - **macOS**: `sysctl -n machdep.cpu.brand_string`
//! - **Linux**: first `model name` line of `/proc/cpuinfo`
//! - **BSD**: first `cpuN:` line of `/var/run/dmesg.boot`, then `sysctl -n hw.model`
//!
//! # Examples
//!
//! ```no_run
//! use cpuisfast::cpu::CpuDetector;
//!
//! let name = CpuDetector::new().detect();
//! println!("Your CPU is {}", name);
//! ```

mod parse;

pub use parse::{parse_cpuinfo, parse_dmesg, parse_dmesg_line, parse_sysctl_value};

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};
use crate::platform::{self, OsFamily};

/// Default Linux CPU information file.
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Default BSD boot message file.
pub const DMESG_BOOT_PATH: &str = "/var/run/dmesg.boot";

#[cfg(windows)]
const CENTRAL_PROCESSOR_KEY: &str = r"Hardware\Description\System\CentralProcessor\0";

/// Detects the CPU model name of the running machine.
#[derive(Debug, Clone)]
pub struct CpuDetector {
    cpuinfo_path: PathBuf,
    dmesg_path: PathBuf,
}

impl CpuDetector {
    /// Detector reading the standard system locations.
    pub fn new() -> Self {
        Self {
            cpuinfo_path: PathBuf::from(CPUINFO_PATH),
            dmesg_path: PathBuf::from(DMESG_BOOT_PATH),
        }
    }

    /// Read Linux CPU information from `path` instead of `/proc/cpuinfo`.
    pub fn with_cpuinfo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cpuinfo_path = path.into();
        self
    }

    /// Read BSD boot messages from `path` instead of `/var/run/dmesg.boot`.
    pub fn with_dmesg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dmesg_path = path.into();
        self
    }

    /// CPU model name of this machine, or its architecture if unknown.
    pub fn detect(&self) -> String {
        self.detect_for(OsFamily::current())
    }

    /// CPU model name using the extraction method for `family`.
    pub fn detect_for(&self, family: OsFamily) -> String {
        match self.lookup(family) {
            Ok(Some(name)) => name,
            Ok(None) => {
                log::debug!("No CPU model name found for {}, using architecture", family);
                platform::machine_arch()
            }
            Err(e) => {
                log::warn!("CPU detection failed on {}: {}", family, e);
                platform::machine_arch()
            }
        }
    }

    fn lookup(&self, family: OsFamily) -> Result<Option<String>> {
        match family {
            OsFamily::Windows => Ok(windows_processor_name()),
            OsFamily::MacOS => sysctl("machdep.cpu.brand_string"),
            OsFamily::Linux => self.linux_model_name(),
            OsFamily::Bsd => self.bsd_model_name(),
            OsFamily::Unknown => Ok(None),
        }
    }

    fn linux_model_name(&self) -> Result<Option<String>> {
        let cpuinfo = std::fs::read_to_string(&self.cpuinfo_path)?;
        Ok(parse_cpuinfo(&cpuinfo))
    }

    fn bsd_model_name(&self) -> Result<Option<String>> {
        match read_lossy(&self.dmesg_path) {
            Ok(dmesg) => {
                if let Some(name) = parse_dmesg(&dmesg) {
                    return Ok(Some(name));
                }
                log::debug!("No cpuN: line in {}", self.dmesg_path.display());
            }
            Err(e) => {
                log::warn!("Cannot get *BSD CPU from {}: {}", self.dmesg_path.display(), e);
            }
        }
        sysctl("hw.model")
    }
}

impl Default for CpuDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Boot logs may carry non-UTF-8 bytes from firmware strings.
fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Value of a `sysctl -n` key.
fn sysctl(key: &str) -> Result<Option<String>> {
    let output = Command::new("sysctl").args(["-n", key]).output()?;
    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "sysctl -n {} exited with {}",
            key, output.status
        )));
    }
    Ok(parse_sysctl_value(&String::from_utf8_lossy(&output.stdout)))
}

fn windows_processor_name() -> Option<String> {
    #[cfg(windows)]
    {
        match registry_processor_name() {
            Ok(name) if !name.trim().is_empty() => return Some(name.trim().to_string()),
            Ok(_) => log::debug!("Empty ProcessorNameString in registry"),
            Err(e) => log::warn!("Cannot read ProcessorNameString: {}", e),
        }
    }

    std::env::var("PROCESSOR_IDENTIFIER")
        .ok()
        .and_then(|id| parse_sysctl_value(&id))
}

#[cfg(windows)]
fn registry_processor_name() -> std::io::Result<String> {
    use winreg::enums::HKEY_LOCAL_MACHINE;
    use winreg::RegKey;

    let hklm = RegKey::predef(HKEY_LOCAL_MACHINE);
    let key = hklm.open_subkey(CENTRAL_PROCESSOR_KEY)?;
    key.get_value("ProcessorNameString")
}
