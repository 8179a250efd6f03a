// SPDX-License-Identifier: AGPL-3.0-or-later
//! The benchmark result record.
//!
//! Field order is the CSV column order; JSON keys are the ones the
//! collection endpoint accepts.

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::bench::Measurement;
use crate::error::Result;
use crate::platform::HostInfo;

/// One benchmark result. Never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// CPU model name
    pub cpu: String,
    /// Empty-loop iterations per second
    pub empty_iterate_freq: u64,
    /// Add-loop iterations per second
    pub plus_iterate_freq: u64,
    /// Operating system name
    pub system: String,
    /// Machine architecture
    pub arch: String,
    /// Language runtime name
    pub implementation: String,
    /// Runtime version
    #[serde(rename = "python_version")]
    pub runtime_version: String,
    /// Local submission time, file output only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<String>,
}

impl BenchmarkResult {
    /// Build a record from a measurement on `host`.
    pub fn new(cpu: &str, measurement: &Measurement, host: &HostInfo) -> Self {
        Self {
            cpu: cpu.trim().to_string(),
            empty_iterate_freq: measurement.empty_iterate_freq,
            plus_iterate_freq: measurement.plus_iterate_freq,
            system: host.system.clone(),
            arch: host.arch.clone(),
            implementation: host.implementation.clone(),
            runtime_version: host.runtime_version.clone(),
            inserted_at: None,
        }
    }

    /// Copy of this record stamped with `at`.
    pub fn with_timestamp(&self, at: NaiveDateTime) -> Self {
        Self {
            inserted_at: Some(format_inserted_at(at)),
            ..self.clone()
        }
    }

    /// Copy of this record stamped with the current local time.
    pub fn stamped(&self) -> Self {
        self.with_timestamp(Local::now().naive_local())
    }

    /// JSON body for the collection endpoint.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `YYYY-MM-DD HH:MM:SS[.ffffff]`; the fraction is left out when it is zero.
pub fn format_inserted_at(at: NaiveDateTime) -> String {
    if at.nanosecond() / 1_000 == 0 {
        at.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn sample() -> BenchmarkResult {
        let measurement = Measurement {
            iterations: 1_000_000,
            empty_best: Duration::from_millis(10),
            add_best: Duration::from_millis(25),
            sum: 499_999_500_000,
            empty_iterate_freq: 100_000_000,
            plus_iterate_freq: 40_000_000,
        };
        let host = HostInfo {
            system: "Linux".into(),
            arch: "x86_64".into(),
            implementation: "rustc".into(),
            runtime_version: "1.82.0".into(),
        };
        BenchmarkResult::new(" Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz\n", &measurement, &host)
    }

    #[test]
    fn test_new_trims_cpu() {
        let r = sample();
        assert_eq!(r.cpu, "Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz");
        assert_eq!(r.empty_iterate_freq, 100_000_000);
        assert_eq!(r.plus_iterate_freq, 40_000_000);
        assert_eq!(r.inserted_at, None);
    }

    #[test]
    fn test_json_keys() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cpu"], "Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz");
        assert_eq!(value["empty_iterate_freq"], 100_000_000);
        assert_eq!(value["plus_iterate_freq"], 40_000_000);
        assert_eq!(value["implementation"], "rustc");
        assert_eq!(value["python_version"], "1.82.0");
        assert!(value.get("inserted_at").is_none());
        assert!(value.get("runtime_version").is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let with_micros = date.and_hms_micro_opt(7, 5, 3, 42).unwrap();
        assert_eq!(format_inserted_at(with_micros), "2024-03-09 07:05:03.000042");
        let whole = date.and_hms_opt(23, 59, 0).unwrap();
        assert_eq!(format_inserted_at(whole), "2024-03-09 23:59:00");
    }

    #[test]
    fn test_with_timestamp_leaves_original() {
        let r = sample();
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 1)
            .unwrap();
        let stamped = r.with_timestamp(at);
        assert_eq!(stamped.inserted_at.as_deref(), Some("2024-01-01 00:00:01"));
        assert_eq!(r.inserted_at, None);
        assert_eq!(stamped.cpu, r.cpu);
    }

    #[test]
    fn test_stamped_now() {
        let stamped = sample().stamped();
        let ts = stamped.inserted_at.unwrap();
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert!(!ts.contains('T'));
    }

    #[test]
    fn test_json_roundtrip_with_timestamp() {
        let r = sample().stamped();
        let back: BenchmarkResult = serde_json::from_str(&r.to_json().unwrap()).unwrap();
        assert_eq!(back, r);
    }
}
