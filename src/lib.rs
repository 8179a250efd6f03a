// SPDX-License-Identifier: AGPL-3.0-or-later
//! cpuisfast: a community CPU benchmark.
//!
//! Measures how fast this machine runs an empty loop and an addition loop,
//! detects the CPU model, and records the result in a CSV collection file or
//! submits it to the public collection endpoint. Collected rows can be
//! rendered into a static HTML page.
//!
//! # Quick Start
//!
//! ```no_run
//! use cpuisfast::bench::BenchConfig;
//!
//! let report = cpuisfast::run(&BenchConfig::default())?;
//! println!("Your CPU is {}", report.result.cpu);
//! println!("Your CPU can do: {} (+) operations/second", report.result.plus_iterate_freq);
//! # Ok::<(), cpuisfast::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`cpu`] - CPU model name detection per OS family
//! - [`platform`] - System, architecture and runtime description
//! - [`bench`] - The two microbenchmarks
//! - [`record`] - The `BenchmarkResult` record
//! - [`store`] - CSV collection file
//! - [`submit`] - Remote submission (feature `remote`)
//! - [`render`] - HTML results page
//! - [`config`] - TOML configuration

pub mod bench;
pub mod config;
pub mod cpu;
pub mod error;
pub mod platform;
pub mod record;
pub mod render;
pub mod store;
#[cfg(feature = "remote")]
pub mod submit;

pub use bench::{BenchConfig, Measurement};
pub use config::Config;
pub use cpu::CpuDetector;
pub use error::{Error, Result};
pub use platform::HostInfo;
pub use record::BenchmarkResult;

/// Everything one benchmark run produced.
#[derive(Debug, Clone)]
pub struct Report {
    /// Host the run happened on
    pub host: HostInfo,
    /// Raw timings
    pub measurement: Measurement,
    /// Record ready to be stored or submitted
    pub result: BenchmarkResult,
}

impl Report {
    /// Console summary of the run, one entry per line.
    pub fn summary_lines(&self) -> Vec<String> {
        let r = &self.result;
        let m = &self.measurement;
        vec![
            format!("Your CPU is {}", r.cpu),
            format!(
                "This is running on {} {} {} {}",
                r.system, r.arch, r.implementation, r.runtime_version
            ),
            format!("It can loop {} times per second", r.empty_iterate_freq),
            format!("Calculating sum from 0 to {}", m.iterations),
            format!("Sum is {}", m.sum),
            format!("Best took {} s", m.add_best.as_secs_f64()),
            format!("Your CPU can do: {} (+) operations/second", r.plus_iterate_freq),
        ]
    }
}

/// Benchmark, then describe the machine.
pub fn run(config: &BenchConfig) -> Result<Report> {
    run_with_detector(config, &CpuDetector::new())
}

/// [`run`] with a specific CPU detector.
pub fn run_with_detector(config: &BenchConfig, detector: &CpuDetector) -> Result<Report> {
    let measurement = bench::measure(config)?;
    let cpu = detector.detect();
    let host = HostInfo::detect();
    log::info!("Detected {} on {} {}", cpu, host.system, host.arch);

    let result = BenchmarkResult::new(&cpu, &measurement, &host);
    Ok(Report {
        host,
        measurement,
        result,
    })
}
