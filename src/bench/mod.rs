// SPDX-License-Identifier: AGPL-3.0-or-later
//! Loop and addition microbenchmarks.
//!
//! Each kernel is timed several times and only the fastest run counts.

use std::hint::black_box;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default loop length.
pub const ONE_MILLION: u64 = 1_000_000;

/// Default number of timed repetitions per benchmark.
pub const DEFAULT_REPEATS: u32 = 10;

/// Benchmark parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Loop length of one run
    pub iterations: u64,
    /// Timed runs per benchmark; the minimum is kept
    pub repeats: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            iterations: ONE_MILLION,
            repeats: DEFAULT_REPEATS,
        }
    }
}

impl BenchConfig {
    /// Reject parameters that cannot produce a measurement.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidValue("iterations must be at least 1".into()));
        }
        if self.repeats == 0 {
            return Err(Error::InvalidValue("repeats must be at least 1".into()));
        }
        Ok(())
    }
}

/// Outcome of both microbenchmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Loop length of one run
    pub iterations: u64,
    /// Fastest empty-loop run
    pub empty_best: Duration,
    /// Fastest add-loop run
    pub add_best: Duration,
    /// Sum computed by the add loop
    pub sum: u64,
    /// Empty-loop iterations per second
    pub empty_iterate_freq: u64,
    /// Add-loop iterations per second
    pub plus_iterate_freq: u64,
}

/// Iterate without doing any work.
pub fn empty_loop(iterations: u64) {
    for i in 0..iterations {
        black_box(i);
    }
}

/// Sum `0..iterations` one addition at a time.
pub fn add_loop(iterations: u64) -> u64 {
    let mut s: u64 = 0;
    for i in 0..iterations {
        s = black_box(s.wrapping_add(black_box(i)));
    }
    s
}

/// Fastest of `repeats` timed calls to `f`.
pub fn time_min<F: FnMut()>(repeats: u32, mut f: F) -> Duration {
    (0..repeats)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .min()
        .unwrap_or_default()
}

/// `floor(iterations / best)`; a zero duration counts as one nanosecond.
pub fn iterations_per_second(iterations: u64, best: Duration) -> u64 {
    let nanos = best.as_nanos().max(1);
    let rate = u128::from(iterations) * 1_000_000_000 / nanos;
    u64::try_from(rate).unwrap_or(u64::MAX)
}

/// Run both benchmarks.
pub fn measure(config: &BenchConfig) -> Result<Measurement> {
    config.validate()?;
    log::info!(
        "Timing {} iterations, best of {} runs",
        config.iterations,
        config.repeats
    );

    let empty_best = time_min(config.repeats, || empty_loop(config.iterations));
    log::debug!("Empty loop best: {:?}", empty_best);

    let mut sum = 0;
    let add_best = time_min(config.repeats, || sum = add_loop(config.iterations));
    log::debug!("Add loop best: {:?}", add_best);

    Ok(Measurement {
        iterations: config.iterations,
        empty_best,
        add_best,
        sum,
        empty_iterate_freq: iterations_per_second(config.iterations, empty_best),
        plus_iterate_freq: iterations_per_second(config.iterations, add_best),
    })
}
