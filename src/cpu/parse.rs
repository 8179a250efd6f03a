// SPDX-License-Identifier: AGPL-3.0-or-later
//! Text parsers for the CPU-name sources.

use once_cell::sync::Lazy;
use regex::Regex;

/// `cpu0:` style prefix of a BSD boot message line.
static DMESG_CPU_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^cpu[0-9]+:").expect("static regex is valid")
});

/// Extract the model name from `/proc/cpuinfo` contents.
///
/// Takes the first line mentioning `model name` and drops everything up to
/// the last `:` on it.
pub fn parse_cpuinfo(cpuinfo: &str) -> Option<String> {
    let line = cpuinfo.lines().find(|l| l.contains("model name"))?;
    let start = line.find("model name")?;
    let tail = &line[start..];
    let value = match tail.rfind(':') {
        Some(colon) => &tail[colon + 1..],
        None => line,
    };
    non_empty(value)
}

/// Extract the model name from one line of a BSD `dmesg.boot`.
///
/// ```
/// use cpuisfast::cpu::parse_dmesg_line;
///
/// let line = "cpu0: Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz, 15430.67 MHz, 06-8e-0c";
/// assert_eq!(
///     parse_dmesg_line(line).as_deref(),
///     Some("Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz"),
/// );
/// ```
pub fn parse_dmesg_line(line: &str) -> Option<String> {
    let prefix = DMESG_CPU_PREFIX.find(line)?;
    let rest = line[prefix.end()..].trim();
    rest.split(',').next().and_then(non_empty)
}

/// First CPU model line found in a BSD boot message buffer.
pub fn parse_dmesg(dmesg: &str) -> Option<String> {
    dmesg.lines().find_map(parse_dmesg_line)
}

/// Trimmed single-line command output, e.g. from `sysctl -n`.
pub fn parse_sysctl_value(output: &str) -> Option<String> {
    non_empty(output)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
