// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration file support.
//!
//! Every section and key is optional; missing values take the defaults the
//! public collection uses.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bench::BenchConfig;
use crate::error::{Error, Result};
use crate::render;
use crate::store;

/// Collection endpoint.
pub const DEFAULT_SUBMIT_URL: &str = "https://cpu.pymi.vn/cpudata";

/// Client identifier the endpoint's CDN lets through.
pub const DEFAULT_USER_AGENT: &str = "python-requests/2.18.1";

/// Where users report failed submissions.
pub const ISSUE_TRACKER: &str = "https://github.com/pymivn/cpuisfast/issues/new";

/// Public results page.
pub const RESULTS_PAGE: &str = "https://cpu.pymi.vn/";

/// Local CSV output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    pub path: PathBuf,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(store::DEFAULT_DATA_PATH),
        }
    }
}

/// Remote submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    pub url: String,
    pub user_agent: String,
    pub issue_tracker: String,
    pub results_page: String,
    /// Request timeout; none when unset
    pub timeout_secs: Option<u64>,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SUBMIT_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            issue_tracker: ISSUE_TRACKER.into(),
            results_page: RESULTS_PAGE.into(),
            timeout_secs: None,
        }
    }
}

/// Page rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub data: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(render::DEFAULT_DATA_PATH),
            template: PathBuf::from(render::DEFAULT_TEMPLATE_PATH),
            output: PathBuf::from(render::DEFAULT_OUTPUT_PATH),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bench: BenchConfig,
    pub record: RecordConfig,
    pub submit: SubmitConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Load from TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.bench.validate()?;
        Ok(config)
    }

    /// Generate sample config
    pub fn sample_toml() -> String {
        r#"# cpuisfast configuration
[bench]
iterations = 1000000
repeats = 10

[record]
path = "cpuisfast/data.csv"

[submit]
url = "https://cpu.pymi.vn/cpudata"
user_agent = "python-requests/2.18.1"
issue_tracker = "https://github.com/pymivn/cpuisfast/issues/new"
results_page = "https://cpu.pymi.vn/"
# timeout_secs = 30

[render]
data = "data.csv"
template = "template.html"
output = "dist/index.html"
"#
        .into()
    }
}
