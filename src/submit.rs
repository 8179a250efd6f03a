// SPDX-License-Identifier: AGPL-3.0-or-later
//! Submission of a result to the remote collection endpoint.
//!
//! A single POST with a JSON body. There is no retry: on failure the user is
//! pointed at the issue tracker and the error goes back to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use cpuisfast::config::SubmitConfig;
//! use cpuisfast::submit::Submitter;
//! # use cpuisfast::record::BenchmarkResult;
//! # fn demo(result: &BenchmarkResult) -> cpuisfast::Result<()> {
//! let submitter = Submitter::new(SubmitConfig::default())?;
//! let reply = submitter.submit(result)?;
//! println!("{}", reply);
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};

use crate::config::SubmitConfig;
use crate::error::{Error, Result};
use crate::record::BenchmarkResult;

/// Printed, followed by the issue tracker URL, when a submission fails.
pub const FAILURE_NOTICE: &str = "Please copy output and report at:";

/// Posts results to the configured endpoint.
pub struct Submitter {
    client: Client,
    config: SubmitConfig,
}

impl Submitter {
    /// Create a submitter; no request timeout unless one is configured.
    pub fn new(config: SubmitConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;
        Ok(Self::with_client(config, client))
    }

    /// Create a submitter around an existing HTTP client.
    pub fn with_client(config: SubmitConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Endpoint configuration in use.
    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// POST `result` and return the response body.
    pub fn submit(&self, result: &BenchmarkResult) -> Result<String> {
        log::info!("Submitting result to {}", self.config.url);
        log::debug!("Request body: {:?}", result);

        let response = self
            .client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
            .json(result)
            .send()
            .map_err(|e| {
                log::error!("Request to {} failed: {}", self.config.url, e);
                Error::from(e)
            })?;

        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            log::error!("{} answered {}", self.config.url, status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    /// [`submit`](Self::submit), writing the issue tracker pointer to `out` on failure.
    pub fn submit_or_notify<W: Write>(&self, result: &BenchmarkResult, out: &mut W) -> Result<String> {
        self.submit(result)
            .map_err(|e| notify(&self.config.issue_tracker, out, e))
    }
}

/// Build a submitter from `config` and submit, pointing at the issue tracker on any failure.
pub fn submit_with_notice<W: Write>(
    config: SubmitConfig,
    result: &BenchmarkResult,
    out: &mut W,
) -> Result<String> {
    let issue_tracker = config.issue_tracker.clone();
    match Submitter::new(config) {
        Ok(submitter) => submitter.submit_or_notify(result, out),
        Err(e) => Err(notify(&issue_tracker, out, e)),
    }
}

fn notify<W: Write>(issue_tracker: &str, out: &mut W, err: Error) -> Error {
    if let Err(write_err) = writeln!(out, "{} {}", FAILURE_NOTICE, issue_tracker) {
        log::warn!("Cannot print failure notice: {}", write_err);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::Measurement;
    use crate::platform::HostInfo;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn sample() -> BenchmarkResult {
        let measurement = Measurement {
            iterations: 1_000_000,
            empty_best: Duration::from_millis(10),
            add_best: Duration::from_millis(20),
            sum: 499_999_500_000,
            empty_iterate_freq: 100_000_000,
            plus_iterate_freq: 50_000_000,
        };
        let host = HostInfo {
            system: "OpenBSD".into(),
            arch: "amd64".into(),
            implementation: "rustc".into(),
            runtime_version: "1.82.0".into(),
        };
        BenchmarkResult::new("Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz", &measurement, &host)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Accept one request, answer it, hand back the raw request text.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/cpudata", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = find(&request, b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });
        (url, handle)
    }

    fn submitter(url: String) -> Submitter {
        let config = SubmitConfig {
            url,
            ..SubmitConfig::default()
        };
        let client = Client::builder().no_proxy().build().unwrap();
        Submitter::with_client(config, client)
    }

    #[test]
    fn test_submit_sends_json_with_headers() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "{\"ok\":true}");
        let reply = submitter(url).submit(&sample()).unwrap();
        assert_eq!(reply, "{\"ok\":true}");

        let request = server.join().unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /cpudata HTTP/1.1"));
        assert!(lower.contains("content-type: application/json"));
        assert!(lower.contains("user-agent: python-requests/2.18.1"));

        let body_start = request.find("\r\n\r\n").unwrap() + 4;
        let body: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
        assert_eq!(body["cpu"], "Intel(R) Core(TM) i5-8265U CPU @ 1.60GHz");
        assert_eq!(body["plus_iterate_freq"], 50_000_000);
        assert_eq!(body["system"], "OpenBSD");
    }

    #[test]
    fn test_submit_error_status() {
        let (url, server) = serve_once("HTTP/1.1 403 Forbidden", "blocked");
        let err = submitter(url).submit(&sample()).unwrap_err();
        match err {
            Error::HttpStatus { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "blocked");
            }
            other => panic!("Expected HttpStatus, got {:?}", other),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_submit_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/cpudata", listener.local_addr().unwrap());
        drop(listener);
        let err = submitter(url).submit(&sample()).unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn test_refused_submission_points_at_issue_tracker() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/cpudata", listener.local_addr().unwrap());
        drop(listener);

        let mut out = Vec::new();
        let err = submitter(url).submit_or_notify(&sample(), &mut out).unwrap_err();
        assert!(matches!(err, Error::Http(_)));

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            format!("Please copy output and report at: {}\n", SubmitConfig::default().issue_tracker)
        );
    }

    #[test]
    fn test_successful_submission_prints_nothing() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "saved");
        let mut out = Vec::new();
        let reply = submitter(url).submit_or_notify(&sample(), &mut out).unwrap();
        assert_eq!(reply, "saved");
        assert!(out.is_empty());
        server.join().unwrap();
    }

    #[test]
    fn test_error_status_points_at_issue_tracker() {
        let (url, server) = serve_once("HTTP/1.1 500 Internal Server Error", "oops");
        let mut out = Vec::new();
        let err = submitter(url).submit_or_notify(&sample(), &mut out).unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
        assert!(String::from_utf8(out).unwrap().starts_with(FAILURE_NOTICE));
        server.join().unwrap();
    }

    #[test]
    fn test_new_with_timeout() {
        let config = SubmitConfig {
            timeout_secs: Some(5),
            ..SubmitConfig::default()
        };
        let submitter = Submitter::new(config).unwrap();
        assert_eq!(submitter.config().timeout_secs, Some(5));
    }
}
