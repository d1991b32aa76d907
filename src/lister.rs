//! The paginated listing loop.
//!
//! Each request is awaited and timed before the next one is built. A run ends
//! successfully when a page comes back empty, and with a failure on the first
//! list error. Nothing is retried.

use std::future::Future;
use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::error::RunError;
use crate::store::{ListRequest, ObjectStore};

/// Await `future`, returning how long it took alongside its output.
pub async fn measure<F: Future>(future: F) -> (Duration, F::Output) {
    let start = Instant::now();
    let output = future.await;
    (start.elapsed(), output)
}

/// Totals accumulated over the pages of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_objects: u64,

    /// Sum of the per-page latencies as printed (whole milliseconds), not
    /// process wall time
    pub total_time: Duration,

    pub pages_seen: u64,
}

impl RunStats {
    fn record_page(&mut self, objects: usize, latency: Duration) {
        self.total_objects += objects as u64;
        self.total_time += Duration::from_millis(latency.as_millis() as u64);
        self.pages_seen += 1;
    }

    /// Mean latency of the non-empty pages.
    pub fn average_latency(&self) -> Option<Duration> {
        let pages = u32::try_from(self.pages_seen).ok().filter(|&p| p > 0)?;
        Some(self.total_time / pages)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Lists everything under a prefix, one page at a time, reporting latency.
pub struct Lister<S> {
    store: S,
    request: ListRequest,
    verbose: bool,
    honor_truncation: bool,
}

impl<S: ObjectStore> Lister<S> {
    pub fn new(store: S, request: ListRequest) -> Self {
        Self {
            store,
            request,
            verbose: false,
            honor_truncation: false,
        }
    }

    /// Print every key as well as the per-page summary.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Stop after a page the store marks as the last one, instead of asking
    /// for one more page and waiting for it to come back empty.
    pub fn honor_truncation(mut self, honor: bool) -> Self {
        self.honor_truncation = honor;
        self
    }

    /// The request as it currently stands, marker included.
    pub fn request(&self) -> &ListRequest {
        &self.request
    }

    /// Run the loop to completion, writing progress and the summary to `out`.
    ///
    /// On a list failure `ERROR: <message>` is written and the error returned;
    /// the summary is not printed.
    pub async fn run<W: Write>(&mut self, out: &mut W) -> Result<RunStats, RunError> {
        let mut stats = RunStats::default();

        loop {
            debug!(
                bucket = %self.request.bucket,
                prefix = %self.request.prefix,
                marker = ?self.request.marker,
                "listing page"
            );
            let (latency, result) = measure(self.store.list_page(&self.request)).await;

            let page = match result {
                Ok(page) => page,
                Err(err) => {
                    error!(pages = stats.pages_seen, "list request failed: {}", err);
                    writeln!(out, "ERROR: {}", err)?;
                    return Err(err.into());
                }
            };

            if page.is_empty() {
                debug!(latency_ms = latency.as_millis() as u64, "empty page");
                break;
            }

            let start = stats.total_objects;
            let end = start + page.len() as u64;
            writeln!(
                out,
                "Got objects [{}, {}) in {}ms",
                start,
                end,
                latency.as_millis()
            )?;
            if self.verbose {
                for entry in &page.entries {
                    writeln!(out, "{}", entry.key)?;
                }
            }

            stats.record_page(page.len(), latency);

            if let Some(last) = page.last_key() {
                self.request.set_marker(last);
            }

            // A store that does not report truncation leaves only the empty-page rule.
            if self.honor_truncation && page.truncated == Some(false) {
                debug!("store reported the final page");
                break;
            }
        }

        writeln!(out, "Total time: {}s", stats.total_time.as_secs())?;
        writeln!(out, "Total objects: {}", stats.total_objects)?;
        out.flush()?;

        info!(
            objects = stats.total_objects,
            pages = stats.pages_seen,
            average_ms = stats.average_latency().unwrap_or_default().as_millis() as u64,
            "listing complete"
        );

        Ok(stats)
    }

    /// Like [`Lister::run`], reduced to the process exit status.
    pub async fn execute<W: Write>(&mut self, out: &mut W) -> ExitStatus {
        match self.run(out).await {
            Ok(_) => ExitStatus::Success,
            Err(RunError::Output(err)) => {
                error!("failed to write output: {}", err);
                ExitStatus::Failure
            }
            Err(RunError::List(_)) => ExitStatus::Failure,
        }
    }
}
