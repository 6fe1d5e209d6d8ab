//! Request/render controller.
//!
//! Ties together the three collaborators of a summarization round trip: a
//! [`SummaryClient`] that issues the request, a [`RenderTarget`] that
//! displays the response, and a [`Notifier`] that surfaces user-facing
//! notices. All three are injected at construction, so a controller cannot
//! be built with a handle missing and no ambient state is involved.
//!
//! Each submit operation is a single linear round trip with two terminal
//! outcomes: success renders the response, failure notifies the user and
//! leaves the previously rendered content untouched. Only one request may be
//! in flight at a time; a retrigger while one is pending is rejected with a
//! busy notice instead of racing on the render target.

use std::cell::Cell;
use std::time::Instant;

use crate::client::{DocumentFile, SummaryClient};
use crate::history;
use crate::render::RenderTarget;

// ---------------------------------------------------------------------------
// Notices
// ---------------------------------------------------------------------------

/// A user-facing notice emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Input was rejected before any network call.
    Validation(String),
    /// A request is already in flight; this one was not issued.
    Busy(String),
    /// The request was issued but failed (transport, HTTP status, or parse).
    Failure(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m) | Self::Busy(m) | Self::Failure(m) => m,
        }
    }
}

/// Sink for user-facing notices.
///
/// The CLI prints to stderr; tests record. Injected so the controller never
/// talks to the terminal directly.
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

// ---------------------------------------------------------------------------
// In-flight guard
// ---------------------------------------------------------------------------

/// Single-request-in-flight flag.
///
/// The controller runs on one thread, so a plain `Cell` suffices; the guard
/// releases the flag on every exit path, including errors.
#[derive(Debug, Default)]
struct InFlightFlag(Cell<bool>);

impl InFlightFlag {
    fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        if self.0.get() {
            return None;
        }
        self.0.set(true);
        Some(InFlightGuard(&self.0))
    }

    fn is_set(&self) -> bool {
        self.0.get()
    }
}

struct InFlightGuard<'a>(&'a Cell<bool>);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Controls the request → render pipeline for one invocation.
pub struct Controller<N: Notifier> {
    client: SummaryClient,
    target: RenderTarget,
    notifier: N,
    in_flight: InFlightFlag,
    log_requests: bool,
}

impl<N: Notifier> Controller<N> {
    pub fn new(client: SummaryClient, target: RenderTarget, notifier: N) -> Self {
        Self {
            client,
            target,
            notifier,
            in_flight: InFlightFlag::default(),
            log_requests: true,
        }
    }

    /// Disable request history logging (from `[logging] enabled = false`).
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Submit document files for summarization.
    ///
    /// Returns `true` if a response was rendered. An empty selection is
    /// rejected with a validation notice and no network call is made.
    pub fn submit_files(&mut self, files: &[DocumentFile]) -> bool {
        if files.is_empty() {
            self.notifier.notify(&Notice::Validation(
                "select at least one file to summarize".to_string(),
            ));
            return false;
        }

        self.submit("/upload", files.len(), |client| client.upload(files))
    }

    /// Submit raw text for summarization.
    ///
    /// Returns `true` if a response was rendered. Empty or whitespace-only
    /// text is rejected with a validation notice and no network call is made.
    pub fn submit_text(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            self.notifier.notify(&Notice::Validation(
                "enter some text to summarize".to_string(),
            ));
            return false;
        }

        self.submit("/summarize-text", 1, |client| client.summarize_text(text))
    }

    /// Issue a guarded request and render the outcome.
    ///
    /// On failure the render target is not touched: whatever was rendered
    /// before stays on screen, and the user gets exactly one failure notice.
    fn submit<F>(&mut self, endpoint: &str, documents: usize, op: F) -> bool
    where
        F: FnOnce(&SummaryClient) -> anyhow::Result<crate::client::SummarizeResponse>,
    {
        let Some(_guard) = self.in_flight.try_acquire() else {
            self.notifier.notify(&Notice::Busy(
                "a summarization request is already in flight".to_string(),
            ));
            return false;
        };

        let started = Instant::now();
        let result = op(&self.client);
        let latency_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(response) => {
                if self.log_requests {
                    history::log_request(
                        endpoint,
                        documents,
                        self.client.summary_length(),
                        true,
                        latency_ms,
                        None,
                    );
                }
                self.target.render(&response);
                true
            }
            Err(err) => {
                let message = format!("{err:#}");
                if self.log_requests {
                    history::log_request(
                        endpoint,
                        documents,
                        self.client.summary_length(),
                        false,
                        latency_ms,
                        Some(message.clone()),
                    );
                }
                self.notifier.notify(&Notice::Failure(message));
                false
            }
        }
    }

    /// Whether a request is currently pending.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_set()
    }

    /// The render target, for reading out the rendered content.
    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    /// The client, for diagnostics.
    pub fn client(&self) -> &SummaryClient {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
