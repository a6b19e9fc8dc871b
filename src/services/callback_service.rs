//! Callback service for reporting withdrawal outcomes to the saga orchestrator.
//!
//! Delivery is at-most-once: each outcome is sent in a single POST on its own
//! task, failures are logged and dropped, and nothing flows back to the
//! request that produced the outcome.
//!
//! # Headers Sent
//!
//! - `Content-Type: application/json`
//! - `X-User-Id: <withdrawing user>`

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::{sync::Mutex, task::JoinSet};
use url::Url;

use crate::models::withdrawal::WithdrawalOutcome;

/// Header carrying the acting user id, read by the order service for correlation.
pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("invalid callback endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("callback request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("callback endpoint answered {0}")]
    Rejected(reqwest::StatusCode),
}

/// Destination for withdrawal outcomes.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn deliver(&self, outcome: &WithdrawalOutcome) -> Result<(), CallbackError>;
}

/// Posts outcomes as JSON to a fixed HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpOutcomeSink {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpOutcomeSink {
    /// Build a sink for `endpoint`. Each request gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// - `InvalidEndpoint`: the URL does not parse or is not http(s)
    /// - `Transport`: the HTTP client could not be built
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, CallbackError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl OutcomeSink for HttpOutcomeSink {
    async fn deliver(&self, outcome: &WithdrawalOutcome) -> Result<(), CallbackError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(USER_ID_HEADER, outcome.user_id.to_string())
            .json(outcome)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallbackError::Rejected(status));
        }

        Ok(())
    }
}

/// Validate the callback URL.
///
/// # Rules
///
/// - Must be a valid URL
/// - Must use HTTP or HTTPS (the orchestrator usually sits on the cluster network)
/// - Maximum 2048 characters
fn parse_endpoint(url: &str) -> Result<Url, CallbackError> {
    if url.len() > 2048 {
        return Err(CallbackError::InvalidEndpoint(
            "URL exceeds 2048 characters".to_string(),
        ));
    }

    let parsed = Url::parse(url)
        .map_err(|e| CallbackError::InvalidEndpoint(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(CallbackError::InvalidEndpoint(format!(
            "unsupported scheme {other}"
        ))),
    }
}

/// Fire-and-forget dispatcher of withdrawal outcomes.
///
/// Every `notify` spawns one delivery task. Finished tasks are reaped lazily;
/// `drain` waits for the ones still running.
#[derive(Clone)]
pub struct CallbackNotifier {
    sink: Arc<dyn OutcomeSink>,
    in_flight: Arc<Mutex<JoinSet<()>>>,
}

impl CallbackNotifier {
    pub fn new(sink: Arc<dyn OutcomeSink>) -> Self {
        Self {
            sink,
            in_flight: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Dispatch `outcome` on a background task and return immediately.
    pub async fn notify(&self, outcome: WithdrawalOutcome) {
        let sink = self.sink.clone();
        let mut in_flight = self.in_flight.lock().await;

        while in_flight.try_join_next().is_some() {}

        in_flight.spawn(async move {
            match sink.deliver(&outcome).await {
                Ok(()) => tracing::debug!(
                    book_id = outcome.book_id,
                    user_id = outcome.user_id,
                    status = outcome.status,
                    "withdrawal outcome delivered"
                ),
                Err(e) => tracing::error!(
                    book_id = outcome.book_id,
                    user_id = outcome.user_id,
                    status = outcome.status,
                    error = %e,
                    "failed to call back order service"
                ),
            }
        });
    }

    /// Wait for every delivery already dispatched.
    pub async fn drain(&self) {
        let mut in_flight = self.in_flight.lock().await;
        let pending = in_flight.len();
        if pending > 0 {
            tracing::info!(pending, "waiting for in-flight callbacks");
        }
        while in_flight.join_next().await.is_some() {}
    }
}

#[cfg(test)]
pub mod testing {
    //! Sinks that record instead of sending.

    use tokio::sync::mpsc;

    use super::*;

    /// Forwards every outcome into a channel the test reads from.
    pub struct RecordingSink {
        tx: mpsc::UnboundedSender<WithdrawalOutcome>,
    }

    impl RecordingSink {
        pub fn channel() -> (Self, mpsc::UnboundedReceiver<WithdrawalOutcome>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (Self { tx }, rx)
        }
    }

    #[async_trait]
    impl OutcomeSink for RecordingSink {
        async fn deliver(&self, outcome: &WithdrawalOutcome) -> Result<(), CallbackError> {
            let _ = self.tx.send(outcome.clone());
            Ok(())
        }
    }

    /// Holds every delivery until `release` is notified, then records it.
    pub struct GatedSink {
        pub release: Arc<tokio::sync::Notify>,
        tx: mpsc::UnboundedSender<WithdrawalOutcome>,
    }

    impl GatedSink {
        pub fn channel() -> (Self, mpsc::UnboundedReceiver<WithdrawalOutcome>) {
            let (tx, rx) = mpsc::unbounded_channel();
            let sink = Self {
                release: Arc::new(tokio::sync::Notify::new()),
                tx,
            };
            (sink, rx)
        }
    }

    #[async_trait]
    impl OutcomeSink for GatedSink {
        async fn deliver(&self, outcome: &WithdrawalOutcome) -> Result<(), CallbackError> {
            self.release.notified().await;
            let _ = self.tx.send(outcome.clone());
            Ok(())
        }
    }

    /// Always fails, as if the orchestrator were unreachable.
    pub struct UnreachableSink;

    #[async_trait]
    impl OutcomeSink for UnreachableSink {
        async fn deliver(&self, _outcome: &WithdrawalOutcome) -> Result<(), CallbackError> {
            Err(CallbackError::InvalidEndpoint("unreachable".to_string()))
        }
    }
}
