//! Typed clients for the downstream analysis capabilities.
//!
//! Each capability is a request/response service reachable over HTTP with a
//! bounded timeout. The orchestrator only sees the [`Capabilities`] trait;
//! `HttpCapabilities` talks to the real services and `CannedCapabilities`
//! is the in-process double used by tests and demo runs.

mod canned;
mod config;
mod error;
mod http;
mod types;

pub use canned::CannedCapabilities;
pub use config::CapabilityEndpoints;
pub use error::{CapabilityError, Outcome};
pub use http::HttpCapabilities;
pub use types::*;

use async_trait::async_trait;
use ticket_core::{Classification, SecurityReport, Sentiment};

/// The five analysis capabilities plus the analytics collaborator.
///
/// One bounded attempt per call; a timeout is reported as
/// [`CapabilityError::Timeout`], never retried here.
#[async_trait]
pub trait Capabilities: Send + Sync {
    /// Content-safety screen over the raw ticket text.
    async fn screen_security(&self, text: &str) -> Outcome<SecurityReport>;

    /// Sentiment extraction over the anonymized text.
    async fn analyze_sentiment(&self, text: &str) -> Outcome<Sentiment>;

    /// Request-type classification over the anonymized text.
    async fn classify(&self, ticket_id: &str, text: &str) -> Outcome<Classification>;

    /// Churn probability from the sentiment score and request features.
    async fn predict_churn(&self, ticket_id: &str, features: &ChurnFeatures)
        -> Outcome<ChurnPrediction>;

    /// Recommendation generation from the assembled analysis inputs.
    async fn recommend(&self, input: &RecommendationInput) -> Outcome<Vec<String>>;

    /// Aggregated insights from the analytics service (overview enrichment).
    async fn fetch_insights(&self) -> Outcome<AnalyticsInsights>;
}
