use std::env;
use std::time::Duration;

/// Default per-call timeout, matching the dashboard's historical 10s budget.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Base URLs of the downstream services.
#[derive(Debug, Clone)]
pub struct CapabilityEndpoints {
    pub security_url: String,
    pub text_url: String,
    pub classification_url: String,
    pub churn_url: String,
    pub recommendation_url: String,
    pub analytics_url: String,
    pub timeout: Duration,
}

impl CapabilityEndpoints {
    /// Read endpoints from `MS_*_URL` environment variables, falling back to
    /// the conventional local ports.
    pub fn from_env() -> Self {
        Self {
            security_url: env_or("MS_SECURITY_URL", "http://localhost:4000"),
            text_url: env_or("MS_TEXT_URL", "http://localhost:4001"),
            classification_url: env_or("MS_CLASSIFICATION_URL", "http://localhost:4002"),
            churn_url: env_or("MS_CHURN_URL", "http://localhost:4003"),
            analytics_url: env_or("MS_ANALYTICS_URL", "http://localhost:4004"),
            recommendation_url: env_or("MS_RECOMMENDATION_URL", "http://localhost:4005"),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Point every capability at a single base URL (used in tests).
    pub fn single_host(base: &str) -> Self {
        Self {
            security_url: base.to_string(),
            text_url: base.to_string(),
            classification_url: base.to_string(),
            churn_url: base.to_string(),
            recommendation_url: base.to_string(),
            analytics_url: base.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
