use std::sync::Mutex;

use ticket_core::{ChurnLevel, ChurnRisk, Overview, Sentiment};

/// Running aggregate over the analyses completed by this process.
///
/// Backs the base fields of the overview report so it stays available even
/// when the analytics collaborator is down.
#[derive(Debug, Default)]
pub(crate) struct OverviewTally {
    inner: Mutex<TallyInner>,
}

#[derive(Debug, Default)]
struct TallyInner {
    total: u64,
    sentiment_sum: f64,
    alerts: u64,
}

impl OverviewTally {
    pub(crate) fn record(&self, sentiment: &Sentiment, churn_risk: &ChurnRisk) {
        let mut inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        inner.total += 1;
        inner.sentiment_sum += sentiment.score;
        if churn_risk.level == ChurnLevel::Alto {
            inner.alerts += 1;
        }
    }

    pub(crate) fn snapshot(&self) -> Overview {
        let inner = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let avg_sentiment = if inner.total > 0 {
            inner.sentiment_sum / inner.total as f64
        } else {
            0.0
        };

        Overview {
            total_tickets: inner.total,
            avg_sentiment,
            alerts: inner.alerts,
            top_factor: None,
            insights: None,
        }
    }
}
