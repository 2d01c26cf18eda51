use async_trait::async_trait;
use ticket_core::{Classification, SecurityReport, Sentiment};

use crate::error::Outcome;
use crate::types::{AnalyticsInsights, ChurnFeatures, ChurnPrediction, RecommendationInput};
use crate::Capabilities;

/// In-process capability double with configurable outcomes.
///
/// Defaults mirror a healthy downstream fleet; individual capabilities can
/// be overridden with alternate payloads or failures to exercise the
/// orchestrator's fallback paths. The pipeline under test is the same one
/// that runs against [`crate::HttpCapabilities`].
#[derive(Debug, Clone)]
pub struct CannedCapabilities {
    security: Outcome<SecurityReport>,
    sentiment: Outcome<Sentiment>,
    classification: Outcome<Classification>,
    churn: Outcome<ChurnPrediction>,
    recommendation: Outcome<Vec<String>>,
    insights: Outcome<AnalyticsInsights>,
}

impl Default for CannedCapabilities {
    fn default() -> Self {
        Self {
            security: Ok(SecurityReport {
                is_safe: true,
                threats_detected: vec![],
                // Empty means "echo the submitted text back".
                anonymized_text: String::new(),
            }),
            sentiment: Ok(Sentiment {
                score: 0.8,
                label: "POSITIVO".to_string(),
            }),
            classification: Ok(Classification {
                kind: "Correctivo".to_string(),
                confidence: 0.95,
            }),
            churn: Ok(ChurnPrediction {
                churn_probability: 0.12,
                risk_level: "LOW".to_string(),
            }),
            recommendation: Ok(vec![
                "Enviar encuesta de satisfacción".to_string(),
                "Ofrecer descuento en renovación".to_string(),
            ]),
            insights: Ok(AnalyticsInsights {
                top_factor: Some("sentiment_score".to_string()),
                insights: vec!["Bajo sentimiento se correlaciona con mayor churn".to_string()],
            }),
        }
    }
}

impl CannedCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_security(mut self, outcome: Outcome<SecurityReport>) -> Self {
        self.security = outcome;
        self
    }

    pub fn with_sentiment(mut self, outcome: Outcome<Sentiment>) -> Self {
        self.sentiment = outcome;
        self
    }

    pub fn with_classification(mut self, outcome: Outcome<Classification>) -> Self {
        self.classification = outcome;
        self
    }

    pub fn with_churn(mut self, outcome: Outcome<ChurnPrediction>) -> Self {
        self.churn = outcome;
        self
    }

    pub fn with_recommendations(mut self, outcome: Outcome<Vec<String>>) -> Self {
        self.recommendation = outcome;
        self
    }

    pub fn with_insights(mut self, outcome: Outcome<AnalyticsInsights>) -> Self {
        self.insights = outcome;
        self
    }
}

#[async_trait]
impl Capabilities for CannedCapabilities {
    async fn screen_security(&self, text: &str) -> Outcome<SecurityReport> {
        let mut report = self.security.clone()?;
        if report.anonymized_text.is_empty() {
            report.anonymized_text = text.to_string();
        }
        Ok(report)
    }

    async fn analyze_sentiment(&self, _text: &str) -> Outcome<Sentiment> {
        self.sentiment.clone()
    }

    async fn classify(&self, _ticket_id: &str, _text: &str) -> Outcome<Classification> {
        self.classification.clone()
    }

    async fn predict_churn(
        &self,
        _ticket_id: &str,
        _features: &ChurnFeatures,
    ) -> Outcome<ChurnPrediction> {
        self.churn.clone()
    }

    async fn recommend(&self, _input: &RecommendationInput) -> Outcome<Vec<String>> {
        self.recommendation.clone()
    }

    async fn fetch_insights(&self) -> Outcome<AnalyticsInsights> {
        self.insights.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;

    #[tokio::test]
    async fn test_defaults_echo_anonymized_text() {
        let canned = CannedCapabilities::new();
        let report = canned.screen_security("mi correo es x@y.z").await.unwrap();
        assert!(report.is_safe);
        assert_eq!(report.anonymized_text, "mi correo es x@y.z");
    }

    #[tokio::test]
    async fn test_override_with_failure() {
        let canned = CannedCapabilities::new().with_churn(Err(CapabilityError::Unreachable {
            capability: "churn",
            detail: "connection refused".to_string(),
        }));

        let features = ChurnFeatures {
            sentiment_score: 0.0,
            text_length: 1,
            num_threats: 0,
        };
        assert!(canned.predict_churn("TKT-000001", &features).await.is_err());
        assert!(canned.analyze_sentiment("texto").await.is_ok());
    }
}
