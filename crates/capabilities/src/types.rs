use serde::{Deserialize, Serialize};
use ticket_core::{ChurnLevel, Insights};

/// Request-derived features forwarded to the churn predictor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnFeatures {
    pub sentiment_score: f64,
    pub text_length: usize,
    pub num_threats: usize,
}

/// Normalized churn prediction as returned by the churn service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChurnPrediction {
    /// Probability of churn in [0, 1].
    pub churn_probability: f64,
    /// Categorical risk: HIGH, MEDIUM or LOW.
    pub risk_level: String,
}

/// Everything the recommendation stage knows when it runs.
#[derive(Debug, Clone)]
pub struct RecommendationInput {
    /// Classification type (Correctivo, Evolutivo, ...).
    pub kind: String,
    /// Sentiment score in [-1, 1].
    pub sentiment: f64,
    /// Churn risk score in [0, 100].
    pub churn_score: u8,
    pub churn_level: ChurnLevel,
    pub insights: Option<Insights>,
}

/// Enrichment data from the analytics service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsInsights {
    pub top_factor: Option<String>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl AnalyticsInsights {
    pub fn into_insights(self) -> Insights {
        Insights {
            principal_factor: self.top_factor,
            notes: self.insights,
        }
    }
}

// Wire payloads for the HTTP clients. Field names follow the downstream
// service contracts, which is why the recommendation payload is Spanish.

#[derive(Serialize)]
pub(crate) struct TextPayload<'a> {
    pub text: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ClassifyPayload<'a> {
    pub text: &'a str,
    pub ticket_id: &'a str,
}

#[derive(Serialize)]
pub(crate) struct ChurnPayload<'a> {
    pub user_id: &'a str,
    pub features: &'a ChurnFeatures,
}

#[derive(Serialize)]
pub(crate) struct RecommendPayload<'a> {
    pub tipo: &'a str,
    pub sentimiento: f64,
    pub churn: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<&'a Insights>,
}

#[derive(Deserialize)]
pub(crate) struct SentimentResponse {
    pub sentiment: f64,
    pub label: String,
}

#[derive(Deserialize)]
pub(crate) struct ClassificationResponse {
    pub prediction: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
pub(crate) struct RecommendResponse {
    pub recomendaciones: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_payload_uses_service_field_names() {
        let payload = RecommendPayload {
            tipo: "Correctivo",
            sentimiento: -0.5,
            churn: 70,
            insights: None,
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains("\"tipo\""));
        assert!(json.contains("\"sentimiento\""));
        assert!(!json.contains("insights"));
    }

    #[test]
    fn test_churn_prediction_ignores_extra_fields() {
        let json = r#"{
            "user_id": "TKT-000001",
            "churn_probability": 0.85,
            "risk_level": "HIGH",
            "risk_factors": ["Sentimiento negativo"],
            "timestamp": "2025-11-28T21:00:00Z"
        }"#;

        let prediction: ChurnPrediction = serde_json::from_str(json).unwrap();
        assert_eq!(prediction.risk_level, "HIGH");
        assert!((prediction.churn_probability - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_analytics_insights_conversion() {
        let analytics = AnalyticsInsights {
            top_factor: Some("sentiment_score".to_string()),
            insights: vec!["Bajo sentimiento se correlaciona con mayor churn".to_string()],
        };

        let insights = analytics.into_insights();
        assert_eq!(insights.principal_factor.as_deref(), Some("sentiment_score"));
        assert_eq!(insights.notes.len(), 1);
    }
}
