use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::Serialize;
use ticket_core::{Classification, SecurityReport, Sentiment};
use tracing::debug;

use crate::config::CapabilityEndpoints;
use crate::error::{CapabilityError, Outcome};
use crate::types::{
    AnalyticsInsights, ChurnFeatures, ChurnPayload, ChurnPrediction, ClassificationResponse,
    ClassifyPayload, RecommendPayload, RecommendResponse, RecommendationInput, SentimentResponse,
    TextPayload,
};
use crate::Capabilities;

/// Capability clients over HTTP.
///
/// One shared `reqwest::Client` with a fixed timeout bounds every call; a
/// timed-out call surfaces as `CapabilityError::Timeout` and is not retried.
pub struct HttpCapabilities {
    client: reqwest::Client,
    endpoints: CapabilityEndpoints,
}

impl HttpCapabilities {
    pub fn new(endpoints: CapabilityEndpoints) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert("X-Source", HeaderValue::from_static("ticket-insight"));

        let client = reqwest::Client::builder()
            .timeout(endpoints.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, endpoints })
    }

    async fn post_json<B, T>(&self, capability: &'static str, url: String, body: &B) -> Outcome<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(capability, %url, "calling capability");
        let timeout_secs = self.endpoints.timeout.as_secs();

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CapabilityError::from_reqwest(capability, timeout_secs, e))?;

        Self::decode(capability, response).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        capability: &'static str,
        url: String,
    ) -> Outcome<T> {
        debug!(capability, %url, "calling capability");
        let timeout_secs = self.endpoints.timeout.as_secs();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CapabilityError::from_reqwest(capability, timeout_secs, e))?;

        Self::decode(capability, response).await
    }

    async fn decode<T: DeserializeOwned>(
        capability: &'static str,
        response: reqwest::Response,
    ) -> Outcome<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(CapabilityError::Unreachable {
                capability,
                detail: format!("HTTP status {}", status),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CapabilityError::InvalidResponse {
                capability,
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl Capabilities for HttpCapabilities {
    async fn screen_security(&self, text: &str) -> Outcome<SecurityReport> {
        let url = format!("{}/api/security/detect-phishing", self.endpoints.security_url);
        self.post_json("security", url, &TextPayload { text }).await
    }

    async fn analyze_sentiment(&self, text: &str) -> Outcome<Sentiment> {
        let url = format!("{}/api/text/sentiment", self.endpoints.text_url);
        let response: SentimentResponse = self.post_json("sentiment", url, &TextPayload { text }).await?;

        if !(-1.0..=1.0).contains(&response.sentiment) {
            return Err(CapabilityError::InvalidResponse {
                capability: "sentiment",
                detail: format!("score {} outside [-1, 1]", response.sentiment),
            });
        }

        Ok(Sentiment {
            score: response.sentiment,
            label: response.label,
        })
    }

    async fn classify(&self, ticket_id: &str, text: &str) -> Outcome<Classification> {
        let url = format!(
            "{}/api/classification/predict",
            self.endpoints.classification_url
        );
        let response: ClassificationResponse = self
            .post_json("classification", url, &ClassifyPayload { text, ticket_id })
            .await?;

        Ok(Classification {
            kind: response.prediction,
            confidence: response.confidence,
        })
    }

    async fn predict_churn(
        &self,
        ticket_id: &str,
        features: &ChurnFeatures,
    ) -> Outcome<ChurnPrediction> {
        let url = format!("{}/api/churn/predict", self.endpoints.churn_url);
        let prediction: ChurnPrediction = self
            .post_json(
                "churn",
                url,
                &ChurnPayload {
                    user_id: ticket_id,
                    features,
                },
            )
            .await?;

        if !(0.0..=1.0).contains(&prediction.churn_probability) {
            return Err(CapabilityError::InvalidResponse {
                capability: "churn",
                detail: format!(
                    "churn_probability {} outside [0, 1]",
                    prediction.churn_probability
                ),
            });
        }

        Ok(prediction)
    }

    async fn recommend(&self, input: &RecommendationInput) -> Outcome<Vec<String>> {
        let url = format!(
            "{}/api/recommendation/generate",
            self.endpoints.recommendation_url
        );
        let response: RecommendResponse = self
            .post_json(
                "recommendation",
                url,
                &RecommendPayload {
                    tipo: &input.kind,
                    sentimiento: input.sentiment,
                    churn: input.churn_score,
                    insights: input.insights.as_ref(),
                },
            )
            .await?;

        Ok(response.recomendaciones)
    }

    async fn fetch_insights(&self) -> Outcome<AnalyticsInsights> {
        let url = format!("{}/api/analytics/insights", self.endpoints.analytics_url);
        self.get_json("analytics", url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> HttpCapabilities {
        HttpCapabilities::new(
            CapabilityEndpoints::single_host(&server.uri()).with_timeout(Duration::from_secs(1)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_security_screen_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/security/detect-phishing"))
            .and(header("X-Source", "ticket-insight"))
            .and(body_partial_json(serde_json::json!({"text": "hola"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "isSafe": true,
                "threatsDetected": [],
                "anonymizedText": "hola"
            })))
            .mount(&server)
            .await;

        let report = client_for(&server).await.screen_security("hola").await.unwrap();
        assert!(report.is_safe);
        assert_eq!(report.anonymized_text, "hola");
    }

    #[tokio::test]
    async fn test_sentiment_normalizes_field_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/text/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sentiment": -0.8,
                "label": "NEGATIVO",
                "confidence": 0.9,
                "positive_score": 0.05,
                "negative_score": 0.85
            })))
            .mount(&server)
            .await;

        let sentiment = client_for(&server)
            .await
            .analyze_sentiment("todo falla")
            .await
            .unwrap();
        assert!((sentiment.score + 0.8).abs() < f64::EPSILON);
        assert_eq!(sentiment.label, "NEGATIVO");
    }

    #[tokio::test]
    async fn test_sentiment_out_of_range_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/text/sentiment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sentiment": 3.5,
                "label": "NEGATIVO"
            })))
            .mount(&server)
            .await;

        let error = client_for(&server)
            .await
            .analyze_sentiment("texto")
            .await
            .unwrap_err();
        assert!(matches!(error, CapabilityError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_classification_maps_prediction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/classification/predict"))
            .and(body_partial_json(
                serde_json::json!({"ticket_id": "TKT-000001"}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "prediction": "Correctivo",
                "confidence": 0.95,
                "ticket_id": "TKT-000001",
                "model_version": "1.0"
            })))
            .mount(&server)
            .await;

        let classification = client_for(&server)
            .await
            .classify("TKT-000001", "no funciona")
            .await
            .unwrap();
        assert_eq!(classification.kind, "Correctivo");
    }

    #[tokio::test]
    async fn test_http_error_status_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/churn/predict"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let features = ChurnFeatures {
            sentiment_score: -0.8,
            text_length: 20,
            num_threats: 0,
        };
        let error = client_for(&server)
            .await
            .predict_churn("TKT-000001", &features)
            .await
            .unwrap_err();
        assert!(matches!(error, CapabilityError::Unreachable { .. }));
        assert_eq!(error.capability(), "churn");
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/analytics/insights"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let error = client_for(&server).await.fetch_insights().await.unwrap_err();
        assert!(matches!(error, CapabilityError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_slow_capability_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/text/sentiment"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(5))
                    .set_body_json(serde_json::json!({"sentiment": 0.0, "label": "NEUTRO"})),
            )
            .mount(&server)
            .await;

        let client = HttpCapabilities::new(
            CapabilityEndpoints::single_host(&server.uri())
                .with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let error = client.analyze_sentiment("texto").await.unwrap_err();
        assert!(matches!(error, CapabilityError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused_is_unreachable() {
        // Nothing listens on this port.
        let client = HttpCapabilities::new(
            CapabilityEndpoints::single_host("http://127.0.0.1:1")
                .with_timeout(Duration::from_millis(500)),
        )
        .unwrap();

        let error = client.screen_security("hola").await.unwrap_err();
        assert!(matches!(error, CapabilityError::Unreachable { .. }));
    }

    #[tokio::test]
    async fn test_recommendation_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/recommendation/generate"))
            .and(body_partial_json(serde_json::json!({
                "tipo": "Correctivo",
                "churn": 70
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "recomendaciones": ["Escalar el incidente al equipo de soporte nivel 2."],
                "plantilla": "..."
            })))
            .mount(&server)
            .await;

        let input = RecommendationInput {
            kind: "Correctivo".to_string(),
            sentiment: -0.5,
            churn_score: 70,
            churn_level: ticket_core::ChurnLevel::Alto,
            insights: None,
        };
        let recommendations = client_for(&server).await.recommend(&input).await.unwrap();
        assert_eq!(recommendations.len(), 1);
    }
}
