use serde::{Deserialize, Serialize};

use crate::domain::overview::Insights;
use crate::domain::ticket::TicketId;
use crate::error::CoreError;

/// Outcome of the content-safety screen.
///
/// `is_safe = false` is informational: the pipeline keeps going and the flag
/// is surfaced to the consumer. Only capability unavailability aborts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityReport {
    pub is_safe: bool,
    pub threats_detected: Vec<String>,
    pub anonymized_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    /// Polarity in [-1, 1].
    pub score: f64,
    /// Human-readable label from the sentiment service (POSITIVO, NEUTRO, NEGATIVO).
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Ticket type from the classification service (Correctivo, Evolutivo, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Model confidence in [0, 1].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChurnLevel {
    Bajo,
    Medio,
    Alto,
}

impl ChurnLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bajo => "BAJO",
            Self::Medio => "MEDIO",
            Self::Alto => "ALTO",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "BAJO" => Ok(Self::Bajo),
            "MEDIO" => Ok(Self::Medio),
            "ALTO" => Ok(Self::Alto),
            other => Err(CoreError::UnknownChurnLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnRisk {
    /// Risk score in [0, 100].
    pub score: u8,
    pub level: ChurnLevel,
    /// True when the score was locally estimated because the churn
    /// capability was unavailable. Consumers should discount confidence.
    pub fallback_used: bool,
}

/// The aggregate report for one ticket. Assembled only once every mandatory
/// stage has resolved; never observable partially filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub ticket_id: TicketId,
    pub security: SecurityReport,
    pub classification: Classification,
    pub sentiment: Sentiment,
    pub churn_risk: ChurnRisk,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ticket::TicketIdGenerator;

    #[test]
    fn test_churn_level_round_trip() {
        for level in [ChurnLevel::Bajo, ChurnLevel::Medio, ChurnLevel::Alto] {
            assert_eq!(ChurnLevel::parse(level.as_str()).unwrap(), level);
        }
        assert!(ChurnLevel::parse("CRITICO").is_err());
    }

    #[test]
    fn test_churn_level_serialization() {
        let json = serde_json::to_string(&ChurnLevel::Alto).unwrap();
        assert_eq!(json, "\"ALTO\"");
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = AnalysisResult {
            ticket_id: TicketIdGenerator::new().next_id(),
            security: SecurityReport {
                is_safe: true,
                threats_detected: vec![],
                anonymized_text: "hola".to_string(),
            },
            classification: Classification {
                kind: "Correctivo".to_string(),
                confidence: 0.95,
            },
            sentiment: Sentiment {
                score: -0.4,
                label: "NEGATIVO".to_string(),
            },
            churn_risk: ChurnRisk {
                score: 72,
                level: ChurnLevel::Alto,
                fallback_used: true,
            },
            recommendations: vec!["Activar plan de retención".to_string()],
            insights: None,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"ticketId\""));
        assert!(json.contains("\"anonymizedText\""));
        assert!(json.contains("\"fallbackUsed\":true"));
        assert!(json.contains("\"type\":\"Correctivo\""));
        assert!(!json.contains("insights"));
    }
}
