use serde::{Deserialize, Serialize};

/// Enrichment produced by the analytics service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// The dominant driver behind recent ticket activity, when one stands out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_factor: Option<String>,
    /// Free-form observations (correlations, trends) from analytics.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Dashboard overview. The first three fields are always present; the rest
/// degrade to `None` when the analytics collaborator is unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_tickets: u64,
    pub avg_sentiment: f64,
    pub alerts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_overview_omits_enrichment() {
        let overview = Overview {
            total_tickets: 150,
            avg_sentiment: 0.65,
            alerts: 3,
            top_factor: None,
            insights: None,
        };

        let json = serde_json::to_string(&overview).unwrap();
        assert!(json.contains("\"totalTickets\":150"));
        assert!(!json.contains("topFactor"));
        assert!(!json.contains("insights"));
    }

    #[test]
    fn test_insights_deserialization() {
        let json = r#"{"principalFactor":"latencia del servicio","notes":["picos nocturnos"]}"#;
        let insights: Insights = serde_json::from_str(json).unwrap();
        assert_eq!(insights.principal_factor.as_deref(), Some("latencia del servicio"));
        assert_eq!(insights.notes.len(), 1);
    }
}
