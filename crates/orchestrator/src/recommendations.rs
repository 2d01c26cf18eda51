//! Local recommendation selector.
//!
//! Mirrors the rule table of the recommendation service so the pipeline can
//! still produce actionable output when that service is unreachable. Rules
//! are applied in priority order and every match contributes an entry; the
//! default entry appears only when nothing matched.

use capabilities::RecommendationInput;
use ticket_core::ChurnLevel;

pub const CONTACT_24H: &str =
    "Contactar al cliente en menos de 24 horas debido al sentimiento negativo.";
pub const RETENTION_PLAN: &str = "Activar plan de retención y ofrecer beneficios adicionales.";
pub const ESCALATE_TIER2: &str = "Escalar el incidente al equipo de soporte nivel 2.";
pub const DEFAULT_FOLLOW_UP: &str =
    "Realizar seguimiento regular y evaluar necesidades del cliente.";

/// Select recommendations for the analyzed ticket. Never returns an empty list.
pub fn select(input: &RecommendationInput) -> Vec<String> {
    let mut recommendations = Vec::new();

    if input.sentiment < -0.3 {
        recommendations.push(CONTACT_24H.to_string());
    }

    if input.churn_score > 60 || input.churn_level == ChurnLevel::Alto {
        recommendations.push(RETENTION_PLAN.to_string());
    }

    if input.kind.eq_ignore_ascii_case("correctivo") {
        recommendations.push(ESCALATE_TIER2.to_string());
    }

    if let Some(factor) = input
        .insights
        .as_ref()
        .and_then(|insights| insights.principal_factor.as_deref())
    {
        recommendations.push(format!(
            "Investigar el factor principal identificado: {}",
            factor
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(DEFAULT_FOLLOW_UP.to_string());
    }

    recommendations
}
