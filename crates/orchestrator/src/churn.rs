//! Churn risk mapping and the local fallback estimator.

use capabilities::ChurnPrediction;
use ticket_core::{ChurnLevel, ChurnRisk};

/// Fallback severity ceiling. Deliberately below the true capability maximum
/// of 100: a locally estimated score carries less confidence.
const FALLBACK_MAX: f64 = 80.0;

/// Estimate churn risk from the sentiment score alone.
///
/// Used when the churn capability is unavailable. Maps fully negative
/// sentiment (-1) to 80 and fully positive (+1) to 0. Deterministic and
/// side-effect-free.
pub fn estimate_from_sentiment(sentiment_score: f64) -> ChurnRisk {
    let approx = (((-sentiment_score + 1.0) / 2.0) * FALLBACK_MAX)
        .round()
        .clamp(0.0, 100.0) as u8;

    ChurnRisk {
        score: approx,
        level: level_for_score(approx),
        fallback_used: true,
    }
}

/// Map a churn service prediction onto the local scale.
pub fn from_prediction(prediction: &ChurnPrediction) -> ChurnRisk {
    let score = (prediction.churn_probability * 100.0).round().clamp(0.0, 100.0) as u8;

    let level = match prediction.risk_level.as_str() {
        "HIGH" => ChurnLevel::Alto,
        "MEDIUM" => ChurnLevel::Medio,
        _ => ChurnLevel::Bajo,
    };

    ChurnRisk {
        score,
        level,
        fallback_used: false,
    }
}

fn level_for_score(score: u8) -> ChurnLevel {
    if score > 66 {
        ChurnLevel::Alto
    } else if score > 33 {
        ChurnLevel::Medio
    } else {
        ChurnLevel::Bajo
    }
}
