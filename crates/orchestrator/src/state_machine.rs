use crate::error::{AnalysisError, Result};

/// Stages of the ticket analysis pipeline.
///
/// `Failed` is only reachable while a hard-fail stage is running; once the
/// pipeline has sentiment and classification in hand, the remaining stages
/// degrade through fallbacks instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Init,
    Security,
    TextAndClassification,
    Churn,
    Recommendation,
    Complete,
    Failed,
}

impl AnalysisStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Security => "security",
            Self::TextAndClassification => "text_and_classification",
            Self::Churn => "churn",
            Self::Recommendation => "recommendation",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Progress step reported to observers, 1..=4 for the working stages.
    pub fn step(&self) -> Option<u8> {
        match self {
            Self::Security => Some(1),
            Self::TextAndClassification => Some(2),
            Self::Churn => Some(3),
            Self::Recommendation => Some(4),
            Self::Init | Self::Complete | Self::Failed => None,
        }
    }

    /// Observer-facing description of the stage.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Init => "Ticket recibido",
            Self::Security => "Iniciando análisis de seguridad...",
            Self::TextAndClassification => "Analizando texto y clasificación...",
            Self::Churn => "Calculando riesgo de churn...",
            Self::Recommendation => "Generando recomendaciones...",
            Self::Complete => "Análisis completado",
            Self::Failed => "Falló el análisis del ticket",
        }
    }
}

pub struct AnalysisStateMachine;

impl AnalysisStateMachine {
    pub fn validate_transition(from: AnalysisStage, to: AnalysisStage) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(&to) {
            Ok(())
        } else {
            Err(AnalysisError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    fn allowed_transitions(from: AnalysisStage) -> Vec<AnalysisStage> {
        match from {
            AnalysisStage::Init => vec![AnalysisStage::Security, AnalysisStage::Failed],
            AnalysisStage::Security => {
                vec![AnalysisStage::TextAndClassification, AnalysisStage::Failed]
            }
            AnalysisStage::TextAndClassification => {
                vec![AnalysisStage::Churn, AnalysisStage::Failed]
            }
            AnalysisStage::Churn => vec![AnalysisStage::Recommendation],
            AnalysisStage::Recommendation => vec![AnalysisStage::Complete],
            AnalysisStage::Complete | AnalysisStage::Failed => vec![],
        }
    }

    pub fn can_transition(from: AnalysisStage, to: AnalysisStage) -> bool {
        Self::validate_transition(from, to).is_ok()
    }

    pub fn next_stage(current: AnalysisStage) -> Option<AnalysisStage> {
        match current {
            AnalysisStage::Init => Some(AnalysisStage::Security),
            AnalysisStage::Security => Some(AnalysisStage::TextAndClassification),
            AnalysisStage::TextAndClassification => Some(AnalysisStage::Churn),
            AnalysisStage::Churn => Some(AnalysisStage::Recommendation),
            AnalysisStage::Recommendation => Some(AnalysisStage::Complete),
            AnalysisStage::Complete | AnalysisStage::Failed => None,
        }
    }
}
