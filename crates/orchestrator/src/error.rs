use thiserror::Error;

use crate::state_machine::AnalysisStage;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The submitted ticket text was empty. No pipeline is started.
    #[error("Ticket text is required")]
    EmptyTicket,

    /// A hard-fail stage aborted the pipeline. The downstream cause is
    /// logged, not carried here, so it cannot leak to callers.
    #[error("Ticket analysis failed at the {} stage", stage.as_str())]
    AnalysisFailed { stage: AnalysisStage },

    #[error("Invalid stage transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_failed_names_stage_only() {
        let error = AnalysisError::AnalysisFailed {
            stage: AnalysisStage::Security,
        };
        let message = error.to_string();
        assert!(message.contains("security"));
        assert!(!message.to_lowercase().contains("timeout"));
    }
}
