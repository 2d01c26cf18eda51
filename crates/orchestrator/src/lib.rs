pub mod analyzer;
pub mod churn;
pub mod error;
pub mod recommendations;
pub mod state_machine;

mod overview;

pub use analyzer::TicketAnalyzer;
pub use error::{AnalysisError, Result};
pub use state_machine::{AnalysisStage, AnalysisStateMachine};
