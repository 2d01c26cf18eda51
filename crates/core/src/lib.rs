pub mod domain;
pub mod error;

pub use domain::analysis::{
    AnalysisResult, ChurnLevel, ChurnRisk, Classification, SecurityReport, Sentiment,
};
pub use domain::overview::{Insights, Overview};
pub use domain::ticket::{AnalysisRequest, TicketId, TicketIdGenerator};
pub use error::CoreError;
