use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier assigned to a ticket at submission time.
///
/// Ids are unique and monotonically increasing within a process; they are
/// never reused, even for tickets submitted in the same millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Process-local sequence for ticket ids.
///
/// Owned by the analyzer rather than living in a module-level static, so
/// there is no "not yet initialized" failure mode and tests can run with
/// independent sequences.
#[derive(Debug, Default)]
pub struct TicketIdGenerator {
    next: AtomicU64,
}

impl TicketIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> TicketId {
        let seq = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        TicketId(format!("TKT-{:06}", seq))
    }
}

/// One submitted ticket, immutable for the lifetime of its pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub ticket_id: TicketId,
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(ticket_id: TicketId, text: impl Into<String>) -> Self {
        Self {
            ticket_id,
            text: text.into(),
        }
    }
}
