//! Progress event types for ticket analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticket_core::TicketId;
use uuid::Uuid;

/// Number of pipeline steps reported to observers.
pub const TOTAL_STEPS: u8 = 4;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ProgressEvent,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: ProgressEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    Progress,
    Complete,
    Error,
}

/// One progress notification for one ticket.
///
/// For a given ticket, observers see events in strictly increasing `step`
/// order, and a `complete` or `error` event is always the last one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub ticket_id: TicketId,
    /// Pipeline step, 1..=4.
    pub step: u8,
    /// Always step / 4 * 100; no sub-step progress is reported.
    pub percentage: u8,
    pub message: String,
    pub phase: ProgressPhase,
}

impl ProgressEvent {
    pub fn progress(ticket_id: TicketId, step: u8, message: impl Into<String>) -> Self {
        Self {
            ticket_id,
            step,
            percentage: Self::percentage_for(step),
            message: message.into(),
            phase: ProgressPhase::Progress,
        }
    }

    pub fn complete(ticket_id: TicketId, message: impl Into<String>) -> Self {
        Self {
            ticket_id,
            step: TOTAL_STEPS,
            percentage: 100,
            message: message.into(),
            phase: ProgressPhase::Complete,
        }
    }

    pub fn error(ticket_id: TicketId, step: u8, message: impl Into<String>) -> Self {
        Self {
            ticket_id,
            step,
            percentage: Self::percentage_for(step),
            message: message.into(),
            phase: ProgressPhase::Error,
        }
    }

    /// True for the last event a ticket will ever emit.
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, ProgressPhase::Complete | ProgressPhase::Error)
    }

    fn percentage_for(step: u8) -> u8 {
        (step.min(TOTAL_STEPS) as u16 * 100 / TOTAL_STEPS as u16) as u8
    }
}
