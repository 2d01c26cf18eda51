//! Progress broadcaster built on tokio broadcast channels

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use ticket_core::TicketId;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::types::{EventEnvelope, ProgressEvent};

/// Capacity for the broadcast channel
const DEFAULT_CAPACITY: usize = 1000;

/// Broadcaster for per-ticket progress events.
///
/// Publishing is fire-and-forget: slow or absent subscribers never block the
/// pipeline that emits. Within one ticket, events arrive in publish order
/// because its pipeline emits sequentially; across tickets no ordering is
/// guaranteed. Subscribers only see events published after they joined.
#[derive(Clone)]
pub struct ProgressBus {
    sender: broadcast::Sender<EventEnvelope>,
    /// Number of events published (for monitoring)
    event_count: Arc<AtomicUsize>,
}

impl ProgressBus {
    /// Create a new bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new bus with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            event_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Publish a progress event to all subscribers
    ///
    /// Returns the number of subscribers that received the event.
    /// If there are no subscribers, returns 0 (the event is dropped).
    pub fn publish(&self, event: ProgressEvent) -> usize {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Subscribe to events for all tickets
    ///
    /// Note: events published before subscribing will not be received.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Subscribe to the events of a single ticket.
    ///
    /// Lagged receivers skip dropped events instead of ending the stream.
    pub fn subscribe_ticket(
        &self,
        ticket_id: TicketId,
    ) -> impl Stream<Item = ProgressEvent> + Send + Unpin {
        BroadcastStream::new(self.subscribe())
            .filter_map(move |result| {
                let ticket_id = ticket_id.clone();
                async move {
                    match result {
                        Ok(envelope) if envelope.event.ticket_id == ticket_id => {
                            Some(envelope.event)
                        }
                        Ok(_) => None,
                        Err(e) => {
                            tracing::warn!("progress subscriber lagged: {:?}", e);
                            None
                        }
                    }
                }
            })
            .boxed()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the total number of events published
    pub fn event_count(&self) -> usize {
        self.event_count.load(Ordering::Relaxed)
    }
}

impl Default for ProgressBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressBus")
            .field("subscriber_count", &self.subscriber_count())
            .field("event_count", &self.event_count())
            .finish()
    }
}
