use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::MovementStatus;

/// Movement lifecycle events emitted by the store after each committed
/// mutation. Consumers observe them on a single processor task; emission
/// is best-effort and never blocks or fails a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    MovementCreated {
        movement_id: Uuid,
        status: MovementStatus,
        timestamp: DateTime<Utc>,
    },
    MovementUpdated {
        movement_id: Uuid,
        status: MovementStatus,
        timestamp: DateTime<Utc>,
    },
    MovementDeleted {
        movement_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, logging instead of failing when the processor is gone.
    pub async fn send(&self, event: Event) {
        if let Err(err) = self.sender.send(event).await {
            warn!("event channel closed, dropping event: {}", err);
        }
    }
}

/// Builds a connected sender/processor pair with the given channel depth.
pub fn channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Runs until every sender
/// is dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::MovementCreated {
                movement_id,
                status,
                ..
            } => info!(%movement_id, %status, "movement created"),
            Event::MovementUpdated {
                movement_id,
                status,
                ..
            } => info!(%movement_id, %status, "movement updated"),
            Event::MovementDeleted { movement_id, .. } => {
                info!(%movement_id, "movement deleted")
            }
        }
    }
}
