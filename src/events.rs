use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the SKU service after successful writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    SkuCreated { id: Uuid, sku_code: String },
    SkuBatchCreated { count: usize },
    SkuUpdated { id: Uuid },
    SkuDeleted { id: Uuid },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event. Delivery is best-effort: a full or closed channel is
    /// logged and swallowed so event plumbing never fails a request.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.sender.send(event).await {
            warn!("Failed to send event: {}", e);
        }
    }
}

/// Background consumer for service events. Runs until the channel closes.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::SkuCreated { id, sku_code } => {
                info!(sku_id = %id, sku_code = %sku_code, "event: SKU created")
            }
            Event::SkuBatchCreated { count } => {
                info!(count = count, "event: SKU batch created")
            }
            Event::SkuUpdated { id } => info!(sku_id = %id, "event: SKU updated"),
            Event::SkuDeleted { id } => info!(sku_id = %id, "event: SKU soft-deleted"),
        }
    }
}
