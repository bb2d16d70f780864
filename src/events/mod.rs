use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

/// Events emitted by the catalog services after successful mutations and
/// derived-state recomputes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Product events
    ProductCreated(Uuid),
    ProductUpdated(Uuid),
    ProductDeleted(Uuid),

    // Category events
    CategoryCreated(Uuid),
    CategoryUpdated(Uuid),
    CategoryDeleted(Uuid),

    // Review events
    ReviewCreated { review_id: Uuid, product_id: Uuid },
    ReviewUpdated { review_id: Uuid, product_id: Uuid },
    ReviewDeleted { review_id: Uuid, product_id: Uuid },

    // Derived-state events
    ProductRatingRecomputed {
        product_id: Uuid,
        average_rating: Decimal,
        review_count: i32,
    },
    CategoryCountRecomputed {
        category_id: Uuid,
        product_count: u64,
    },
    DynamicCategoryRefreshed {
        category_id: Uuid,
        name: String,
        member_count: usize,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging a warning instead of failing the caller when
    /// the channel is closed. Event delivery is best-effort.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event delivery failed: {}", e);
        }
    }
}

/// Processes incoming events. Currently the events only feed structured logs;
/// downstream consumers would subscribe here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match event {
            Event::ProductRatingRecomputed {
                product_id,
                average_rating,
                review_count,
            } => {
                info!(
                    %product_id,
                    %average_rating,
                    review_count,
                    "Product rating recomputed"
                );
            }
            Event::CategoryCountRecomputed {
                category_id,
                product_count,
            } => {
                info!(%category_id, product_count, "Category product count recomputed");
            }
            Event::DynamicCategoryRefreshed {
                category_id,
                ref name,
                member_count,
            } => {
                info!(%category_id, name, member_count, "Dynamic category refreshed");
            }
            other => {
                info!("Event: {:?}", other);
            }
        }
    }

    info!("Event processing loop stopped");
}
