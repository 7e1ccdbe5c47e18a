//! # Kitchen Event Fan-Out
//!
//! Publishes kitchen status changes to WebSocket subscribers.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Kitchen Event Flow                                  │
//! │                                                                         │
//! │  PATCH /kitchen/orders/{code}/status                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EventHub::publish ──► tokio::sync::broadcast ──┬──► Kitchen display 1 │
//! │                                                 ├──► Kitchen display 2 │
//! │                                                 └──► Counter screen    │
//! │                                                                         │
//! │  Subscribers connect via GET /kitchen/events (WebSocket upgrade).      │
//! │  Fire-and-forget: no subscribers is fine, slow subscribers lag and     │
//! │  resynchronize by refetching the queue.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use ramen_core::{OrderSource, OrderStatus};

use crate::state::AppState;

// =============================================================================
// Event Type
// =============================================================================

/// One kitchen status change, as delivered to subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenEvent {
    pub order_code: String,
    pub status: OrderStatus,
    pub source_type: OrderSource,
}

// =============================================================================
// Event Hub
// =============================================================================

/// Broadcast hub for kitchen events.
#[derive(Debug, Clone)]
pub struct EventHub {
    tx: broadcast::Sender<KitchenEvent>,
}

impl EventHub {
    /// Creates a hub with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        EventHub { tx }
    }

    /// Publishes an event to all current subscribers.
    ///
    /// Zero subscribers is not an error.
    pub fn publish(&self, event: KitchenEvent) {
        let receivers = self.tx.receiver_count();
        debug!(
            order_code = %event.order_code,
            status = ?event.status,
            receivers,
            "Publishing kitchen event"
        );
        let _ = self.tx.send(event);
    }

    /// Subscribes to the event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<KitchenEvent> {
        self.tx.subscribe()
    }
}

// =============================================================================
// WebSocket Handler
// =============================================================================

/// WebSocket upgrade handler for `GET /kitchen/events`.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    info!("New kitchen event subscriber");
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Forwards broadcast events to one WebSocket client until it disconnects.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!(?e, "Failed to serialize kitchen event");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // The client missed events; it should refetch the
                        // queue. Keep the connection alive.
                        warn!(skipped, "Kitchen event subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    // Subscribers don't talk back; drain pings and ignore text.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                }
            }
        }
    }

    debug!("Kitchen event subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let hub = EventHub::new(8);
        let mut rx = hub.subscribe();

        hub.publish(KitchenEvent {
            order_code: "0001".to_string(),
            status: OrderStatus::Preparing,
            source_type: OrderSource::Pos,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.order_code, "0001");
        assert_eq!(event.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let hub = EventHub::new(8);
        hub.publish(KitchenEvent {
            order_code: "0002".to_string(),
            status: OrderStatus::Ready,
            source_type: OrderSource::Mobile,
        });
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_string(&KitchenEvent {
            order_code: "0001".to_string(),
            status: OrderStatus::Ready,
            source_type: OrderSource::Pos,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"orderCode":"0001","status":"ready","sourceType":"pos"}"#
        );
    }
}
