//! Live cart updates over WebSocket.
//!
//! Each connection gets the current summary on connect and a fresh one after
//! every committed cart change.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::cart::CartChanged;
use crate::state::AppState;

/// Message pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: u32,
    pub subtotal: String,
    pub persisted: bool,
}

impl From<&CartChanged> for CartSummary {
    fn from(change: &CartChanged) -> Self {
        Self {
            item_count: change.item_count,
            subtotal: change.subtotal.display(),
            persisted: change.persisted,
        }
    }
}

/// Upgrade to a WebSocket streaming [`CartSummary`] messages.
pub async fn events(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let (initial, receiver) = {
        let engine = state.cart().await;
        let initial = CartSummary {
            item_count: engine.item_count(),
            subtotal: engine.subtotal().display(),
            persisted: !engine.persistence_degraded(),
        };
        (initial, engine.subscribe())
    };

    ws.on_upgrade(move |socket| {
        let (outgoing, incoming) = socket.split();
        push_changes(outgoing, incoming, receiver, initial)
    })
}

/// Send `initial`, then one summary per change until the client goes away
/// or the engine's channel closes.
async fn push_changes<Tx, Rx>(
    mut outgoing: Tx,
    mut incoming: Rx,
    mut receiver: broadcast::Receiver<CartChanged>,
    initial: CartSummary,
) where
    Tx: Sink<Message> + Unpin,
    Rx: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    if send(&mut outgoing, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            message = incoming.next() => {
                match message {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    _ => {}
                }
            }
            next = receiver.recv() => {
                match next {
                    Ok(change) => {
                        if send(&mut outgoing, &CartSummary::from(&change)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Cart event subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

async fn send<Tx>(outgoing: &mut Tx, summary: &CartSummary) -> Result<(), Tx::Error>
where
    Tx: Sink<Message> + Unpin,
{
    let payload = match serde_json::to_string(summary) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode cart summary");
            return Ok(());
        }
    };
    outgoing.send(Message::Text(payload.into())).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use acumen_core::{CurrencyCode, Price, ProductId};
    use futures::channel::mpsc;
    use rust_decimal::Decimal;
    use tokio::time::timeout;

    use super::*;
    use crate::cart::{CartEngine, MemoryStorage};
    use crate::catalog::Catalog;

    async fn next_summary(sent: &mut mpsc::UnboundedReceiver<Message>) -> serde_json::Value {
        let message = timeout(Duration::from_secs(1), sent.next())
            .await
            .unwrap()
            .unwrap();
        match message {
            Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
            other => panic!("expected a text frame, got {other:?}"),
        }
    }

    #[test]
    fn test_summary_from_change() {
        let change = CartChanged {
            lines: Vec::new(),
            item_count: 2,
            subtotal: Price::new(Decimal::from(17_998), CurrencyCode::USD),
            persisted: false,
        };

        let summary = CartSummary::from(&change);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.subtotal, "$17,998.00");
        assert!(!summary.persisted);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["item_count"], 2);
    }

    #[tokio::test]
    async fn test_pushes_one_summary_per_committed_change() {
        let mut engine = CartEngine::load(Catalog::builtin().unwrap(), MemoryStorage::new());
        let receiver = engine.subscribe();
        let initial = CartSummary {
            item_count: 0,
            subtotal: engine.subtotal().display(),
            persisted: true,
        };

        let (outgoing, mut sent) = mpsc::unbounded::<Message>();
        let (client, incoming) = mpsc::unbounded::<Result<Message, axum::Error>>();
        let task = tokio::spawn(push_changes(outgoing, incoming, receiver, initial));

        let first = next_summary(&mut sent).await;
        assert_eq!(first["item_count"], 0);
        assert_eq!(first["subtotal"], "$0.00");

        engine.add(&ProductId::new("axion01"), 2).unwrap();
        let added = next_summary(&mut sent).await;
        assert_eq!(added["item_count"], 2);
        assert_eq!(added["subtotal"], "$17,998.00");
        assert_eq!(added["persisted"], true);

        // A no-op must not reach the socket: the next frame is the clear.
        assert!(!engine.remove(&ProductId::new("nova02")));
        assert!(engine.clear());
        let cleared = next_summary(&mut sent).await;
        assert_eq!(cleared["item_count"], 0);

        drop(client);
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
        assert!(sent.next().await.is_none());
    }

    #[tokio::test]
    async fn test_stops_when_engine_is_dropped() {
        let engine = CartEngine::load(Catalog::builtin().unwrap(), MemoryStorage::new());
        let receiver = engine.subscribe();
        let initial = CartSummary {
            item_count: 0,
            subtotal: "$0.00".to_string(),
            persisted: true,
        };

        let (outgoing, mut sent) = mpsc::unbounded::<Message>();
        let (_client, incoming) = mpsc::unbounded::<Result<Message, axum::Error>>();
        let task = tokio::spawn(push_changes(outgoing, incoming, receiver, initial));

        next_summary(&mut sent).await;
        drop(engine);
        timeout(Duration::from_secs(1), task).await.unwrap().unwrap();
    }
}
