//! WebSocket read pump: routes replies to their pending requests.

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use filebay_protocol::constants::{WS_MAX_MESSAGE_SIZE, WS_PONG_WAIT};
use filebay_protocol::envelope::Message;

use crate::ws_client::PendingMap;

/// Reads messages from the WebSocket and routes them.
///
/// Uses a pong deadline to detect dead connections: any incoming frame
/// resets the timer; if nothing arrives within [`WS_PONG_WAIT`] the
/// connection is considered dead and the loop exits.
pub(crate) async fn read_pump<S>(
    mut read: S,
    pending: PendingMap,
    write_tx: mpsc::Sender<tungstenite::Message>,
    cancel: CancellationToken,
) where
    S: StreamExt<Item = Result<tungstenite::Message, tungstenite::Error>> + Unpin,
{
    let pong_deadline = tokio::time::sleep(WS_PONG_WAIT);
    tokio::pin!(pong_deadline);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,

            () = &mut pong_deadline => {
                warn!("pong timeout, closing connection");
                break;
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(msg)) => {
                        pong_deadline.as_mut().reset(tokio::time::Instant::now() + WS_PONG_WAIT);

                        match msg {
                            tungstenite::Message::Text(text) => {
                                handle_text_message(&text, &pending).await;
                            }
                            tungstenite::Message::Ping(data) => {
                                trace!("received ping, sending pong");
                                let _ = write_tx.send(tungstenite::Message::Pong(data)).await;
                            }
                            tungstenite::Message::Pong(_) => {
                                trace!("received pong");
                            }
                            tungstenite::Message::Close(_) => {
                                debug!("received close frame");
                                break;
                            }
                            _ => {} // Binary frames ignored.
                        }
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {e}");
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                }
            }
        }
    }

    // Fail any requests still in flight so their callers see Closed
    // instead of waiting out the timeout.
    pending.lock().await.clear();
}

/// Routes a text (JSON) message to its pending request.
async fn handle_text_message(text: &str, pending: &PendingMap) {
    if text.len() > WS_MAX_MESSAGE_SIZE {
        warn!("message too large ({} bytes), dropping", text.len());
        return;
    }

    let msg: Message = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!("failed to parse message: {e}");
            return;
        }
    };

    trace!(msg_type = ?msg.msg_type, id = %msg.id, "received message");

    let mut map = pending.lock().await;
    if let Some(tx) = map.remove(&msg.id) {
        let _ = tx.send(msg);
    } else {
        warn!(msg_type = ?msg.msg_type, id = %msg.id, "unsolicited message, dropping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filebay_protocol::constants::MessageType;
    use futures_util::stream;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::{Mutex, oneshot};

    #[tokio::test]
    async fn handle_text_routes_response_to_pending() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert("req-1".into(), tx);

        let msg = Message::new::<()>("req-1", MessageType::Pong, None).unwrap();
        let json = serde_json::to_string(&msg).unwrap();

        handle_text_message(&json, &pending).await;

        let resp = rx.await.unwrap();
        assert_eq!(resp.id, "req-1");
        assert_eq!(resp.msg_type, MessageType::Pong);
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn handle_text_ignores_malformed_json() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        handle_text_message("not valid json {{{", &pending).await;
    }

    #[tokio::test]
    async fn handle_text_drops_unsolicited_message() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let msg = Message::new::<()>("stray-1", MessageType::Pong, None).unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        handle_text_message(&json, &pending).await;
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn read_pump_fails_pending_on_stream_end() {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let (tx, rx) = oneshot::channel();
        pending.lock().await.insert("req-1".into(), tx);

        let cancel = CancellationToken::new();
        let (write_tx, _write_rx) = mpsc::channel(16);
        let empty = stream::empty::<Result<tungstenite::Message, tungstenite::Error>>();

        read_pump(empty, pending.clone(), write_tx, cancel).await;

        // The pending sender was dropped, so the waiter gets an error.
        assert!(rx.await.is_err());
        assert!(pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn read_pump_timeout_on_silence() {
        // With no messages arriving, the pong deadline should fire.
        tokio::time::pause();

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let cancel = CancellationToken::new();
        let (write_tx, _write_rx) = mpsc::channel(16);

        // A stream that never yields simulates silence.
        let stream = stream::pending::<Result<tungstenite::Message, tungstenite::Error>>();

        read_pump(Box::pin(stream), pending, write_tx, cancel).await;
    }
}
