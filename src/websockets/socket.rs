use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::StreamExt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::messages::OutboundMessage;
use crate::scope::ConnectionId;

/// Text-only view of a client socket
///
/// The relay never looks at binary or control frames, so implementations
/// surface text and report the end of the stream as `Ok(None)`.
#[async_trait]
pub trait SocketWrapper: Send {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError>;

    /// Next text frame, or `None` once the client has gone
    async fn receive_message(&mut self) -> Result<Option<String>, SocketError>;

    async fn close(&mut self) -> Result<(), SocketError>;
}

/// Receives every text frame a client sends
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle_message(&self, connection_id: &ConnectionId, message: String);
}

#[derive(Debug, Error)]
pub enum SocketError {
    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Receive failed: {0}")]
    ReceiveFailed(String),
}

#[async_trait]
impl SocketWrapper for WebSocket {
    async fn send_message(&mut self, message: String) -> Result<(), SocketError> {
        self.send(Message::Text(message))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }

    async fn receive_message(&mut self) -> Result<Option<String>, SocketError> {
        while let Some(frame) = self.next().await {
            match frame.map_err(|e| SocketError::ReceiveFailed(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Close(_) => return Ok(None),
                // axum answers pings itself; binary frames mean nothing here
                Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), SocketError> {
        self.send(Message::Close(None))
            .await
            .map_err(|e| SocketError::SendFailed(e.to_string()))
    }
}

/// Why one turn of the connection loop ended
enum Step {
    Continue,
    /// Outbound channel closed, i.e. the connection manager forgot us
    Unregistered,
    ClientLeft,
}

/// One subscriber socket plus the outbound queue feeding it
///
/// Envelopes queued by the dispatcher are written out in arrival order while
/// join/leave frames from the client go to the message handler.
pub struct Connection {
    pub connection_id: ConnectionId,
    socket: Box<dyn SocketWrapper>,
    outbound_receiver: mpsc::UnboundedReceiver<OutboundMessage>,
    message_handler: Arc<dyn MessageHandler>,
}

impl Connection {
    pub fn new(
        connection_id: ConnectionId,
        socket: Box<dyn SocketWrapper>,
        outbound_receiver: mpsc::UnboundedReceiver<OutboundMessage>,
        message_handler: Arc<dyn MessageHandler>,
    ) -> Self {
        Self {
            connection_id,
            socket,
            outbound_receiver,
            message_handler,
        }
    }

    /// Pump both directions until either side ends
    ///
    /// A socket error is returned as is; the caller owns cleanup.
    pub async fn run(mut self) -> Result<(), SocketError> {
        loop {
            let step = tokio::select! {
                queued = self.outbound_receiver.recv() => match queued {
                    Some(message) => self.forward_outbound(message).await?,
                    None => Step::Unregistered,
                },
                frame = self.socket.receive_message() => match frame? {
                    Some(text) => self.dispatch_inbound(text).await,
                    None => Step::ClientLeft,
                },
            };

            match step {
                Step::Continue => {}
                Step::Unregistered | Step::ClientLeft => break,
            }
        }

        debug!(connection_id = %self.connection_id, "Closing socket");
        if let Err(e) = self.socket.close().await {
            debug!(connection_id = %self.connection_id, error = %e, "Socket already gone");
        }
        Ok(())
    }

    async fn forward_outbound(&mut self, message: OutboundMessage) -> Result<Step, SocketError> {
        match message.to_json() {
            Ok(frame) => self.socket.send_message(frame).await?,
            Err(e) => warn!(
                connection_id = %self.connection_id,
                topic = message.topic,
                error = %e,
                "Dropping unserializable outbound message"
            ),
        }
        Ok(Step::Continue)
    }

    async fn dispatch_inbound(&mut self, text: String) -> Step {
        self.message_handler
            .handle_message(&self.connection_id, text)
            .await;
        Step::Continue
    }
}
