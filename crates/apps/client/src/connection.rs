use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use protocol::ClientMessage;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsStream = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// What one receive poll produced.
#[derive(Debug)]
pub enum Inbound {
    /// A text frame to decode and merge.
    Text(String),
    /// The peer closed the socket.
    Closed,
    /// Transport failure; the connection is dead.
    TransportError(String),
}

/// Owns the single live server connection.
///
/// At most one socket is open at a time; `send` on a closed connection
/// is a silent no-op, so callers must never assume delivery. The merge
/// layer is built to tolerate missing acknowledgements.
pub struct ConnectionManager {
    sink: Option<WsSink>,
    stream: Option<WsStream>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            sink: None,
            stream: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Open the socket, replacing any previous connection. The caller
    /// must follow up with the `start` catch-up message before anything
    /// renders.
    pub async fn connect(
        &mut self,
        url: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (socket, _response) = connect_async(url).await?;
        let (sink, stream) = socket.split();
        self.sink = Some(sink);
        self.stream = Some(stream);
        Ok(())
    }

    /// Send a message, silently dropping it if the socket is not open.
    /// A failed send marks the connection closed.
    pub async fn send(&mut self, message: &ClientMessage) {
        let Some(sink) = self.sink.as_mut() else {
            debug!("dropping outbound message: connection not open");
            return;
        };
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(err) => {
                warn!("outbound serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = sink.send(Message::Text(text)).await {
            warn!("send failed, closing connection: {err}");
            self.close();
        }
    }

    pub fn close(&mut self) {
        self.sink = None;
        self.stream = None;
    }

    /// Wait for the next inbound event. Pending forever while closed,
    /// so it can sit in a select arm without spinning.
    pub async fn recv(&mut self) -> Inbound {
        if self.stream.is_none() {
            return std::future::pending().await;
        }
        loop {
            let next = match self.stream.as_mut() {
                Some(stream) => stream.next().await,
                None => return Inbound::Closed,
            };
            match next {
                Some(Ok(Message::Text(text))) => return Inbound::Text(text),
                Some(Ok(Message::Close(_))) | None => {
                    self.close();
                    return Inbound::Closed;
                }
                Some(Ok(Message::Binary(_))) => {
                    debug!("ignoring unexpected binary frame");
                }
                // Pings are answered by the transport; nothing to do.
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    self.close();
                    return Inbound::TransportError(err.to_string());
                }
            }
        }
    }
}
