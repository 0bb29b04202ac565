// HTTP Server Task - Serviert Steuerseite und WebSocket-Link
use core::future::pending;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::Duration;
use globe_core::StatusSnapshot;
use picoserve::{io::embedded_io_async, response::IntoResponse, response::ws, routing::get};

use crate::config::*;
use crate::link::LinkShared;
use crate::web::{INDEX_HTML, protocol::WsServerMessage};
use crate::{StatusChannel, StatusSubscriber};

/// Response-Enum für WebSocket-Endpoint
/// Ermöglicht Rückgabe von entweder WebSocket-Upgrade oder HTTP-Fehler
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(503),
                    "Service Unavailable: globe is already connected",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// - Serviert index.html auf GET /
/// - WebSocket-Endpoint auf /ws: genau eine Session ist der Transport-Link
/// - Leitet Binary-Nachrichten als Frames an den Controller weiter
/// - Sendet Status-Änderungen als JSON an den Client
///
/// **Task Pool:** Mehrere Instanzen, damit Seite und WebSocket gleichzeitig
/// bedient werden und ein zweiter Client sein 503 bekommt.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `link`: Geteilter Link-Zustand (Session-Gate und Frame-Queue)
/// - `status_channel`: PubSub Channel für Status-Broadcasts
#[embassy_executor::task(pool_size = 3)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    link: &'static LinkShared,
    status_channel: &'static StatusChannel,
) {
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/ws",
        get(
            move |upgrade: picoserve::response::WebSocketUpgrade| async move {
                info!("HTTP: WebSocket upgrade requested");

                // Nur ein Client gleichzeitig: solange der Controller nicht
                // wieder annimmt, bekommt jeder weitere Client HTTP 503
                if !link.is_accepting() {
                    info!("HTTP: Link busy, sending HTTP 503");
                    return WebSocketResponse::ServiceUnavailable;
                }

                match status_channel.subscriber() {
                    Ok(status_subscriber) => WebSocketResponse::Upgrade(upgrade.on_upgrade(
                        WebSocketHandler {
                            link,
                            status_subscriber,
                        },
                    )),
                    Err(_) => {
                        warn!("HTTP: No status subscriber slot available, sending HTTP 503");
                        WebSocketResponse::ServiceUnavailable
                    }
                }
            },
        ),
    );

    // Server-Konfiguration
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die Steuerseite
async fn serve_html() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// WebSocket-Handler State
struct WebSocketHandler {
    link: &'static LinkShared,
    status_subscriber: StatusSubscriber,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        // Zwei Upgrades können gleichzeitig das offene Gate gesehen haben,
        // nur eines bekommt die Session
        if !self.link.try_open_session() {
            info!("HTTP: Session already taken, closing WebSocket");
            return tx.close(Some((1013, "Try Again Later"))).await;
        }
        info!("HTTP: WebSocket session opened");

        let result = Self::serve_session(self.link, &mut self.status_subscriber, &mut rx, &mut tx)
            .await;

        // Trennung muss der Controller auch bei Socket-Fehlern sehen
        self.link.close_session();
        info!("HTTP: WebSocket session closed");

        tx.close(result?).await
    }
}

impl WebSocketHandler {
    /// Session-Schleife: Frames rein, Status raus
    ///
    /// Gibt den Close-Grund zurück, mit dem der Socket geschlossen wird.
    async fn serve_session<
        R: embedded_io_async::Read,
        W: embedded_io_async::Write<Error = R::Error>,
    >(
        link: &LinkShared,
        status_subscriber: &mut StatusSubscriber,
        rx: &mut ws::SocketRx<R>,
        tx: &mut ws::SocketTx<W>,
    ) -> Result<Option<(u16, &'static str)>, W::Error> {
        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        loop {
            match select(
                rx.next_message(&mut buffer, pending()),
                status_subscriber.next_message_pure(),
            )
            .await
            {
                Either::First(ws_result) => match ws_result?.ignore_never_b() {
                    Ok(ws::Message::Binary(data)) => link.push_frames(data).await,
                    Ok(ws::Message::Text(data)) => {
                        // Manche Clients schicken ASCII-Frames (z.B. "!B516") als Text
                        link.push_frames(data.as_bytes()).await;
                    }
                    Ok(ws::Message::Ping(data)) => tx.send_pong(data).await?,
                    Ok(ws::Message::Pong(_)) => {}
                    Ok(ws::Message::Close(_reason)) => {
                        info!("HTTP: WebSocket close received");
                        return Ok(None);
                    }
                    Err(error) => {
                        warn!("HTTP: WebSocket error");
                        let message = WsServerMessage::Error {
                            message: "WebSocket error",
                        };
                        Self::send_message(tx, &message).await.ok();
                        return Ok(Some((error.code(), "WebSocket Error")));
                    }
                },
                Either::Second(snapshot) => Self::send_status(tx, snapshot).await?,
            }
        }
    }

    async fn send_status<W: embedded_io_async::Write>(
        tx: &mut ws::SocketTx<W>,
        snapshot: StatusSnapshot,
    ) -> Result<(), W::Error> {
        Self::send_message(tx, &WsServerMessage::from(snapshot)).await
    }

    /// Serialisiert und sendet eine Server-Nachricht
    ///
    /// Passt die Nachricht nicht in den Buffer, wird sie verworfen.
    async fn send_message<W: embedded_io_async::Write>(
        tx: &mut ws::SocketTx<W>,
        message: &WsServerMessage,
    ) -> Result<(), W::Error> {
        let mut json_buffer = [0u8; JSON_BUFFER_SIZE];

        match serde_json_core::to_slice(message, &mut json_buffer) {
            Ok(n) => match core::str::from_utf8(&json_buffer[..n]) {
                Ok(json) => tx.send_text(json).await,
                Err(_) => Ok(()),
            },
            Err(_) => {
                warn!("HTTP: Message exceeds JSON buffer");
                Ok(())
            }
        }
    }
}
