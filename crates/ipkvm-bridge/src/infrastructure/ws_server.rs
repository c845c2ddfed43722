//! WebSocket server: accept loop and per-session tasks.
//!
//! Each browser connection gets its own Tokio task.  The task:
//!
//! 1. Completes the WebSocket handshake (only on [`WS_PATH`]).
//! 2. Sends the welcome message carrying the configured app title.
//! 3. Reads text frames, decodes them into [`InboundMessage`]s, and hands
//!    them to the shared [`EventRouter`](crate::application::EventRouter).
//! 4. On disconnect, cancels any text injection the session started.
//!
//! A bad frame never ends a session: undecodable messages and failed serial
//! writes are logged and the next frame is read.
//!
//! Shutdown is driven by a shared `AtomicBool` cleared by the Ctrl+C handler
//! in `main.rs`; the accept loop polls it every 200 ms.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{ErrorResponse, Request, Response},
        http::StatusCode,
        Error as WsError, Message as WsMessage,
    },
};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::application::router::SharedRouter;
use crate::domain::config::BridgeConfig;
use crate::domain::messages::{InboundMessage, OutboundMessage};

/// The only request path upgraded to a WebSocket.
pub const WS_PATH: &str = "/websocket";

const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the configured address and serves sessions until `running` is
/// cleared.
///
/// # Errors
///
/// Returns an error if the listen address is invalid or cannot be bound.
pub async fn run_server(
    config: &BridgeConfig,
    router: SharedRouter,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))?;

    info!("WebSocket bridge listening on ws://{addr}{WS_PATH}");
    serve(listener, config.app_title.clone(), router, running).await
}

/// Accepts connections on an already bound listener until `running` is
/// cleared.
///
/// # Errors
///
/// Currently never fails; accept errors are logged and the loop continues.
pub async fn serve(
    listener: TcpListener,
    app_title: String,
    router: SharedRouter,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let app_title: Arc<str> = app_title.into();

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let title = Arc::clone(&app_title);
                let router = Arc::clone(&router);
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, title, router).await;
                });
            }
            Ok(Err(e)) => error!("accept error: {e}"),
            Err(_) => {}
        }
    }

    Ok(())
}

// ── Per-session handler ───────────────────────────────────────────────────────

async fn handle_browser_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    app_title: Arc<str>,
    router: SharedRouter,
) {
    let session = Uuid::new_v4();

    match run_session(stream, peer_addr, session, &app_title, &router).await {
        Ok(()) => info!("session {session} ({peer_addr}) closed"),
        Err(e) => warn!("session {session} ({peer_addr}) closed with error: {e:#}"),
    }

    if router.lock().await.cancel_injection(session) {
        info!("session {session}: cancelled its text injection on disconnect");
    }
}

async fn run_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    session: Uuid,
    app_title: &str,
    router: &SharedRouter,
) -> anyhow::Result<()> {
    let ws_stream = accept_hdr_async(stream, check_path)
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    info!("session {session}: WebSocket established with {peer_addr}");

    let (mut ws_tx, mut ws_rx) = ws_stream.split();
    send_json(&mut ws_tx, &OutboundMessage::Welcome(app_title.to_string())).await?;

    while let Some(frame) = ws_rx.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(WsError::ConnectionClosed | WsError::Protocol(_)) => {
                debug!("session {session}: browser WebSocket closed");
                break;
            }
            Err(e) => {
                warn!("session {session}: browser WebSocket error: {e}");
                break;
            }
        };

        match frame {
            WsMessage::Text(text) => {
                let message = match InboundMessage::parse(&text) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("session {session}: dropping message: {e}");
                        continue;
                    }
                };
                debug!("session {session}: {}", message.kind());

                let outcome = router.lock().await.dispatch(session, message).await;
                match outcome {
                    Ok(Some(reply)) => send_json(&mut ws_tx, &reply).await?,
                    Ok(None) => {}
                    Err(e) => warn!("session {session}: {e}"),
                }
            }
            WsMessage::Binary(_) => {
                warn!("session {session}: unexpected binary WebSocket frame (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => {
                debug!("session {session}: WebSocket ping/pong");
            }
            WsMessage::Close(_) => {
                debug!("session {session}: WebSocket Close frame received");
                break;
            }
            WsMessage::Frame(_) => {}
        }
    }

    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Handshake callback rejecting every path but [`WS_PATH`] with 404.
fn check_path(request: &Request, response: Response) -> Result<Response, ErrorResponse> {
    if request.uri().path() == WS_PATH {
        return Ok(response);
    }
    let mut rejection = ErrorResponse::new(Some(format!("no WebSocket at {}", request.uri().path())));
    *rejection.status_mut() = StatusCode::NOT_FOUND;
    Err(rejection)
}

async fn send_json<S>(sink: &mut S, message: &OutboundMessage) -> anyhow::Result<()>
where
    S: Sink<WsMessage, Error = WsError> + Unpin,
{
    let json = serde_json::to_string(message).context("failed to serialize reply")?;
    sink.send(WsMessage::Text(json))
        .await
        .context("failed to send to browser")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> Request {
        Request::builder()
            .uri(path)
            .body(())
            .expect("valid request")
    }

    #[test]
    fn test_check_path_accepts_websocket_path() {
        let result = check_path(&request("/websocket"), Response::new(()));
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_path_rejects_other_paths_with_404() {
        let result = check_path(&request("/api/config"), Response::new(()));
        let rejection = result.unwrap_err();
        assert_eq!(rejection.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_stops_when_flag_cleared() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let router = crate::application::EventRouter::new(crate::application::Driver::new(
            crate::domain::config::DriverKind::Ch9329,
            Arc::new(crate::infrastructure::serial::MockTransport::new()),
        ))
        .shared();
        let running = Arc::new(AtomicBool::new(false));

        // Act: flag already cleared, so the loop exits on its first check
        let result = serve(listener, "t".into(), router, running).await;

        // Assert
        assert!(result.is_ok());
    }
}
