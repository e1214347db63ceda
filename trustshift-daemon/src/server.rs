//! TCP accept loop and per-connection request handling.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use trustshift_auth::IdentityRegistry;

use crate::framing::{read_frame, write_frame};
use crate::service::AuthService;

/// Accept connections until `shutdown` resolves.
///
/// Each connection is served on its own task; in-flight connections are not
/// awaited on shutdown.
pub async fn serve<R, F>(
    listener: TcpListener,
    service: AuthService<R>,
    max_frame_size: usize,
    shutdown: F,
) -> std::io::Result<()>
where
    R: IdentityRegistry + 'static,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                tracing::debug!(peer = %peer, "Connection accepted");
                let service = service.clone();
                tokio::spawn(async move {
                    handle_connection(stream, service, max_frame_size).await;
                    tracing::debug!(peer = %peer, "Connection closed");
                });
            }
        }
    }
}

/// Answer request frames on one stream until the peer hangs up.
///
/// A frame above `max_frame_size` ends the connection without a response.
pub async fn handle_connection<S, R>(mut stream: S, service: AuthService<R>, max_frame_size: usize)
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: IdentityRegistry,
{
    loop {
        let frame = match read_frame(&mut stream, max_frame_size).await {
            Ok(frame) => frame,
            Err(e) if e.is_eof() => break,
            Err(e) => {
                tracing::warn!(error = %e, "Dropping connection");
                break;
            }
        };

        let response = service.handle_frame(&frame);
        let body = match serde_json::to_vec(&response) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response");
                break;
            }
        };

        if let Err(e) = write_frame(&mut stream, &body, max_frame_size).await {
            tracing::debug!(error = %e, "Failed to write response");
            break;
        }
    }
}
