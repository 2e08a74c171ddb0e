//! WebSocket handshake check.

use std::time::Duration;

use tokio_tungstenite::tungstenite::Error as WsError;

use super::CheckOutcome;

/// Returns `true` if a handshake status shows the ASGI WebSocket router
/// answered: `101` (accepted) or `403` (route exists, connection refused
/// before accept, e.g. unauthenticated).
#[must_use]
pub const fn router_answered(status: u16) -> bool {
    matches!(status, 101 | 403)
}

/// Attempts a WebSocket handshake on `url` and closes it immediately.
pub async fn check(url: &str, timeout: Duration) -> CheckOutcome {
    let status = match tokio::time::timeout(timeout, tokio_tungstenite::connect_async(url)).await {
        Err(_) => {
            return CheckOutcome::NotServed {
                reason: format!("no handshake within {}s", timeout.as_secs()),
            };
        }
        Ok(Ok((mut stream, response))) => {
            if let Err(error) = stream.close(None).await {
                tracing::debug!(%error, "closing probe websocket");
            }
            response.status().as_u16()
        }
        Ok(Err(WsError::Http(response))) => response.status().as_u16(),
        Ok(Err(e)) => {
            return CheckOutcome::NotServed {
                reason: e.to_string(),
            };
        }
    };

    if router_answered(status) {
        CheckOutcome::Served { status }
    } else {
        CheckOutcome::NotServed {
            reason: format!("handshake answered with HTTP {status}"),
        }
    }
}
