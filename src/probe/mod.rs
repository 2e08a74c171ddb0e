//! Probe layer: checks that a running launcher serves both protocols.
//!
//! The ASGI router answers plain HTTP and upgrades WebSocket handshakes on
//! the application's `ws/` routes. The probe verifies both from the outside
//! without speaking any application protocol.

pub mod http;
pub mod websocket;

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::config::OpsConfig;

/// Route used for the WebSocket handshake check.
pub const NOTIFICATIONS_ROUTE: &str = "/ws/notifications/";

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The server answered the way a live ASGI app does.
    Served {
        /// HTTP status of the answer.
        status: u16,
    },
    /// No usable answer.
    NotServed {
        /// Why the check failed.
        reason: String,
    },
}

impl CheckOutcome {
    /// `true` for [`CheckOutcome::Served`].
    #[must_use]
    pub const fn is_served(&self) -> bool {
        matches!(self, Self::Served { .. })
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Served { status } => write!(f, "served ({status})"),
            Self::NotServed { reason } => write!(f, "not served: {reason}"),
        }
    }
}

/// Both checks against one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// URL of the HTTP check.
    pub http_url: String,
    /// HTTP outcome.
    pub http: CheckOutcome,
    /// URL of the WebSocket check.
    pub websocket_url: String,
    /// WebSocket outcome.
    pub websocket: CheckOutcome,
}

impl ProbeReport {
    /// `true` when both protocols are served.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.http.is_served() && self.websocket.is_served()
    }

    /// Two-line human-readable rendering.
    #[must_use]
    pub fn render_text(&self) -> String {
        format!(
            "http       {} {}\nwebsocket  {} {}\n",
            self.http_url, self.http, self.websocket_url, self.websocket
        )
    }
}

/// Runs both checks against the configured bind address.
pub async fn run(config: &OpsConfig) -> ProbeReport {
    let timeout = Duration::from_secs(config.probe_timeout_secs);
    let http_url = format!("http://{}/", config.bind_address());
    let websocket_url = format!("ws://{}{NOTIFICATIONS_ROUTE}", config.bind_address());

    let http = http::check(&http_url, timeout).await;
    let websocket = websocket::check(&websocket_url, timeout).await;
    tracing::debug!(%http, %websocket, "probe finished");

    ProbeReport {
        http_url,
        http,
        websocket_url,
        websocket,
    }
}
