//! Outbound leg of the HUD: user actions forwarded to the host process.
//!
//! Delivery is fire-and-forget by contract. The host never acknowledges these
//! calls in a way the UI acts on, so neither method reports errors; a failed
//! send leaves no trace beyond a debug log line.

use anyhow::Context;
use async_trait::async_trait;
use controlroom_protocol::{endpoints, DispatchCrew};

/// Capability the HUD depends on for notifying the host. Success or failure
/// of delivery is not observed by callers.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Ask the host to close the UI. Empty JSON body.
    async fn close_ui(&self);

    /// Ask the host to dispatch a repair crew to `sector`.
    async fn dispatch_crew(&self, sector: &str);
}

/// HTTP implementation posting to the host's callback endpoints under a
/// host-provided base URL (the resource placeholder in game builds).
#[derive(Debug, Clone)]
pub struct HostClient {
    http: reqwest::Client,
    base_url: String,
}

impl HostClient {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn callback_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NotificationPort for HostClient {
    async fn close_ui(&self) {
        let url = self.callback_url(endpoints::CLOSE_UI);
        if let Err(e) = self.http.post(&url).json(&serde_json::json!({})).send().await {
            tracing::debug!("close callback not delivered: {e}");
        }
    }

    async fn dispatch_crew(&self, sector: &str) {
        let url = self.callback_url(endpoints::DISPATCH_CREW);
        let body = DispatchCrew {
            sector: sector.to_string(),
        };
        match self.http.post(&url).json(&body).send().await {
            Ok(_) => tracing::info!("dispatched crew to {sector}"),
            Err(e) => tracing::debug!("dispatch callback not delivered: {e}"),
        }
    }
}
