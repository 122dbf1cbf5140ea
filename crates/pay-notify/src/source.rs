//! Where the notifier finds its target URL.

use async_trait::async_trait;

/// Lookup of the configured webhook URL.
///
/// `None` means notifications are switched off.
#[async_trait]
pub trait WebhookUrlSource: Send + Sync {
    async fn webhook_url(&self) -> Option<String>;
}

/// A URL fixed at startup
#[derive(Debug, Clone, Default)]
pub struct StaticWebhookUrl(Option<String>);

impl StaticWebhookUrl {
    /// Blank strings count as unset.
    pub fn new(url: Option<String>) -> Self {
        Self(url.filter(|u| !u.trim().is_empty()))
    }
}

#[async_trait]
impl WebhookUrlSource for StaticWebhookUrl {
    async fn webhook_url(&self) -> Option<String> {
        self.0.clone()
    }
}
