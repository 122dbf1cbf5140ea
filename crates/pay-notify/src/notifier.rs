//! # Payment Event Notifier
//!
//! Delivers one JSON envelope per payment transition to a configured URL.
//! Delivery is best-effort: a single attempt, and failures are logged, never
//! returned.

use crate::source::WebhookUrlSource;
use pay_core::{Item, Payment, PaymentError, PaymentResult, ProviderKind, Status};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Overall deadline for one delivery attempt
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest response body kept in failure logs, in characters
pub const MAX_LOGGED_BODY: usize = 512;

/// Wire envelope
#[derive(Debug, Serialize)]
pub struct PaymentEvent<'a> {
    pub event: &'a str,
    /// Unix seconds
    pub timestamp: i64,
    pub data: PaymentEventData<'a>,
}

#[derive(Debug, Serialize)]
pub struct PaymentEventData<'a> {
    pub cart_id: &'a str,
    pub payment_system: ProviderKind,
    pub payment_status: Status,
    pub total_amount: i64,
    pub currency: &'a str,
    pub cart_items: &'a [Item],
}

/// Event name conventionally sent for a status
pub fn event_name_for(status: Status) -> &'static str {
    match status {
        Status::New => "payment.created",
        Status::Unpaid => "payment.pending",
        Status::Pay => "payment.paid",
        Status::Processed => "payment.processing",
        Status::Canceled => "payment.canceled",
        Status::Failed => "payment.failed",
        Status::Test => "payment.test",
    }
}

#[derive(Clone)]
pub struct PaymentNotifier {
    source: Arc<dyn WebhookUrlSource>,
    client: Client,
}

impl PaymentNotifier {
    pub fn new(source: Arc<dyn WebhookUrlSource>) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { source, client })
    }

    /// Send `event` for a cart. Always returns normally.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip_all, fields(event = %event, cart_id = %cart_id))]
    pub async fn notify_payment_event(
        &self,
        event: &str,
        cart_id: &str,
        provider: ProviderKind,
        status: Status,
        total_amount: i64,
        currency: &str,
        items: &[Item],
    ) {
        let Some(url) = self.source.webhook_url().await else {
            debug!("No webhook URL configured, skipping {}", event);
            return;
        };

        let envelope = PaymentEvent {
            event,
            timestamp: chrono::Utc::now().timestamp(),
            data: PaymentEventData {
                cart_id,
                payment_system: provider,
                payment_status: status,
                total_amount,
                currency,
                cart_items: items,
            },
        };

        let response = match self.client.post(&url).json(&envelope).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    url = %url,
                    event = %event,
                    error = %e,
                    "Payment webhook delivery failed"
                );
                return;
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            info!("Payment webhook delivered: {} -> {}", event, url);
            return;
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            url = %url,
            event = %event,
            status = status.as_u16(),
            body = %truncate(&body, MAX_LOGGED_BODY),
            "Payment webhook rejected"
        );
    }

    /// Send `event` using the fields of a [`Payment`]
    pub async fn notify_payment(&self, event: &str, payment: &Payment, items: &[Item]) {
        self.notify_payment_event(
            event,
            &payment.cart_id,
            payment.provider,
            payment.status,
            payment.amount_total,
            &payment.currency,
            items,
        )
        .await;
    }
}

fn truncate(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
