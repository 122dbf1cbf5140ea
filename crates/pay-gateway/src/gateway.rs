//! # Gateway
//!
//! Pairs the active provider with the notifier: `complete` captures a
//! payment and forwards the resulting transition.

use pay_core::{Cart, Item, Payment, PaymentResult, PaymentStrategy};
use pay_notify::{event_name_for, PaymentNotifier, StaticWebhookUrl};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::provider::Provider;
use crate::settings::Settings;

pub struct Gateway {
    provider: Provider,
    notifier: PaymentNotifier,
}

impl Gateway {
    pub fn new(provider: Provider, notifier: PaymentNotifier) -> Self {
        Self { provider, notifier }
    }

    pub fn from_settings(settings: &Settings) -> PaymentResult<Self> {
        let provider = Provider::from_settings(settings)?;
        let source = StaticWebhookUrl::new(settings.webhook_url.clone());
        let notifier = PaymentNotifier::new(Arc::new(source))?;
        Ok(Self::new(provider, notifier))
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub fn notifier(&self) -> &PaymentNotifier {
        &self.notifier
    }

    pub async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.provider.pay(cart).await
    }

    /// Capture `session_id` and notify the outcome. Notification problems
    /// never turn into an error here.
    #[instrument(skip(self, payment, items), fields(cart_id = %payment.cart_id))]
    pub async fn complete(
        &self,
        payment: Payment,
        session_id: &str,
        items: &[Item],
    ) -> PaymentResult<Payment> {
        let payment = self.provider.checkout(payment, session_id).await?;
        info!(
            "Payment {}: {} {} via {}",
            payment.status, payment.amount_total, payment.currency, payment.provider
        );

        self.notifier
            .notify_payment(event_name_for(payment.status), &payment, items)
            .await;
        Ok(payment)
    }
}
