//! # Stand-in Provider
//!
//! Fulfils the contract without any network I/O. Useful for local and demo
//! checkouts; callers treat it exactly like a live provider.

use crate::cart::Cart;
use crate::config::ProviderConfig;
use crate::error::PaymentResult;
use crate::payment::Payment;
use crate::status::{status_payment, ProviderKind};
use crate::strategy::PaymentStrategy;
use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct DummyStrategy {
    config: ProviderConfig,
}

impl DummyStrategy {
    pub fn new(mut config: ProviderConfig) -> Self {
        config.provider = ProviderKind::Dummy;
        Self { config }
    }
}

impl Default for DummyStrategy {
    fn default() -> Self {
        Self::new(ProviderConfig::new(
            ProviderKind::Dummy,
            "http://localhost:8080/checkout/success",
            "http://localhost:8080/checkout/cancel",
        ))
    }
}

#[async_trait]
impl PaymentStrategy for DummyStrategy {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.ensure_currency(&cart.currency)?;
        cart.validate()?;

        let total = cart.total()?;
        debug!("Dummy payment: total={} {}", total, cart.currency);

        Ok(Payment::for_cart(ProviderKind::Dummy, cart, total)
            .with_status(status_payment(ProviderKind::Dummy, "pay"))
            .with_url(self.config.success_url_for(&cart.id)))
    }

    async fn checkout(&self, payment: Payment, _session_id: &str) -> PaymentResult<Payment> {
        Ok(payment
            .with_status(status_payment(ProviderKind::Dummy, "pay"))
            .with_merchant_id(format!("dummy_{}", Uuid::new_v4().simple())))
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Dummy
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
