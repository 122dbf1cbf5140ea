//! # Provider Selection
//!
//! A closed union over the four strategies. Built from settings and the
//! environment at startup, then passed to whoever needs it.

use async_trait::async_trait;
use pay_core::{
    Cart, DummyStrategy, Payment, PaymentResult, PaymentStrategy, ProviderConfig, ProviderKind,
};
use pay_paypal::PayPalStrategy;
use pay_spectrocoin::SpectroCoinStrategy;
use pay_stripe::StripeCheckoutStrategy;
use tracing::info;

use crate::settings::Settings;

pub enum Provider {
    Dummy(DummyStrategy),
    Stripe(StripeCheckoutStrategy),
    PayPal(PayPalStrategy),
    SpectroCoin(SpectroCoinStrategy),
}

impl Provider {
    /// The active provider named in `settings`, credentials from the environment
    pub fn from_settings(settings: &Settings) -> PaymentResult<Self> {
        Self::from_env(settings.active_config()?)
    }

    pub fn from_env(config: ProviderConfig) -> PaymentResult<Self> {
        let kind = config.provider;
        let provider = match kind {
            ProviderKind::Dummy => Provider::Dummy(DummyStrategy::new(config)),
            ProviderKind::Stripe => Provider::Stripe(StripeCheckoutStrategy::from_env(config)?),
            ProviderKind::PayPal => Provider::PayPal(PayPalStrategy::from_env(config)?),
            ProviderKind::SpectroCoin => {
                Provider::SpectroCoin(SpectroCoinStrategy::from_env(config)?)
            }
        };

        info!("Payment provider ready: {}", kind);
        Ok(provider)
    }

    fn strategy(&self) -> &dyn PaymentStrategy {
        match self {
            Provider::Dummy(s) => s,
            Provider::Stripe(s) => s,
            Provider::PayPal(s) => s,
            Provider::SpectroCoin(s) => s,
        }
    }
}

impl From<DummyStrategy> for Provider {
    fn from(strategy: DummyStrategy) -> Self {
        Provider::Dummy(strategy)
    }
}

impl From<StripeCheckoutStrategy> for Provider {
    fn from(strategy: StripeCheckoutStrategy) -> Self {
        Provider::Stripe(strategy)
    }
}

impl From<PayPalStrategy> for Provider {
    fn from(strategy: PayPalStrategy) -> Self {
        Provider::PayPal(strategy)
    }
}

impl From<SpectroCoinStrategy> for Provider {
    fn from(strategy: SpectroCoinStrategy) -> Self {
        Provider::SpectroCoin(strategy)
    }
}

#[async_trait]
impl PaymentStrategy for Provider {
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.strategy().pay(cart).await
    }

    async fn checkout(&self, payment: Payment, session_id: &str) -> PaymentResult<Payment> {
        self.strategy().checkout(payment, session_id).await
    }

    fn provider(&self) -> ProviderKind {
        self.strategy().provider()
    }

    fn config(&self) -> &ProviderConfig {
        self.strategy().config()
    }
}
