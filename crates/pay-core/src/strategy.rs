//! # Payment Strategy Trait
//!
//! The two-operation contract every provider satisfies.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PaymentStrategy (trait)             │
//! │  ├── pay(cart)                 -> Payment    │
//! │  └── checkout(payment, id)     -> Payment    │
//! └──────────────────────────────────────────────┘
//!                        ▲
//!     ┌─────────────┬────┴────────┬──────────────┐
//!  Dummy        Stripe        PayPal      SpectroCoin
//! ```
//!
//! Strategies hold only read-only configuration and an HTTP client, so one
//! value can serve concurrent calls without locking.

use crate::cart::Cart;
use crate::config::ProviderConfig;
use crate::error::{PaymentError, PaymentResult};
use crate::payment::Payment;
use crate::status::ProviderKind;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Open a payment for `cart`.
    ///
    /// Rejects unsupported currencies before any network call. The returned
    /// status is whatever the provider reports right away: usually
    /// `processed` while the customer is redirected, `pay` for providers that
    /// settle synchronously.
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment>;

    /// Capture or look up the provider session/order `session_id` and update
    /// amount, currency, merchant id and status on `payment`.
    async fn checkout(&self, payment: Payment, session_id: &str) -> PaymentResult<Payment>;

    fn provider(&self) -> ProviderKind;

    fn config(&self) -> &ProviderConfig;

    /// Fails with `UnsupportedCurrency` unless the config accepts `currency`
    fn ensure_currency(&self, currency: &str) -> PaymentResult<()> {
        if self.config().supports_currency(currency) {
            Ok(())
        } else {
            Err(PaymentError::UnsupportedCurrency {
                currency: currency.to_string(),
            })
        }
    }
}

/// Type alias for a shared payment strategy (dynamic dispatch)
pub type BoxedPaymentStrategy = Arc<dyn PaymentStrategy>;

/// Checks a provider session/order id before it is placed in a URL path.
///
/// Only ASCII letters, digits, `_` and `-` are accepted.
pub fn ensure_remote_id<'a>(id: &'a str, what: &str) -> PaymentResult<&'a str> {
    if id.is_empty() {
        return Err(PaymentError::InvalidRequest(format!("missing {what}")));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    {
        return Err(PaymentError::InvalidRequest(format!("invalid {what}: {id:?}")));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyStrategy;

    #[test]
    fn test_ensure_currency() {
        let strategy = DummyStrategy::new(
            ProviderConfig::new(ProviderKind::Dummy, "https://s", "https://c")
                .with_currencies(["USD"]),
        );

        assert!(strategy.ensure_currency("usd").is_ok());
        assert!(matches!(
            strategy.ensure_currency("EUR"),
            Err(PaymentError::UnsupportedCurrency { currency }) if currency == "EUR"
        ));
    }

    #[test]
    fn test_ensure_remote_id() {
        assert_eq!(
            ensure_remote_id("cs_test_a1B2-c3", "session id").unwrap(),
            "cs_test_a1B2-c3"
        );
        for bad in ["", "../x", "a/b", "id?expand=1", "id#frag", "a b", "ünï"] {
            assert!(
                matches!(
                    ensure_remote_id(bad, "session id"),
                    Err(PaymentError::InvalidRequest(_))
                ),
                "{bad:?} accepted"
            );
        }
    }

    #[tokio::test]
    async fn test_boxed_strategy_dispatch() {
        let boxed: BoxedPaymentStrategy = Arc::new(DummyStrategy::default());
        assert_eq!(boxed.provider(), ProviderKind::Dummy);
        assert_eq!(boxed.config().provider, ProviderKind::Dummy);
    }
}
