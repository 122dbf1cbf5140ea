//! # Provider Configuration
//!
//! Per-provider settings shared by every strategy: return URLs, supported
//! currencies and the API base. Fixed at construction, never mutated after.

use crate::status::ProviderKind;
use serde::{Deserialize, Serialize};

/// Placeholder Stripe substitutes with the checkout session id on redirect
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,

    /// Server-to-server notification URL (providers that call back)
    #[serde(default)]
    pub callback_url: String,

    /// Where the customer lands after paying
    pub success_url: String,

    /// Where the customer lands after abandoning checkout
    pub cancel_url: String,

    /// Accepted ISO 4217 codes; empty accepts any
    #[serde(default)]
    pub currencies: Vec<String>,

    /// Provider API base (overridable for sandboxes and tests)
    #[serde(default)]
    pub api_base: String,
}

impl ProviderConfig {
    pub fn new(
        provider: ProviderKind,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            callback_url: String::new(),
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
            currencies: Vec::new(),
            api_base: String::new(),
        }
    }

    /// Builder: set callback URL
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = url.into();
        self
    }

    /// Builder: restrict currencies
    pub fn with_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set API base
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Case-insensitive membership; an empty list accepts everything.
    pub fn supports_currency(&self, currency: &str) -> bool {
        self.currencies.is_empty()
            || self
                .currencies
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(currency.trim()))
    }

    /// API base without a trailing slash, or `default` when unset
    pub fn api_base_or<'a>(&'a self, default: &'a str) -> &'a str {
        let base = if self.api_base.is_empty() {
            default
        } else {
            &self.api_base
        };
        base.trim_end_matches('/')
    }

    /// `base` with `provider=<tag>&cart_id=<id>` appended
    pub fn return_url(&self, base: &str, cart_id: &str) -> String {
        let sep = if base.contains('?') { '&' } else { '?' };
        format!(
            "{base}{sep}provider={}&cart_id={cart_id}",
            self.provider.as_str()
        )
    }

    pub fn success_url_for(&self, cart_id: &str) -> String {
        self.return_url(&self.success_url, cart_id)
    }

    pub fn cancel_url_for(&self, cart_id: &str) -> String {
        self.return_url(&self.cancel_url, cart_id)
    }

    pub fn callback_url_for(&self, cart_id: &str) -> String {
        self.return_url(&self.callback_url, cart_id)
    }

    /// Success URL carrying Stripe's session placeholder as well
    pub fn success_url_with_session(&self, cart_id: &str) -> String {
        format!(
            "{}&session_id={}",
            self.success_url_for(cart_id),
            CHECKOUT_SESSION_PLACEHOLDER
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::new(
            ProviderKind::Stripe,
            "https://shop.example.com/checkout/success",
            "https://shop.example.com/checkout/cancel?ref=cart",
        )
    }

    #[test]
    fn test_return_urls() {
        let cfg = config();

        assert_eq!(
            cfg.success_url_for("cart00000000001"),
            "https://shop.example.com/checkout/success?provider=stripe&cart_id=cart00000000001"
        );
        assert_eq!(
            cfg.cancel_url_for("cart00000000001"),
            "https://shop.example.com/checkout/cancel?ref=cart&provider=stripe&cart_id=cart00000000001"
        );
        assert!(cfg
            .success_url_with_session("c1")
            .ends_with("&session_id={CHECKOUT_SESSION_ID}"));
    }

    #[test]
    fn test_supports_currency() {
        let open = config();
        assert!(open.supports_currency("XYZ"));

        let restricted = config().with_currencies(["usd", "EUR"]);
        assert!(restricted.supports_currency("USD"));
        assert!(restricted.supports_currency("eur"));
        assert!(!restricted.supports_currency("GBP"));
    }

    #[test]
    fn test_api_base_or() {
        let cfg = config();
        assert_eq!(cfg.api_base_or("https://api.stripe.com"), "https://api.stripe.com");

        let cfg = config().with_api_base("http://127.0.0.1:9999/");
        assert_eq!(cfg.api_base_or("https://api.stripe.com"), "http://127.0.0.1:9999");
    }
}
