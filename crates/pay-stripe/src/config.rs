//! # Stripe Configuration
//!
//! The secret key comes from the environment; URLs and currencies from the
//! shared [`ProviderConfig`].

use pay_core::{PaymentError, ProviderConfig, ProviderKind};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// Stripe API configuration
#[derive(Debug, Clone)]
pub struct StripeConfig {
    /// Secret API key (sk_test_... or sk_live_...)
    pub secret_key: String,

    pub provider: ProviderConfig,
}

impl StripeConfig {
    /// Load the secret from `STRIPE_SECRET_KEY` (a `.env` file is honoured).
    pub fn from_env(provider: ProviderConfig) -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let secret_key = env::var("STRIPE_SECRET_KEY").map_err(|_| {
            PaymentError::Configuration("STRIPE_SECRET_KEY not set".to_string())
        })?;

        if !secret_key.starts_with("sk_test_") && !secret_key.starts_with("sk_live_") {
            return Err(PaymentError::Configuration(
                "STRIPE_SECRET_KEY must start with sk_test_ or sk_live_".to_string(),
            ));
        }

        Ok(Self::new(secret_key, provider))
    }

    /// Create config with explicit values
    pub fn new(secret_key: impl Into<String>, mut provider: ProviderConfig) -> Self {
        provider.provider = ProviderKind::Stripe;
        Self {
            secret_key: secret_key.into(),
            provider,
        }
    }

    /// Check if using test keys
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.starts_with("sk_test_")
    }

    pub fn api_base(&self) -> &str {
        self.provider.api_base_or(DEFAULT_API_BASE)
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.provider.api_base = url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderConfig {
        ProviderConfig::new(ProviderKind::Dummy, "https://s", "https://c")
    }

    #[test]
    fn test_new_forces_provider_kind() {
        let config = StripeConfig::new("sk_test_abc123", provider());
        assert_eq!(config.provider.provider, ProviderKind::Stripe);
        assert!(config.is_test_mode());
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_api_base_override() {
        let config =
            StripeConfig::new("sk_live_abc123", provider()).with_api_base_url("http://localhost:1/");
        assert!(!config.is_test_mode());
        assert_eq!(config.api_base(), "http://localhost:1");
    }

    #[test]
    fn test_from_env_missing_key() {
        env::remove_var("STRIPE_SECRET_KEY");

        let result = StripeConfig::from_env(provider());
        assert!(result.is_err());
    }
}
