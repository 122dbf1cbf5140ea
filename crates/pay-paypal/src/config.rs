//! # PayPal Configuration

use pay_core::{PaymentError, ProviderConfig, ProviderKind};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://api-m.paypal.com";
pub const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";

/// PayPal REST app credentials
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub secret: String,
    pub provider: ProviderConfig,
}

impl PayPalConfig {
    /// Load credentials from `PAYPAL_CLIENT_ID` and `PAYPAL_SECRET`.
    ///
    /// `PAYPAL_SANDBOX=true` points the strategy at the sandbox unless the
    /// provider config already names an API base.
    pub fn from_env(mut provider: ProviderConfig) -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| PaymentError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;
        let secret = env::var("PAYPAL_SECRET")
            .map_err(|_| PaymentError::Configuration("PAYPAL_SECRET not set".to_string()))?;

        let sandbox = env::var("PAYPAL_SANDBOX")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);
        if sandbox && provider.api_base.is_empty() {
            provider.api_base = SANDBOX_API_BASE.to_string();
        }

        Ok(Self::new(client_id, secret, provider))
    }

    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        mut provider: ProviderConfig,
    ) -> Self {
        provider.provider = ProviderKind::PayPal;
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            provider,
        }
    }

    pub fn api_base(&self) -> &str {
        self.provider.api_base_or(DEFAULT_API_BASE)
    }

    pub fn token_url(&self) -> String {
        format!("{}/v1/oauth2/token", self.api_base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let provider = ProviderConfig::new(ProviderKind::PayPal, "https://s", "https://c")
            .with_api_base(SANDBOX_API_BASE);
        let config = PayPalConfig::new("id", "secret", provider);

        assert_eq!(
            config.token_url(),
            "https://api-m.sandbox.paypal.com/v1/oauth2/token"
        );
    }

    #[test]
    fn test_default_api_base() {
        let provider = ProviderConfig::new(ProviderKind::Dummy, "https://s", "https://c");
        let config = PayPalConfig::new("id", "secret", provider);

        assert_eq!(config.provider.provider, ProviderKind::PayPal);
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
    }
}
