//! # SpectroCoin Configuration

use pay_core::{PaymentError, ProviderConfig, ProviderKind};
use std::env;

pub const DEFAULT_API_BASE: &str = "https://spectrocoin.com/api/merchant/1";

/// Crypto the order is quoted in before the customer picks one
pub const DEFAULT_PAY_CURRENCY: &str = "BTC";

#[derive(Clone)]
pub struct SpectroCoinConfig {
    pub merchant_id: String,
    pub user_id: String,
    pub project_id: String,
    /// PKCS#8 PEM
    pub private_key_pem: String,
    pub provider: ProviderConfig,
}

// Keep the key out of logs.
impl std::fmt::Debug for SpectroCoinConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectroCoinConfig")
            .field("merchant_id", &self.merchant_id)
            .field("user_id", &self.user_id)
            .field("project_id", &self.project_id)
            .field("private_key_pem", &"<redacted>")
            .field("provider", &self.provider)
            .finish()
    }
}

fn required(name: &str) -> Result<String, PaymentError> {
    env::var(name).map_err(|_| PaymentError::Configuration(format!("{name} not set")))
}

impl SpectroCoinConfig {
    /// Load ids from `SPECTROCOIN_MERCHANT_ID`, `SPECTROCOIN_USER_ID`,
    /// `SPECTROCOIN_PROJECT_ID` and the key from `SPECTROCOIN_PRIVATE_KEY`
    /// (PEM text) or `SPECTROCOIN_PRIVATE_KEY_FILE` (path).
    pub fn from_env(provider: ProviderConfig) -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let private_key_pem = match env::var("SPECTROCOIN_PRIVATE_KEY") {
            Ok(pem) => pem,
            Err(_) => {
                let path = required("SPECTROCOIN_PRIVATE_KEY_FILE")?;
                std::fs::read_to_string(&path).map_err(|e| {
                    PaymentError::Configuration(format!("cannot read {path}: {e}"))
                })?
            }
        };

        Ok(Self::new(
            required("SPECTROCOIN_MERCHANT_ID")?,
            required("SPECTROCOIN_USER_ID")?,
            required("SPECTROCOIN_PROJECT_ID")?,
            private_key_pem,
            provider,
        ))
    }

    pub fn new(
        merchant_id: impl Into<String>,
        user_id: impl Into<String>,
        project_id: impl Into<String>,
        private_key_pem: impl Into<String>,
        mut provider: ProviderConfig,
    ) -> Self {
        provider.provider = ProviderKind::SpectroCoin;
        Self {
            merchant_id: merchant_id.into(),
            user_id: user_id.into(),
            project_id: project_id.into(),
            private_key_pem: private_key_pem.into(),
            provider,
        }
    }

    pub fn api_base(&self) -> &str {
        self.provider.api_base_or(DEFAULT_API_BASE)
    }
}
