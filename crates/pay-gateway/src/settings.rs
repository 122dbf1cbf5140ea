//! # Payment Settings
//!
//! Non-secret configuration read from `config/payments.toml`: the active
//! provider, the notification URL and one [`ProviderConfig`] per provider.
//! Secrets stay in the environment and are read by each provider's config.

use pay_core::{PaymentError, PaymentResult, ProviderConfig, ProviderKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CONFIG_PATHS: [&str; 4] = [
    "config/payments.toml",
    "crates/pay-gateway/config/payments.toml",
    "../config/payments.toml",
    "../../config/payments.toml",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Provider used for new payments
    pub provider: ProviderKind,

    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Dummy,
            webhook_url: None,
            providers: Vec::new(),
        }
    }
}

/// First of the known settings locations that exists under `root`
fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_PATHS
        .iter()
        .map(|p| root.join(p))
        .find(|p| p.exists())
}

impl Settings {
    pub fn from_toml_str(content: &str) -> PaymentResult<Self> {
        let settings: Settings = toml::from_str(content)
            .map_err(|e| PaymentError::Configuration(format!("invalid payment settings: {e}")))?;
        settings.check()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> PaymentResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PaymentError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `PAYGATE_CONFIG` or the first `config/payments.toml` found,
    /// then apply `PAYGATE_PROVIDER` and `PAYGATE_WEBHOOK_URL`.
    ///
    /// Without any file the stand-in provider is used.
    pub fn load_default() -> PaymentResult<Self> {
        dotenvy::dotenv().ok();

        let settings = match std::env::var("PAYGATE_CONFIG") {
            Ok(path) => Self::load(&path)?,
            Err(_) => match find_config_file(Path::new(".")) {
                Some(path) => {
                    info!("Loading payment settings from {}", path.display());
                    Self::load(&path)?
                }
                None => {
                    warn!("No payment settings found, using the dummy provider");
                    Self::default()
                }
            },
        };

        settings.with_overrides(
            std::env::var("PAYGATE_PROVIDER").ok(),
            std::env::var("PAYGATE_WEBHOOK_URL").ok(),
        )
    }

    /// Replace the active provider and/or webhook URL
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        webhook_url: Option<String>,
    ) -> PaymentResult<Self> {
        if let Some(provider) = provider {
            self.provider = provider.parse().map_err(PaymentError::Configuration)?;
        }
        if webhook_url.is_some() {
            self.webhook_url = webhook_url;
        }
        Ok(self)
    }

    pub fn provider_config(&self, kind: ProviderKind) -> Option<&ProviderConfig> {
        self.providers.iter().find(|c| c.provider == kind)
    }

    /// Config of the active provider. The stand-in works without one.
    pub fn active_config(&self) -> PaymentResult<ProviderConfig> {
        match self.provider_config(self.provider) {
            Some(config) => Ok(config.clone()),
            None if self.provider == ProviderKind::Dummy => Ok(ProviderConfig::new(
                ProviderKind::Dummy,
                "http://localhost:8080/checkout/success",
                "http://localhost:8080/checkout/cancel",
            )),
            None => Err(PaymentError::Configuration(format!(
                "no [[providers]] entry for {}",
                self.provider
            ))),
        }
    }

    fn check(&self) -> PaymentResult<()> {
        for (i, config) in self.providers.iter().enumerate() {
            if self.providers[..i].iter().any(|c| c.provider == config.provider) {
                return Err(PaymentError::Configuration(format!(
                    "duplicate [[providers]] entry for {}",
                    config.provider
                )));
            }
            if config.success_url.is_empty() || config.cancel_url.is_empty() {
                return Err(PaymentError::Configuration(format!(
                    "{} needs success_url and cancel_url",
                    config.provider
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../config/payments.toml");

    #[test]
    fn test_parse_sample() {
        let settings = Settings::from_toml_str(SAMPLE).unwrap();

        assert_eq!(settings.provider, ProviderKind::Dummy);
        assert_eq!(settings.providers.len(), 4);

        let stripe = settings.provider_config(ProviderKind::Stripe).unwrap();
        assert!(stripe.supports_currency("gbp"));
        assert!(!stripe.supports_currency("JPY"));

        let spectro = settings.provider_config(ProviderKind::SpectroCoin).unwrap();
        assert!(spectro.callback_url.ends_with("/callback"));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_toml_str(SAMPLE)
            .unwrap()
            .with_overrides(Some("PayPal".into()), Some("https://hooks.example.com".into()))
            .unwrap();

        assert_eq!(settings.provider, ProviderKind::PayPal);
        assert_eq!(settings.webhook_url.as_deref(), Some("https://hooks.example.com"));
        assert_eq!(
            settings.active_config().unwrap().provider,
            ProviderKind::PayPal
        );
    }

    #[test]
    fn test_unknown_provider_override() {
        let err = Settings::default()
            .with_overrides(Some("bitpay".into()), None)
            .unwrap_err();
        assert!(matches!(err, PaymentError::Configuration(_)));
    }

    #[test]
    fn test_missing_active_config() {
        let settings = Settings::from_toml_str(r#"provider = "stripe""#).unwrap();
        assert!(settings.active_config().is_err());

        let dummy = Settings::default().active_config().unwrap();
        assert_eq!(dummy.provider, ProviderKind::Dummy);
    }

    #[test]
    fn test_duplicate_provider_rejected() {
        let toml = r#"
            provider = "dummy"

            [[providers]]
            provider = "stripe"
            success_url = "https://s"
            cancel_url = "https://c"

            [[providers]]
            provider = "stripe"
            success_url = "https://s2"
            cancel_url = "https://c2"
        "#;
        assert!(Settings::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_shipped_config_found_from_workspace_root() {
        let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let found = find_config_file(&workspace).unwrap();
        assert!(found.ends_with("crates/pay-gateway/config/payments.toml"));
        assert!(Settings::load(found).is_ok());
    }

    #[test]
    fn test_shipped_config_found_from_crate_dir() {
        let found = find_config_file(Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap();
        assert!(found.ends_with("config/payments.toml"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Settings::from_toml_str("provider = "),
            Err(PaymentError::Configuration(_))
        ));
    }
}
