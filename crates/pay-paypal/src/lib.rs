//! # pay-paypal
//!
//! PayPal Orders v2 strategy for paygate.
//!
//! Every call authenticates with the OAuth2 client-credentials grant, then
//! talks JSON with a bearer token:
//!
//! 1. `pay`: `POST /v2/checkout/orders`, redirect to the `payer-action` link
//! 2. `checkout`: `POST /v2/checkout/orders/{id}/capture`
//!
//! ```rust,ignore
//! use pay_paypal::PayPalStrategy;
//!
//! let strategy = PayPalStrategy::from_env(provider_config)?;
//! let payment = strategy.pay(&cart).await?;
//! // PayPal returns the buyer with ?token=<order id>
//! let payment = strategy.checkout(payment, &order_id).await?;
//! ```

pub mod config;
pub mod oauth;
pub mod orders;

pub use config::PayPalConfig;
pub use oauth::fetch_access_token;
pub use orders::{PayPalStrategy, PAYER_ACTION_REL};
