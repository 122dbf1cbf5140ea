//! # pay-gateway
//!
//! Wires paygate together: [`Settings`] from `config/payments.toml`, the
//! active [`Provider`] with credentials from the environment, and a
//! [`Gateway`] that forwards completed payments to the notifier.
//!
//! ```rust,ignore
//! let settings = Settings::load_default()?;
//! let gateway = Gateway::from_settings(&settings)?;
//!
//! let payment = gateway.pay(&cart).await?;
//! // redirect to payment.url, then when the customer returns:
//! let payment = gateway.complete(payment, &session_id, &cart.items).await?;
//! ```

pub mod gateway;
pub mod provider;
pub mod settings;

pub use gateway::Gateway;
pub use provider::Provider;
pub use settings::Settings;
