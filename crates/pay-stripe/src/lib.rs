//! # pay-stripe
//!
//! Stripe Checkout Sessions strategy for paygate.
//!
//! Speaks Stripe's form-encoded REST API: line items go out in bracket
//! notation, the secret key authenticates as the Basic-Auth username and
//! `payment_status` comes back through the shared status table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeCheckoutStrategy;
//! use pay_core::PaymentStrategy;
//!
//! let strategy = StripeCheckoutStrategy::from_env(provider_config)?;
//!
//! let payment = strategy.pay(&cart).await?;
//! // Redirect user to payment.url; Stripe returns with ?session_id=cs_...
//! let payment = strategy.checkout(payment, &session_id).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
