//! # pay-core
//!
//! Core types and traits for the paygate payment engine.
//!
//! This crate provides:
//! - `Cart`, `Item`, `Price`, `Product`: what the caller wants to pay for
//! - `Payment` and `Coin`: what a provider interaction produces
//! - `Status` and `status_payment`: one lifecycle over every provider
//! - `PaymentStrategy`: the `pay`/`checkout` contract
//! - `DummyStrategy`: the no-network stand-in
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Cart, DummyStrategy, Item, PaymentStrategy, Price, Product};
//!
//! let cart = Cart::new("a1b2c3d4e5f6g7h", "usd", vec![
//!     Item::new(Price::new(1999, Product::new("T-shirt")), 1),
//! ]);
//!
//! let payment = strategy.pay(&cart).await?;
//! // Redirect the customer to payment.url, then on return:
//! let payment = strategy.checkout(payment, &session_id).await?;
//! ```

pub mod cart;
pub mod config;
pub mod dummy;
pub mod error;
pub mod payment;
pub mod status;
pub mod strategy;

// Re-exports for convenience
pub use cart::{Cart, Item, Price, Product, CART_ID_LEN};
pub use config::{ProviderConfig, CHECKOUT_SESSION_PLACEHOLDER};
pub use dummy::DummyStrategy;
pub use error::{PaymentError, PaymentResult};
pub use payment::{from_minor_units, parse_minor_units, to_minor_units, Coin, Payment};
pub use status::{status_payment, ProviderKind, Status};
pub use strategy::{ensure_remote_id, BoxedPaymentStrategy, PaymentStrategy};
