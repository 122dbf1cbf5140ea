//! # pay-spectrocoin
//!
//! SpectroCoin merchant API strategy for paygate.
//!
//! Orders are created with a form POST whose body is signed with the
//! merchant's RSA key (see [`sign`]). The customer is redirected to the
//! returned `redirectUrl`; SpectroCoin later calls `callbackUrl` with the
//! final status.

pub mod config;
pub mod order;
pub mod sign;

pub use config::{SpectroCoinConfig, DEFAULT_API_BASE, DEFAULT_PAY_CURRENCY};
pub use order::SpectroCoinStrategy;
pub use sign::{load_private_key, sign, sign_with_key, verify};
