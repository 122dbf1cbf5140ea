//! # Payment Record
//!
//! What a provider interaction produces. `pay` creates it, `checkout`
//! updates it; the caller owns it between calls.

use crate::cart::Cart;
use crate::error::{PaymentError, PaymentResult};
use crate::status::{ProviderKind, Status};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Crypto amount a cart settles for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Ticker, e.g. "BTC"
    pub currency: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub provider: ProviderKind,

    /// Provider-side transaction id (session, order or capture id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,

    pub cart_id: String,

    /// Total in minor units
    pub amount_total: i64,

    pub currency: String,

    pub status: Status,

    /// Where to send the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coin: Option<Coin>,
}

impl Payment {
    /// Start a record for `cart` with the given total
    pub fn for_cart(provider: ProviderKind, cart: &Cart, amount_total: i64) -> Self {
        Self {
            provider,
            merchant_id: None,
            cart_id: cart.id.clone(),
            amount_total,
            currency: cart.currency.clone(),
            status: Status::New,
            url: None,
            coin: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_merchant_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_id = Some(id.into());
        self
    }
}

/// Major-unit decimal to minor units, e.g. `19.99` to `1999`.
///
/// Rejects amounts with more than two fractional digits instead of rounding.
pub fn to_minor_units(amount: Decimal) -> PaymentResult<i64> {
    let scaled = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or_else(|| PaymentError::InvalidRequest(format!("amount {amount} out of range")))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(PaymentError::InvalidRequest(format!(
            "amount {amount} has sub-cent precision"
        )));
    }
    scaled
        .to_i64()
        .ok_or_else(|| PaymentError::InvalidRequest(format!("amount {amount} out of range")))
}

/// Parse a provider decimal string (`"19.99"`) into minor units
pub fn parse_minor_units(value: &str) -> PaymentResult<i64> {
    let amount: Decimal = value
        .trim()
        .parse()
        .map_err(|e| PaymentError::InvalidRequest(format!("invalid amount {value:?}: {e}")))?;
    to_minor_units(amount)
}

/// Minor units to a two-place decimal, e.g. `1999` to `19.99`
pub fn from_minor_units(amount: i64) -> Decimal {
    Decimal::new(amount, 2)
}
