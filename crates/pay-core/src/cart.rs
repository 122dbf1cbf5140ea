//! # Cart Types
//!
//! The commerce value model handed to providers: a cart of priced items.
//! All amounts are in the smallest currency unit (cents for USD).

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};

/// Length of cart identifiers issued by the storefront
pub const CART_ID_LEN: usize = 15;

/// Display data shown on the provider's checkout page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name
    pub name: String,

    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Image URLs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            images: Vec::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder: add an image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }
}

/// Unit price in minor units with the product it prices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit
    pub unit_amount: i64,
    pub product: Product,
}

impl Price {
    pub fn new(unit_amount: i64, product: Product) -> Self {
        Self {
            unit_amount,
            product,
        }
    }
}

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub price: Price,
    pub quantity: u32,
}

impl Item {
    pub fn new(price: Price, quantity: u32) -> Self {
        Self { price, quantity }
    }

    /// Line total in minor units, `None` on overflow
    pub fn total(&self) -> Option<i64> {
        self.price.unit_amount.checked_mul(i64::from(self.quantity))
    }
}

/// A checkout attempt. Immutable once handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,

    /// ISO 4217 code, always upper case
    pub currency: String,

    pub items: Vec<Item>,
}

impl Cart {
    /// Create a cart; the currency code is normalized to upper case.
    pub fn new(id: impl Into<String>, currency: impl AsRef<str>, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            currency: currency.as_ref().trim().to_uppercase(),
            items,
        }
    }

    /// Builder: add an item
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of unit amount × quantity over all items, in minor units
    pub fn total(&self) -> PaymentResult<i64> {
        self.items.iter().try_fold(0i64, |acc, item| {
            item.total()
                .and_then(|line| acc.checked_add(line))
                .ok_or_else(|| {
                    PaymentError::InvalidRequest(format!("cart {} total overflows", self.id))
                })
        })
    }

    /// Structural checks shared by every provider.
    ///
    /// Id length is not enforced here: callers outside the storefront use
    /// their own identifiers. See [`Cart::has_standard_id`].
    pub fn validate(&self) -> PaymentResult<()> {
        if self.id.is_empty() {
            return Err(PaymentError::InvalidRequest("cart id is empty".to_string()));
        }
        if self.is_empty() {
            return Err(PaymentError::InvalidRequest(format!(
                "cart {} has no items",
                self.id
            )));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(PaymentError::InvalidRequest(format!(
                "item {} has zero quantity",
                item.price.product.name
            )));
        }
        if let Some(item) = self.items.iter().find(|i| i.price.unit_amount < 0) {
            return Err(PaymentError::InvalidRequest(format!(
                "item {} has a negative price",
                item.price.product.name
            )));
        }
        self.total().map(|_| ())
    }

    /// Whether the id has the storefront's fixed length
    pub fn has_standard_id(&self) -> bool {
        self.id.len() == CART_ID_LEN
    }

    /// Total item count
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}
