//! # PayPal Orders v2
//!
//! `pay` creates an order and hands back the `payer-action` link;
//! `checkout` captures the approved order.

use crate::config::PayPalConfig;
use crate::oauth::fetch_access_token;
use async_trait::async_trait;
use pay_core::{
    ensure_remote_id, from_minor_units, parse_minor_units, status_payment, Cart, Payment,
    PaymentError, PaymentResult, PaymentStrategy, ProviderConfig, ProviderKind,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "paypal";

/// Link relation PayPal uses for the buyer approval page
pub const PAYER_ACTION_REL: &str = "payer-action";

pub struct PayPalStrategy {
    config: PayPalConfig,
    client: Client,
}

impl PayPalStrategy {
    pub fn new(config: PayPalConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    pub fn from_env(provider: ProviderConfig) -> PaymentResult<Self> {
        Self::new(PayPalConfig::from_env(provider)?)
    }

    async fn access_token(&self) -> PaymentResult<String> {
        fetch_access_token(
            &self.client,
            &self.config.token_url(),
            &self.config.client_id,
            &self.config.secret,
        )
        .await
    }

    /// Order total as PayPal expects it: major units, two decimals
    fn order_total(cart: &Cart) -> Decimal {
        cart.items
            .iter()
            .map(|item| from_minor_units(item.price.unit_amount) * Decimal::from(item.quantity))
            .sum()
    }

    fn build_order(&self, cart: &Cart) -> CreateOrderRequest {
        let provider = &self.config.provider;
        CreateOrderRequest {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: cart.id.clone(),
                amount: Money {
                    currency_code: cart.currency.clone(),
                    value: Self::order_total(cart).round_dp(2).to_string(),
                },
            }],
            payment_source: PaymentSource {
                paypal: PayPalSource {
                    experience_context: ExperienceContext {
                        user_action: "PAY_NOW",
                        return_url: provider.success_url_for(&cart.id),
                        cancel_url: provider.cancel_url_for(&cart.id),
                    },
                },
            },
        }
    }

    /// Send with bearer auth; 422 is reported apart from other failures.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: &str,
    ) -> PaymentResult<T> {
        let response = request
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            error!("PayPal rejected request as unprocessable: body={}", body);
            return Err(PaymentError::Unprocessable {
                provider: PROVIDER.to_string(),
                body,
            });
        }
        if !status.is_success() {
            error!("PayPal API error: status={}, body={}", status, body);
            return Err(PaymentError::UpstreamError {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| PaymentError::malformed(PROVIDER, format!("order: {e}")))
    }
}

#[async_trait]
impl PaymentStrategy for PayPalStrategy {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.ensure_currency(&cart.currency)?;
        cart.validate()?;

        let total = cart.total()?;
        let body = self.build_order(cart);
        let token = self.access_token().await?;

        debug!(
            "Creating PayPal order: value={} {}",
            body.purchase_units[0].amount.value, cart.currency
        );

        let url = format!("{}/v2/checkout/orders", self.config.api_base());
        let order: OrderResponse = self
            .send(self.client.post(&url).json(&body), &token)
            .await?;

        let approve_url = order
            .links
            .iter()
            .find(|link| link.rel == PAYER_ACTION_REL)
            .map(|link| link.href.clone())
            .ok_or_else(|| {
                PaymentError::malformed(
                    PROVIDER,
                    format!("order {} has no {} link", order.id, PAYER_ACTION_REL),
                )
            })?;

        info!("Created PayPal order: id={}, status={}", order.id, order.status);

        Ok(Payment::for_cart(ProviderKind::PayPal, cart, total)
            .with_status(status_payment(ProviderKind::PayPal, &order.status))
            .with_url(approve_url)
            .with_merchant_id(order.id))
    }

    #[instrument(skip(self, payment), fields(cart_id = %payment.cart_id))]
    async fn checkout(&self, mut payment: Payment, order_id: &str) -> PaymentResult<Payment> {
        let order_id = ensure_remote_id(order_id, "order id")?;

        let token = self.access_token().await?;
        let url = format!(
            "{}/v2/checkout/orders/{}/capture",
            self.config.api_base(),
            order_id
        );
        let order: OrderResponse = self
            .send(self.client.post(&url).json(&serde_json::json!({})), &token)
            .await?;

        let capture = order
            .purchase_units
            .first()
            .and_then(|unit| unit.payments.as_ref())
            .and_then(|payments| payments.captures.first())
            .ok_or_else(|| {
                PaymentError::malformed(PROVIDER, format!("order {} has no capture", order.id))
            })?;

        payment.amount_total = parse_minor_units(&capture.amount.value).map_err(|e| {
            PaymentError::malformed(PROVIDER, format!("capture amount: {e}"))
        })?;
        payment.currency = capture.amount.currency_code.to_uppercase();
        payment.merchant_id = Some(capture.id.clone());
        payment.status = status_payment(ProviderKind::PayPal, &order.status);

        info!(
            "Captured PayPal order: id={}, capture={}, status={}",
            order.id, capture.id, payment.status
        );

        Ok(payment)
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::PayPal
    }

    fn config(&self) -> &ProviderConfig {
        &self.config.provider
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderRequest {
    intent: &'static str,
    purchase_units: Vec<PurchaseUnitRequest>,
    payment_source: PaymentSource,
}

#[derive(Debug, Serialize)]
struct PurchaseUnitRequest {
    reference_id: String,
    amount: Money,
}

#[derive(Debug, Serialize)]
struct PaymentSource {
    paypal: PayPalSource,
}

#[derive(Debug, Serialize)]
struct PayPalSource {
    experience_context: ExperienceContext,
}

#[derive(Debug, Serialize)]
struct ExperienceContext {
    user_action: &'static str,
    return_url: String,
    cancel_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Money {
    currency_code: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
    status: String,
    #[serde(default)]
    links: Vec<LinkDescription>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnitResponse>,
}

#[derive(Debug, Deserialize)]
struct LinkDescription {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnitResponse {
    #[serde(default)]
    payments: Option<PaymentCollection>,
}

#[derive(Debug, Deserialize)]
struct PaymentCollection {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
    amount: Money,
}
