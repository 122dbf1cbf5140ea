//! # Stripe Checkout Sessions
//!
//! `pay` creates a hosted Checkout Session from the cart's line items;
//! `checkout` retrieves the session after the customer returns.

use crate::config::StripeConfig;
use async_trait::async_trait;
use pay_core::{
    ensure_remote_id, status_payment, Cart, Payment, PaymentError, PaymentResult,
    PaymentStrategy, ProviderConfig, ProviderKind, Status,
};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page; the secret key authenticates as the
/// Basic-Auth username.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env(provider: ProviderConfig) -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env(provider)?)
    }

    /// Form fields for a Checkout Session, in Stripe's bracket notation
    fn build_form(&self, cart: &Cart) -> Vec<(String, String)> {
        let provider = &self.config.provider;
        let currency = cart.currency.to_lowercase();

        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("client_reference_id".to_string(), cart.id.clone()),
            (
                "success_url".to_string(),
                provider.success_url_with_session(&cart.id),
            ),
            ("cancel_url".to_string(), provider.cancel_url_for(&cart.id)),
        ];

        for (i, item) in cart.items.iter().enumerate() {
            let product = &item.price.product;
            form_params.push((
                format!("line_items[{}][price_data][currency]", i),
                currency.clone(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.price.unit_amount.to_string(),
            ));
            form_params.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                product.name.clone(),
            ));
            if let Some(ref desc) = product.description {
                form_params.push((
                    format!("line_items[{}][price_data][product_data][description]", i),
                    desc.clone(),
                ));
            }
            for (j, img) in product.images.iter().enumerate() {
                form_params.push((
                    format!("line_items[{}][price_data][product_data][images][{}]", i, j),
                    img.clone(),
                ));
            }
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }

    /// Send an authenticated request and decode the session it returns
    async fn send(&self, request: RequestBuilder) -> PaymentResult<StripeCheckoutSessionResponse> {
        let response = request
            .basic_auth(&self.config.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        if !status.is_success() {
            match serde_json::from_str::<StripeErrorResponse>(&body) {
                Ok(parsed) => error!(
                    "Stripe API error: status={}, message={}, code={:?}",
                    status, parsed.error.message, parsed.error.code
                ),
                Err(_) => error!("Stripe API error: status={}, body={}", status, body),
            }
            return Err(PaymentError::UpstreamError {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::malformed(PROVIDER, format!("checkout session: {e}"))
        })
    }
}

/// An expired session reports `unpaid`; its lifecycle status is the better signal.
fn session_status(session: &StripeCheckoutSessionResponse) -> Status {
    match session.status.as_deref() {
        Some("expired") => status_payment(ProviderKind::Stripe, "expired"),
        _ => status_payment(ProviderKind::Stripe, &session.payment_status),
    }
}

#[async_trait]
impl PaymentStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.ensure_currency(&cart.currency)?;
        cart.validate()?;

        let local_total = cart.total()?;
        let form_params = self.build_form(cart);

        debug!(
            "Creating Stripe checkout session: {} items, total={}",
            cart.items.len(),
            local_total
        );

        let url = format!("{}/v1/checkout/sessions", self.config.api_base());
        let session = self.send(self.client.post(&url).form(&form_params)).await?;

        let checkout_url = session.url.clone().ok_or_else(|| {
            PaymentError::malformed(PROVIDER, format!("session {} has no url", session.id))
        })?;

        info!(
            "Created Stripe checkout session: id={}, payment_status={}",
            session.id, session.payment_status
        );

        let mut payment = Payment::for_cart(
            ProviderKind::Stripe,
            cart,
            session.amount_total.unwrap_or(local_total),
        )
        .with_status(session_status(&session))
        .with_url(checkout_url)
        .with_merchant_id(session.id);

        if let Some(currency) = session.currency {
            payment.currency = currency.to_uppercase();
        }

        Ok(payment)
    }

    #[instrument(skip(self, payment), fields(cart_id = %payment.cart_id))]
    async fn checkout(&self, mut payment: Payment, session_id: &str) -> PaymentResult<Payment> {
        let session_id = ensure_remote_id(session_id, "checkout session id")?;

        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.config.api_base(),
            session_id
        );
        let session = self.send(self.client.get(&url)).await?;

        payment.status = session_status(&session);
        if let Some(amount) = session.amount_total {
            payment.amount_total = amount;
        }
        if let Some(currency) = &session.currency {
            payment.currency = currency.to_uppercase();
        }
        payment.merchant_id = Some(session.payment_intent.unwrap_or(session.id));

        info!(
            "Retrieved Stripe checkout session: status={}, amount={}",
            payment.status, payment.amount_total
        );

        Ok(payment)
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::Stripe
    }

    fn config(&self) -> &ProviderConfig {
        &self.config.provider
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
    /// open | complete | expired
    #[serde(default)]
    status: Option<String>,
    payment_status: String,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    payment_intent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}
