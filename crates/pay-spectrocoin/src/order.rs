//! # SpectroCoin Orders
//!
//! `pay` posts a signed `createOrder` form. There is no capture call:
//! `checkout` reports `NotImplemented` until the settlement flow is decided.

use crate::config::{SpectroCoinConfig, DEFAULT_PAY_CURRENCY};
use crate::sign::{load_private_key, sign_with_key};
use async_trait::async_trait;
use pay_core::{
    from_minor_units, status_payment, to_minor_units, Cart, Coin, Payment, PaymentError,
    PaymentResult, PaymentStrategy, ProviderConfig, ProviderKind,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use rsa::RsaPrivateKey;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "spectrocoin";

/// Raw status SpectroCoin gives a freshly created order
const NEW_ORDER_STATUS: &str = "1";

pub struct SpectroCoinStrategy {
    config: SpectroCoinConfig,
    key: RsaPrivateKey,
    client: Client,
}

impl SpectroCoinStrategy {
    /// Fails with `InvalidSigningKey` if the configured key is unusable, or
    /// `Configuration` when no callback URL is set.
    pub fn new(config: SpectroCoinConfig) -> PaymentResult<Self> {
        let key = load_private_key(&config.private_key_pem)?;
        if config.provider.callback_url.is_empty() {
            return Err(PaymentError::Configuration(
                "SpectroCoin requires a callback_url".to_string(),
            ));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            config,
            key,
            client,
        })
    }

    pub fn from_env(provider: ProviderConfig) -> PaymentResult<Self> {
        Self::new(SpectroCoinConfig::from_env(provider)?)
    }

    /// Unsigned form body. Field order is part of what gets signed.
    fn build_form(&self, cart: &Cart, total: i64) -> PaymentResult<String> {
        let provider = &self.config.provider;
        let fields: [(&str, String); 11] = [
            ("merchantId", self.config.merchant_id.clone()),
            ("userId", self.config.user_id.clone()),
            ("projectId", self.config.project_id.clone()),
            ("orderId", cart.id.clone()),
            ("payCurrency", DEFAULT_PAY_CURRENCY.to_string()),
            ("payAmount", "0.0".to_string()),
            ("receiveCurrency", cart.currency.clone()),
            ("receiveAmount", from_minor_units(total).to_string()),
            ("callbackUrl", provider.callback_url_for(&cart.id)),
            ("successUrl", provider.success_url_for(&cart.id)),
            ("failureUrl", provider.cancel_url_for(&cart.id)),
        ];

        serde_urlencoded::to_string(&fields[..])
            .map_err(|e| PaymentError::InvalidRequest(format!("form encoding: {e}")))
    }

    /// Form body with the `sign` field appended
    fn signed_form(&self, cart: &Cart, total: i64) -> PaymentResult<String> {
        let body = self.build_form(cart, total)?;
        let signature = sign_with_key(body.as_bytes(), &self.key)?;
        let sign_field = serde_urlencoded::to_string(&[("sign", signature)][..])
            .map_err(|e| PaymentError::InvalidRequest(format!("form encoding: {e}")))?;
        Ok(format!("{body}&{sign_field}"))
    }
}

#[async_trait]
impl PaymentStrategy for SpectroCoinStrategy {
    #[instrument(skip(self, cart), fields(cart_id = %cart.id))]
    async fn pay(&self, cart: &Cart) -> PaymentResult<Payment> {
        self.ensure_currency(&cart.currency)?;
        cart.validate()?;

        let total = cart.total()?;
        let body = self.signed_form(cart, total)?;
        let url = format!("{}/createOrder", self.config.api_base());

        debug!("Creating SpectroCoin order: receive={} {}", total, cart.currency);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::transport(PROVIDER, e))?;

        if !status.is_success() {
            error!("SpectroCoin API error: status={}, body={}", status, text);
            return Err(PaymentError::UpstreamError {
                provider: PROVIDER.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let order: CreateOrderResponse = serde_json::from_str(&text)
            .map_err(|e| PaymentError::malformed(PROVIDER, format!("createOrder: {e}")))?;

        let amount_total = to_minor_units(order.receive_amount).map_err(|e| {
            PaymentError::malformed(PROVIDER, format!("receiveAmount: {e}"))
        })?;

        info!(
            "Created SpectroCoin order: cart={}, receive={} {}",
            cart.id, order.receive_amount, order.receive_currency
        );

        let mut payment = Payment::for_cart(ProviderKind::SpectroCoin, cart, amount_total)
            .with_status(status_payment(ProviderKind::SpectroCoin, NEW_ORDER_STATUS))
            .with_url(order.redirect_url);
        payment.currency = order.receive_currency.to_uppercase();
        payment.coin = match (order.pay_currency, order.pay_amount) {
            (Some(currency), Some(amount)) if !amount.is_zero() => Some(Coin { currency, amount }),
            _ => None,
        };

        Ok(payment)
    }

    async fn checkout(&self, _payment: Payment, session_id: &str) -> PaymentResult<Payment> {
        warn!("SpectroCoin capture requested for {} but is not supported", session_id);
        Err(PaymentError::NotImplemented {
            provider: PROVIDER.to_string(),
            operation: "checkout",
        })
    }

    fn provider(&self) -> ProviderKind {
        ProviderKind::SpectroCoin
    }

    fn config(&self) -> &ProviderConfig {
        &self.config.provider
    }
}

// =============================================================================
// SpectroCoin API Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderResponse {
    receive_amount: Decimal,
    receive_currency: String,
    redirect_url: String,
    #[serde(default)]
    pay_amount: Option<Decimal>,
    #[serde(default)]
    pay_currency: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::tests::{pkcs8_pem, public_pem};
    use crate::sign::verify;
    use pay_core::{Item, Price, Product, Status};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn strategy(base: &str) -> SpectroCoinStrategy {
        let provider = ProviderConfig::new(
            ProviderKind::SpectroCoin,
            "https://shop.example.com/success",
            "https://shop.example.com/fail",
        )
        .with_callback_url("https://shop.example.com/callback")
        .with_currencies(["EUR", "USD"])
        .with_api_base(base);
        SpectroCoinStrategy::new(SpectroCoinConfig::new("m-1", "u-2", "p-3", pkcs8_pem(), provider))
            .unwrap()
    }

    fn cart(currency: &str) -> Cart {
        Cart::new(
            "a1s2d3f4g5h6j7k",
            currency,
            vec![Item::new(Price::new(1250, Product::new("Ebook")), 2)],
        )
    }

    #[test]
    fn test_form_field_order() {
        let body = strategy("http://unused").build_form(&cart("eur"), 2500).unwrap();
        let keys: Vec<&str> = body
            .split('&')
            .map(|pair| pair.split('=').next().unwrap_or_default())
            .collect();

        assert_eq!(
            keys,
            [
                "merchantId",
                "userId",
                "projectId",
                "orderId",
                "payCurrency",
                "payAmount",
                "receiveCurrency",
                "receiveAmount",
                "callbackUrl",
                "successUrl",
                "failureUrl"
            ]
        );
        assert!(body.contains("payCurrency=BTC&payAmount=0.0"));
        assert!(body.contains("receiveCurrency=EUR&receiveAmount=25.00"));
        assert!(body.contains(
            "callbackUrl=https%3A%2F%2Fshop.example.com%2Fcallback%3Fprovider%3Dspectrocoin%26cart_id%3Da1s2d3f4g5h6j7k"
        ));
    }

    #[test]
    fn test_signature_covers_body() {
        let strategy = strategy("http://unused");
        let unsigned = strategy.build_form(&cart("eur"), 2500).unwrap();
        let signed = strategy.signed_form(&cart("eur"), 2500).unwrap();

        let sign_field = signed
            .strip_prefix(&format!("{unsigned}&sign="))
            .expect("sign appended last");
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(&format!("sign={sign_field}")).unwrap();

        assert!(verify(unsigned.as_bytes(), &pairs[0].1, &public_pem()).unwrap());
    }

    #[tokio::test]
    async fn test_pay_creates_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createOrder"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("orderId=a1s2d3f4g5h6j7k"))
            .and(body_string_contains("&sign="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "orderRequestId": 1234567,
                "orderId": "a1s2d3f4g5h6j7k",
                "payCurrency": "BTC",
                "payAmount": "0.00041",
                "receiveCurrency": "EUR",
                "receiveAmount": 25.0,
                "redirectUrl": "https://spectrocoin.com/en/order/view/1234567-abc.html"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let payment = strategy(&server.uri()).pay(&cart("eur")).await.unwrap();

        assert_eq!(payment.provider, ProviderKind::SpectroCoin);
        assert_eq!(payment.amount_total, 2500);
        assert_eq!(payment.currency, "EUR");
        assert_eq!(payment.status, Status::Unpaid);
        assert_eq!(
            payment.url.as_deref(),
            Some("https://spectrocoin.com/en/order/view/1234567-abc.html")
        );
        let coin = payment.coin.unwrap();
        assert_eq!(coin.currency, "BTC");
        assert_eq!(coin.amount.to_string(), "0.00041");
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "receiveAmount": "25.00",
                "receiveCurrency": ["EUR"]
            })))
            .mount(&server)
            .await;

        let err = strategy(&server.uri()).pay(&cart("eur")).await.unwrap_err();
        assert!(matches!(err, PaymentError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_receive_amount_out_of_range_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "receiveAmount": "79228162514264337593543950335",
                "receiveCurrency": "EUR",
                "redirectUrl": "https://spectrocoin.com/en/order/view/1.html"
            })))
            .mount(&server)
            .await;

        let err = strategy(&server.uri()).pay(&cart("eur")).await.unwrap_err();
        assert!(matches!(err, PaymentError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!([
                { "code": 99, "message": "Invalid signature" }
            ])))
            .mount(&server)
            .await;

        let err = strategy(&server.uri()).pay(&cart("eur")).await.unwrap_err();
        match err {
            PaymentError::UpstreamError { status, body, .. } => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid signature"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_pay_rejects_currency() {
        let err = strategy("http://127.0.0.1:9").pay(&cart("gbp")).await.unwrap_err();
        assert!(matches!(err, PaymentError::UnsupportedCurrency { .. }));
    }

    #[tokio::test]
    async fn test_checkout_not_implemented() {
        let payment = Payment::for_cart(ProviderKind::SpectroCoin, &cart("eur"), 2500);
        let err = strategy("http://unused")
            .checkout(payment, "1234567")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::NotImplemented { operation: "checkout", .. }));
    }

    #[test]
    fn test_invalid_key_rejected_at_construction() {
        let provider = ProviderConfig::new(ProviderKind::SpectroCoin, "https://s", "https://c")
            .with_callback_url("https://cb");
        let result =
            SpectroCoinStrategy::new(SpectroCoinConfig::new("m", "u", "p", "garbage", provider));
        assert!(matches!(result, Err(PaymentError::InvalidSigningKey(_))));
    }

    #[test]
    fn test_missing_callback_rejected() {
        let provider = ProviderConfig::new(ProviderKind::SpectroCoin, "https://s", "https://c");
        let result =
            SpectroCoinStrategy::new(SpectroCoinConfig::new("m", "u", "p", pkcs8_pem(), provider));
        assert!(matches!(result, Err(PaymentError::Configuration(_))));
    }
}
