//! # paygate
//!
//! Runs one checkout against the configured provider.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: pick a provider and its credentials
//! export PAYGATE_PROVIDER=stripe
//! export STRIPE_SECRET_KEY=sk_test_...
//!
//! paygate
//! ```

use pay_core::{Cart, Item, PaymentStrategy, Price, Product, ProviderKind};
use pay_gateway::{Gateway, Settings};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let settings = Settings::load_default()?;
    let gateway = Gateway::from_settings(&settings)?;

    info!("Provider: {}", gateway.provider().provider());
    info!(
        "Webhook: {}",
        settings.webhook_url.as_deref().unwrap_or("disabled")
    );

    let cart = Cart::new(
        "demo00000000001",
        "usd",
        vec![
            Item::new(Price::new(1999, Product::new("T-shirt")), 1),
            Item::new(Price::new(450, Product::new("Sticker pack")), 2),
        ],
    );

    let payment = gateway.pay(&cart).await?;
    info!(
        "Payment opened: status={}, total={} {}",
        payment.status, payment.amount_total, payment.currency
    );
    if let Some(url) = &payment.url {
        println!("Redirect the customer to: {url}");
    }

    // Live providers need the customer to come back with a session id first.
    if gateway.provider().provider() == ProviderKind::Dummy {
        let payment = gateway.complete(payment, "demo", &cart.items).await?;
        println!(
            "Payment {}: merchant id {}",
            payment.status,
            payment.merchant_id.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
