//! # pay-notify
//!
//! Outbound payment event notifications.
//!
//! ```rust,ignore
//! use pay_notify::{event_name_for, PaymentNotifier, StaticWebhookUrl};
//!
//! let notifier = PaymentNotifier::new(Arc::new(StaticWebhookUrl::new(settings.webhook_url)))?;
//! notifier.notify_payment(event_name_for(payment.status), &payment, &cart.items).await;
//! ```

pub mod notifier;
pub mod source;

pub use notifier::{
    event_name_for, PaymentEvent, PaymentEventData, PaymentNotifier, DELIVERY_TIMEOUT,
    MAX_LOGGED_BODY,
};
pub use source::{StaticWebhookUrl, WebhookUrlSource};
