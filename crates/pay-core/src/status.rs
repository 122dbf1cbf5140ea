//! # Payment Status
//!
//! One lifecycle vocabulary for every provider, and the per-provider tables
//! translating raw provider status codes into it.
//!
//! Unknown raw values never map to success: anything absent from a table,
//! including the empty string, becomes [`Status::Failed`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    New,
    Unpaid,
    /// Paid
    Pay,
    Processed,
    Canceled,
    Failed,
    Test,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Unpaid => "unpaid",
            Status::Pay => "pay",
            Status::Processed => "processed",
            Status::Canceled => "canceled",
            Status::Failed => "failed",
            Status::Test => "test",
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Status::Pay)
    }

    /// No further transition is expected from the provider
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Pay | Status::Canceled | Status::Failed)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::New
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Status::New),
            "unpaid" => Ok(Status::Unpaid),
            "pay" => Ok(Status::Pay),
            "processed" => Ok(Status::Processed),
            "canceled" => Ok(Status::Canceled),
            "failed" => Ok(Status::Failed),
            "test" => Ok(Status::Test),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// The closed set of payment providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// No-network stand-in
    Dummy,
    Stripe,
    #[serde(rename = "paypal")]
    PayPal,
    #[serde(rename = "spectrocoin")]
    SpectroCoin,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::Dummy,
        ProviderKind::Stripe,
        ProviderKind::PayPal,
        ProviderKind::SpectroCoin,
    ];

    /// Stable tag used in URLs, logs and notifications
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Dummy => "dummy",
            ProviderKind::Stripe => "stripe",
            ProviderKind::PayPal => "paypal",
            ProviderKind::SpectroCoin => "spectrocoin",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown payment provider: {s}"))
    }
}

/// Translate a raw provider status into [`Status`].
pub fn status_payment(provider: ProviderKind, raw: &str) -> Status {
    match provider {
        ProviderKind::Dummy => raw.parse().unwrap_or(Status::Failed),
        ProviderKind::Stripe => stripe_status(raw),
        ProviderKind::PayPal => paypal_status(raw),
        ProviderKind::SpectroCoin => spectrocoin_status(raw),
    }
}

fn stripe_status(raw: &str) -> Status {
    match raw {
        "pay" | "paid" | "complete" | "succeeded" => Status::Pay,
        "unpaid" => Status::Unpaid,
        "open" | "processing" | "requires_capture" => Status::Processed,
        "expired" | "canceled" => Status::Canceled,
        "requires_payment_method" | "requires_confirmation" | "requires_action" => Status::Failed,
        _ => Status::Failed,
    }
}

fn paypal_status(raw: &str) -> Status {
    match raw {
        "CREATED" | "SAVED" | "APPROVED" | "PAYER_ACTION_REQUIRED" => Status::Processed,
        "VOIDED" => Status::Canceled,
        "COMPLETED" => Status::Pay,
        _ => Status::Failed,
    }
}

fn spectrocoin_status(raw: &str) -> Status {
    match raw {
        // new order, nothing received yet
        "1" => Status::Unpaid,
        "2" => Status::Processed,
        "3" => Status::Pay,
        "4" => Status::Failed,
        // expired
        "5" => Status::Failed,
        "6" => Status::Test,
        _ => Status::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stripe_table() {
        let table = [
            ("pay", Status::Pay),
            ("paid", Status::Pay),
            ("unpaid", Status::Unpaid),
            ("open", Status::Processed),
            ("complete", Status::Pay),
            ("expired", Status::Canceled),
            ("requires_payment_method", Status::Failed),
            ("requires_confirmation", Status::Failed),
            ("requires_action", Status::Failed),
            ("processing", Status::Processed),
            ("requires_capture", Status::Processed),
            ("canceled", Status::Canceled),
            ("succeeded", Status::Pay),
        ];
        for (raw, expected) in table {
            assert_eq!(status_payment(ProviderKind::Stripe, raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_paypal_table() {
        let table = [
            ("CREATED", Status::Processed),
            ("SAVED", Status::Processed),
            ("APPROVED", Status::Processed),
            ("PAYER_ACTION_REQUIRED", Status::Processed),
            ("VOIDED", Status::Canceled),
            ("COMPLETED", Status::Pay),
        ];
        for (raw, expected) in table {
            assert_eq!(status_payment(ProviderKind::PayPal, raw), expected, "{raw}");
        }
    }

    #[test]
    fn test_spectrocoin_table() {
        let table = [
            ("1", Status::Unpaid),
            ("2", Status::Processed),
            ("3", Status::Pay),
            ("4", Status::Failed),
            ("5", Status::Failed),
            ("6", Status::Test),
        ];
        for (raw, expected) in table {
            assert_eq!(
                status_payment(ProviderKind::SpectroCoin, raw),
                expected,
                "{raw}"
            );
        }
    }

    #[test]
    fn test_unknown_fails_closed() {
        for provider in ProviderKind::ALL {
            assert_eq!(status_payment(provider, ""), Status::Failed);
            assert_eq!(status_payment(provider, "definitely-not-a-status"), Status::Failed);
        }
        // tables are case sensitive
        assert_eq!(status_payment(ProviderKind::PayPal, "completed"), Status::Failed);
        assert_eq!(status_payment(ProviderKind::Stripe, "PAID"), Status::Failed);
        assert_eq!(status_payment(ProviderKind::SpectroCoin, "7"), Status::Failed);
    }

    #[test]
    fn test_dummy_speaks_native_vocabulary() {
        assert_eq!(status_payment(ProviderKind::Dummy, "pay"), Status::Pay);
        assert_eq!(status_payment(ProviderKind::Dummy, "canceled"), Status::Canceled);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&Status::Pay).unwrap(), "\"pay\"");
        let parsed: Status = serde_json::from_str("\"processed\"").unwrap();
        assert_eq!(parsed, Status::Processed);
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("PayPal".parse::<ProviderKind>(), Ok(ProviderKind::PayPal));
        assert_eq!(
            serde_json::to_string(&ProviderKind::SpectroCoin).unwrap(),
            "\"spectrocoin\""
        );
        assert!("square".parse::<ProviderKind>().is_err());
    }
}
