//! # Payment Error Types
//!
//! Typed error handling for the paygate payment engine.
//! All provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid settings)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (empty cart, zero quantity, overflow)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Cart currency is not in the provider's supported list
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Token or credential acquisition failed
    #[error("Authentication failed [{provider}]: {message}")]
    AuthFailure { provider: String, message: String },

    /// Network-level failure talking to the provider
    #[error("Transport failure [{provider}]: {message}")]
    TransportFailure { provider: String, message: String },

    /// Provider answered with a non-success HTTP status
    #[error("Upstream error [{provider}]: HTTP {status}: {body}")]
    UpstreamError {
        provider: String,
        status: u16,
        body: String,
    },

    /// Provider rejected the request as unprocessable (HTTP 422)
    #[error("Unprocessable [{provider}]: {body}")]
    Unprocessable { provider: String, body: String },

    /// Expected response field missing or of the wrong type
    #[error("Malformed response [{provider}]: {message}")]
    MalformedResponse { provider: String, message: String },

    /// Signing key could not be used
    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),

    /// Operation exists in the contract but the provider cannot perform it
    #[error("{operation} is not implemented for {provider}")]
    NotImplemented {
        provider: String,
        operation: &'static str,
    },
}

impl PaymentError {
    pub fn transport(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        PaymentError::TransportFailure {
            provider: provider.into(),
            message: err.to_string(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if a caller-side retry could plausibly succeed.
    /// Nothing in this workspace retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::TransportFailure { .. } => true,
            PaymentError::UpstreamError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidRequest(_) => 400,
            PaymentError::UnsupportedCurrency { .. } => 400,
            PaymentError::AuthFailure { .. } => 502,
            PaymentError::TransportFailure { .. } => 503,
            PaymentError::UpstreamError { .. } => 502,
            PaymentError::Unprocessable { .. } => 422,
            PaymentError::MalformedResponse { .. } => 502,
            PaymentError::InvalidSigningKey(_) => 500,
            PaymentError::NotImplemented { .. } => 501,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
