//! Remote gateway client traits and implementation.
//!
//! The console never performs any messaging work itself; every submission is
//! relayed to a remote HTTP gateway exposing three JSON endpoints:
//!
//! - `POST /chat` with `{ "message": … }`, answering `{ "response": … }`
//! - `POST /send-email` with `{ "to": …, "subject": …, "body": … }`
//! - `POST /send-sms` with `{ "to": …, "message": … }`
//!
//! The [`Gateway`] trait is the seam the HTTP handlers depend on;
//! [`GatewayClient`] is the reqwest-backed implementation.

pub mod client;

pub use client::GatewayClient;

use serde::{Deserialize, Serialize};

/// Gateway connection settings.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Base URL of the gateway (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
}

/// An email waiting to be sent.
///
/// The field names match both the HTML form and the gateway wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// An SMS waiting to be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsDraft {
    /// Destination number, digits only ("+" prefix is implied).
    pub to: String,
    /// Message text. The gateway caps messages at 1600 characters; the
    /// console only advises the limit, it does not enforce it.
    pub message: String,
}

/// Errors from a gateway call.
///
/// Handlers collapse all three variants into a single user-visible outcome;
/// the distinction only matters for logging and for surfacing a
/// server-supplied `detail` message.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never completed (connection, DNS, body read).
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The gateway answered with a non-success status.
    #[error("gateway returned status {status}")]
    Status {
        /// HTTP status the gateway answered with.
        status: reqwest::StatusCode,
        /// Server-supplied `detail` field, when the failure body carried one.
        detail: Option<String>,
    },
    /// The gateway answered 2xx but the payload was not the expected shape.
    #[error("gateway reply was missing the response text")]
    MalformedReply,
}

impl GatewayError {
    /// Server-supplied error detail, when present.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Status { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::MalformedReply => None,
        }
    }
}

/// Outbound interface to the remote gateway.
///
/// Exactly one implementation talks HTTP ([`GatewayClient`]); tests install
/// fakes to script success and failure paths.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Send one chat message and return the assistant's reply text.
    async fn chat(&self, message: &str) -> Result<String, GatewayError>;

    /// Relay an email send request.
    async fn send_email(&self, draft: &EmailDraft) -> Result<(), GatewayError>;

    /// Relay an SMS send request.
    async fn send_sms(&self, draft: &SmsDraft) -> Result<(), GatewayError>;
}
