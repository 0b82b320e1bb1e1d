//! Reqwest-backed gateway client.

use serde::Deserialize;
use tracing::debug;

use super::{EmailDraft, Gateway, GatewayError, GatewaySettings, SmsDraft};

/// HTTP client for the remote gateway.
///
/// One request at a time per component is enforced upstream by the session's
/// in-flight guard; the client itself is stateless and cheap to clone. No
/// retries, no timeout, no idempotency key: a submission the user retries
/// after a hung request may be delivered twice.
#[derive(Clone)]
pub struct GatewayClient {
    http: reqwest::Client,
    settings: GatewaySettings,
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Successful chat reply payload.
#[derive(Debug, Deserialize)]
struct ChatReply {
    response: Option<String>,
}

/// Best-effort shape of a gateway failure body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl GatewayClient {
    /// Create a new client with the given settings.
    #[must_use]
    pub fn new(settings: GatewaySettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.base_url.trim_end_matches('/'))
    }

    /// POST a JSON body and map a non-success status to [`GatewayError::Status`],
    /// extracting the `detail` field when the failure body carries one.
    async fn post_json<B>(&self, path: &str, body: &B) -> Result<reqwest::Response, GatewayError>
    where
        B: serde::Serialize + Sync + ?Sized,
    {
        let url = self.endpoint(path);
        let resp = self.http.post(&url).json(body).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let detail = resp
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .and_then(|b| b.detail);

        debug!(%url, %status, detail = ?detail, "gateway rejected request");
        Err(GatewayError::Status { status, detail })
    }
}

#[async_trait::async_trait]
impl Gateway for GatewayClient {
    async fn chat(&self, message: &str) -> Result<String, GatewayError> {
        let body = serde_json::json!({ "message": message });
        let resp = self.post_json("chat", &body).await?;

        let text = resp.text().await?;
        let reply: ChatReply =
            serde_json::from_str(&text).map_err(|_| GatewayError::MalformedReply)?;

        reply.response.ok_or(GatewayError::MalformedReply)
    }

    async fn send_email(&self, draft: &EmailDraft) -> Result<(), GatewayError> {
        self.post_json("send-email", draft).await?;
        Ok(())
    }

    async fn send_sms(&self, draft: &SmsDraft) -> Result<(), GatewayError> {
        self.post_json("send-sms", draft).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GatewayClient {
        GatewayClient::new(GatewaySettings {
            base_url: base_url.to_string(),
        })
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            client("http://gw.local/").endpoint("chat"),
            "http://gw.local/chat"
        );
        assert_eq!(
            client("http://gw.local").endpoint("send-sms"),
            "http://gw.local/send-sms"
        );
    }

    #[test]
    fn error_body_tolerates_missing_detail() {
        let parsed: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(parsed.detail.is_none());

        let parsed: ErrorBody = serde_json::from_str(r#"{"detail":"bad address"}"#).unwrap();
        assert_eq!(parsed.detail.as_deref(), Some("bad address"));
    }

    #[test]
    fn chat_reply_requires_response_field() {
        let parsed: ChatReply = serde_json::from_str(r#"{"response":"Hi"}"#).unwrap();
        assert_eq!(parsed.response.as_deref(), Some("Hi"));

        let parsed: ChatReply = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(parsed.response.is_none());
    }
}
