// src/services/lead_forwarder.rs - Relays lead submissions to the form-processing service
use actix_web::web::Bytes;
use async_trait::async_trait;
use log::{error, info, warn};
use reqwest::{header, Client};
use serde::Deserialize;

use crate::errors::AppError;

type Result<T> = std::result::Result<T, AppError>;

/// Left in `.env.example`; an endpoint still ending with it was never set up
pub const ENDPOINT_PLACEHOLDER: &str = "YOUR_FORM_ID";

pub const NOT_CONFIGURED_MESSAGE: &str =
    "Form endpoint is not configured. Set FORMSPREE_ENDPOINT in your environment variables.";
const FALLBACK_UPSTREAM_MESSAGE: &str = "Unable to submit form at this time.";
const TRANSPORT_FAILURE_MESSAGE: &str = "Unexpected error submitting form.";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadForwarderTrait: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Sends the raw form body upstream.
    ///
    /// ### Returns
    /// * `Ok(())` when upstream accepted the submission
    /// * `AppError::Upstream` carrying upstream's status and best message otherwise
    async fn forward(&self, body: Bytes) -> Result<()>;
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamFieldError {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UpstreamErrorBody {
    errors: Option<Vec<UpstreamFieldError>>,
    message: Option<String>,
}

impl UpstreamErrorBody {
    fn best_message(self) -> String {
        self.errors
            .and_then(|errors| errors.into_iter().next())
            .and_then(|first| first.message)
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_UPSTREAM_MESSAGE.to_string())
    }
}

pub struct FormspreeForwarder {
    client: Client,
    endpoint: Option<String>,
}

impl FormspreeForwarder {
    pub fn new(client: Client, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    fn configured_endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.ends_with(ENDPOINT_PLACEHOLDER))
    }
}

#[async_trait]
impl LeadForwarderTrait for FormspreeForwarder {
    fn is_configured(&self) -> bool {
        self.configured_endpoint().is_some()
    }

    async fn forward(&self, body: Bytes) -> Result<()> {
        let endpoint = self
            .configured_endpoint()
            .ok_or_else(|| AppError::Config(NOT_CONFIGURED_MESSAGE.to_string()))?;

        let response = self
            .client
            .post(endpoint)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Lead forwarding request failed: {}", e);
                AppError::Internal(TRANSPORT_FAILURE_MESSAGE.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Lead forwarded upstream ({})", status);
            return Ok(());
        }

        // A body that is not JSON still falls through to the generic message
        let message = response
            .json::<UpstreamErrorBody>()
            .await
            .unwrap_or_default()
            .best_message();
        warn!("Lead forwarding rejected with {}: {}", status, message);

        Err(AppError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn forwarder(endpoint: Option<String>) -> FormspreeForwarder {
        FormspreeForwarder::new(Client::new(), endpoint)
    }

    #[test]
    fn test_placeholder_endpoint_is_not_configured() {
        assert!(!forwarder(None).is_configured());
        assert!(!forwarder(Some("https://formspree.io/f/YOUR_FORM_ID".to_string())).is_configured());
        assert!(forwarder(Some("https://formspree.io/f/xabc123".to_string())).is_configured());
    }

    #[tokio::test]
    async fn test_forward_without_endpoint_is_config_error() {
        let err = forwarder(None).forward(Bytes::from_static(b"a=1")).await.unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m == NOT_CONFIGURED_MESSAGE));
    }

    #[tokio::test]
    async fn test_forward_sends_raw_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/f/lead")
                    .header("accept", "application/json")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .body("zipCode=32801&consent=on");
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let result = forwarder(Some(server.url("/f/lead")))
            .forward(Bytes::from_static(b"zipCode=32801&consent=on"))
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_field_error_message_is_relayed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/f/lead");
                then.status(422).json_body(json!({
                    "errors": [{ "field": "email", "message": "should be an email" }],
                    "message": "Validation failed"
                }));
            })
            .await;

        let err = forwarder(Some(server.url("/f/lead")))
            .forward(Bytes::from_static(b"email=x"))
            .await
            .unwrap_err();

        match err {
            AppError::Upstream { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "should be an email");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upstream_top_level_message_then_fallback() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/with-message");
                then.status(403).json_body(json!({ "message": "Form disabled" }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/html");
                then.status(502).body("<html>bad gateway</html>");
            })
            .await;

        let err = forwarder(Some(server.url("/with-message")))
            .forward(Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Form disabled");

        let err = forwarder(Some(server.url("/html")))
            .forward(Bytes::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Upstream { status: 502, .. }));
        assert_eq!(err.to_string(), FALLBACK_UPSTREAM_MESSAGE);
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal_error() {
        // Nothing listens on port 9 of localhost
        let err = forwarder(Some("http://127.0.0.1:9/f/lead".to_string()))
            .forward(Bytes::from_static(b"a=1"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), TRANSPORT_FAILURE_MESSAGE);
    }
}
