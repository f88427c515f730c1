//! HTTP delivery of the CloudFormation callback

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use tgw_route_core::callback::{CallbackBody, CallbackError, CallbackSender};

/// Delivers the callback body with a single HTTP PUT.
pub struct HttpCallbackSender {
    http: reqwest::Client,
}

impl HttpCallbackSender {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpCallbackSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn send(&self, url: &str, body: &CallbackBody) -> Result<(), CallbackError> {
        let payload =
            serde_json::to_string(body).map_err(|e| CallbackError::Transport(e.to_string()))?;

        // The pre-signed URL is signed with an empty Content-Type; sending
        // anything else fails the signature check on the S3 side.
        let response = self
            .http
            .put(url)
            .header(CONTENT_TYPE, "")
            .body(payload)
            .send()
            .await
            .map_err(|e| CallbackError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallbackError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn body() -> CallbackBody {
        CallbackBody {
            status: "SUCCESS".to_string(),
            request_id: "req-1".to_string(),
            logical_resource_id: "TgwRoute".to_string(),
            stack_id: "arn:aws:cloudformation:us-east-1:123456789012:stack/network/guid"
                .to_string(),
            reason: String::new(),
            physical_resource_id: "TgwRoute-req-1".to_string(),
        }
    }

    #[tokio::test]
    async fn puts_body_with_empty_content_type() {
        let server = MockServer::start().await;
        let expected = serde_json::to_string(&body()).unwrap();

        Mock::given(method("PUT"))
            .and(path("/callback"))
            .and(header("content-type", ""))
            .and(body_json_string(&expected))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let sender = HttpCallbackSender::new();
        let result = sender
            .send(&format!("{}/callback", server.uri()), &body())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn non_2xx_status_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let sender = HttpCallbackSender::new();
        let result = sender.send(&server.uri(), &body()).await;

        match result {
            Err(CallbackError::Rejected(status)) => assert_eq!(status, 403),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unreachable_url_is_a_transport_error() {
        let sender = HttpCallbackSender::new();
        // Port 1 on loopback refuses the connection outright.
        let result = sender.send("http://127.0.0.1:1/callback", &body()).await;

        assert!(matches!(result, Err(CallbackError::Transport(_))));
    }
}
