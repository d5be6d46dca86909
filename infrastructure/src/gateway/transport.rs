//! HTTP transport to the gateway.
//!
//! One [`HttpTransport`] is bound to one gateway endpoint. Every call is a
//! single request with a per-request timeout; the gateway's own `code`
//! field is passed up uninterpreted, except inside a fetch envelope where a
//! non-zero code has no message list to return.

use crate::gateway::error::{HttpTransportError, Result};
use crate::gateway::protocol::{
    AuthRequest, AuthResponse, FetchResponse, SendRequest, SendResponse, SessionRequest,
    StatusResponse, endpoint, send_endpoint,
};
use async_trait::async_trait;
use mirai_application::{
    AuthReply, DeliveryReceipt, GatewayTransport, StatusReply, TransportError,
};
use mirai_domain::{BotId, Message, OutboundMessage, SessionConfig, SessionKey};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Gateway transport over HTTP+JSON
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Create a transport for `http://{host}:{port}`.
    pub fn for_endpoint(host: &str, port: u16) -> Result<Self> {
        Self::new(format!("http://{}:{}", host, port))
    }

    /// Create a transport for the port a session is configured with.
    pub fn for_session(host: &str, config: &SessionConfig) -> Result<Self> {
        Self::for_endpoint(host, config.port)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    async fn get<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        debug!(path, "GET");
        let response = self.client.get(self.url(path)).query(query).send().await?;
        Self::decode(response).await
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(HttpTransportError::Status {
                status: status.as_u16(),
            });
        }

        let raw = response.text().await?;
        trace!(body = %raw, "Gateway response");
        serde_json::from_str(&raw).map_err(|e| HttpTransportError::ParseError {
            error: e.to_string(),
            raw,
        })
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn auth(&self, auth_key: &str) -> std::result::Result<AuthReply, TransportError> {
        let response: AuthResponse = self
            .post(endpoint::AUTH, &AuthRequest { auth_key })
            .await?;
        Ok(response.into())
    }

    async fn verify(
        &self,
        session_key: &SessionKey,
        bot_id: BotId,
    ) -> std::result::Result<StatusReply, TransportError> {
        let body = SessionRequest {
            session_key: session_key.as_str(),
            qq: bot_id,
        };
        let response: StatusResponse = self.post(endpoint::VERIFY, &body).await?;
        Ok(response.into())
    }

    async fn release(
        &self,
        session_key: &SessionKey,
        bot_id: BotId,
    ) -> std::result::Result<StatusReply, TransportError> {
        let body = SessionRequest {
            session_key: session_key.as_str(),
            qq: bot_id,
        };
        let response: StatusResponse = self.post(endpoint::RELEASE, &body).await?;
        Ok(response.into())
    }

    async fn fetch_messages(
        &self,
        session_key: &SessionKey,
        count: usize,
    ) -> std::result::Result<Vec<Message>, TransportError> {
        let count = count.to_string();
        let query = [("sessionKey", session_key.as_str()), ("count", count.as_str())];
        let response: FetchResponse = self.get(endpoint::FETCH_MESSAGE, &query).await?;

        match response {
            FetchResponse::Messages(messages) => Ok(messages),
            FetchResponse::Envelope { code: 0, data, .. } => Ok(data),
            FetchResponse::Envelope { code, msg, .. } => Err(HttpTransportError::Rejected {
                code,
                message: msg,
            }
            .into()),
        }
    }

    async fn send_message(
        &self,
        session_key: &SessionKey,
        outbound: &OutboundMessage,
    ) -> std::result::Result<DeliveryReceipt, TransportError> {
        let body = SendRequest {
            session_key: session_key.as_str(),
            target: outbound.target.id(),
            message_chain: &outbound.chain,
            quote: outbound.quote.map(|q| q.value()),
        };
        let response: SendResponse = self.post(send_endpoint(&outbound.target), &body).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirai_domain::{MessageChain, MessageKind, QuoteId, SendTarget};
    use mockito::Matcher;
    use serde_json::json;

    fn key() -> SessionKey {
        SessionKey::new("abc")
    }

    #[test]
    fn test_for_endpoint_builds_base_url() {
        let transport = HttpTransport::for_endpoint("localhost", 8080).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_for_session_uses_session_port() {
        let config = SessionConfig::new(9090, "k", 1);
        let transport = HttpTransport::for_session("localhost", &config).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:9090");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(transport.url(endpoint::AUTH), "http://localhost:8080/auth");
    }

    #[tokio::test]
    async fn test_auth_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth")
            .match_body(Matcher::Json(json!({"authKey": "secret"})))
            .with_header("content-type", "application/json")
            .with_body(r#"{"code":0,"session":"abc"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let reply = transport.auth("secret").await.unwrap();

        assert_eq!(reply.code, 0);
        assert_eq!(reply.session.as_deref(), Some("abc"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_rejected_code_is_passed_up() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth")
            .with_body(r#"{"code":1,"msg":"Auth Key错误"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let reply = transport.auth("wrong").await.unwrap();

        assert_eq!(reply.code, 1);
        assert!(reply.session.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        // Nothing listens on port 1
        let transport = HttpTransport::for_endpoint("127.0.0.1", 1).unwrap();
        let err = transport.auth("secret").await.unwrap_err();
        assert!(matches!(err, TransportError::Unreachable(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_verify_and_release_bodies() {
        let mut server = mockito::Server::new_async().await;
        let verify = server
            .mock("POST", "/verify")
            .match_body(Matcher::Json(json!({"sessionKey": "abc", "qq": 42})))
            .with_body(r#"{"code":0,"msg":"success"}"#)
            .create_async()
            .await;
        let release = server
            .mock("POST", "/release")
            .match_body(Matcher::Json(json!({"sessionKey": "abc", "qq": 42})))
            .with_body(r#"{"code":3,"msg":"Session失效或不存在"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        assert!(transport.verify(&key(), 42).await.unwrap().is_success());
        let released = transport.release(&key(), 42).await.unwrap();
        assert_eq!(released.code, 3);

        verify.assert_async().await;
        release.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_messages_bare_array() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/fetchMessage")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sessionKey".into(), "abc".into()),
                Matcher::UrlEncoded("count".into(), "10".into()),
            ]))
            .with_body(
                json!([
                    {
                        "type": "GroupMessage",
                        "sender": {
                            "id": 2,
                            "memberName": "m",
                            "permission": "MEMBER",
                            "group": {"id": 100, "name": "g", "permission": "MEMBER"}
                        },
                        "messageChain": [
                            {"type": "Source", "id": 7, "time": 0},
                            {"type": "Plain", "text": "hi"}
                        ]
                    },
                    {"type": "GroupRecallEvent", "authorId": 1}
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let messages = transport.fetch_messages(&key(), 10).await.unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].kind(), MessageKind::Group);
        assert_eq!(messages[0].quote_id(), QuoteId::new(7));
        assert_eq!(messages[1].kind(), MessageKind::Other);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_messages_envelope() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/fetchMessage")
            .match_query(Matcher::Any)
            .with_body(r#"{"code":0,"msg":"","data":[]}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        assert!(transport.fetch_messages(&key(), 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_messages_envelope_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/fetchMessage")
            .match_query(Matcher::Any)
            .with_body(r#"{"code":3,"msg":"Session失效或不存在"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let err = transport.fetch_messages(&key(), 5).await.unwrap_err();
        assert!(matches!(err, TransportError::Rejected { code: 3, .. }));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/fetchMessage")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let err = transport.fetch_messages(&key(), 5).await.unwrap_err();
        assert_eq!(err, TransportError::Http { status: 500 });
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/auth")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let err = transport.auth("secret").await.unwrap_err();
        assert!(matches!(err, TransportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_send_quoted_group_message() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sendGroupMessage")
            .match_body(Matcher::Json(json!({
                "sessionKey": "abc",
                "target": 100,
                "quote": 7,
                "messageChain": [{"type": "Plain", "text": "pong"}]
            })))
            .with_body(r#"{"code":0,"msg":"success","messageId":55}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let outbound = OutboundMessage::new(SendTarget::Group(100), MessageChain::plain("pong"))
            .quoting(QuoteId::new(7).unwrap());
        let receipt = transport.send_message(&key(), &outbound).await.unwrap();

        assert!(receipt.is_success());
        assert_eq!(receipt.message_id, Some(55));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_friend_message_without_quote() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/sendFriendMessage")
            .match_body(Matcher::Json(json!({
                "sessionKey": "abc",
                "target": 1,
                "messageChain": [{"type": "Plain", "text": "hi"}]
            })))
            .with_body(r#"{"code":5,"msg":"指定对象不存在"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(server.url()).unwrap();
        let outbound = OutboundMessage::new(SendTarget::Friend(1), MessageChain::plain("hi"));
        let receipt = transport.send_message(&key(), &outbound).await.unwrap();

        assert_eq!(receipt.code, 5);
        assert!(receipt.message_id.is_none());
        mock.assert_async().await;
    }
}
