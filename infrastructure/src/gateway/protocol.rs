//! Wire types for the gateway's HTTP API.
//!
//! Request bodies borrow from the caller; response bodies are decoded into
//! these structs and then converted to the application's reply types.

use mirai_application::{AuthReply, DeliveryReceipt, StatusReply};
use mirai_domain::{Message, MessageChain, SendTarget};
use serde::{Deserialize, Serialize};

/// Endpoint paths
pub mod endpoint {
    pub const AUTH: &str = "/auth";
    pub const VERIFY: &str = "/verify";
    pub const RELEASE: &str = "/release";
    pub const FETCH_MESSAGE: &str = "/fetchMessage";
    pub const SEND_FRIEND_MESSAGE: &str = "/sendFriendMessage";
    pub const SEND_GROUP_MESSAGE: &str = "/sendGroupMessage";
}

/// Send endpoint for a target.
pub fn send_endpoint(target: &SendTarget) -> &'static str {
    match target {
        SendTarget::Friend(_) => endpoint::SEND_FRIEND_MESSAGE,
        SendTarget::Group(_) => endpoint::SEND_GROUP_MESSAGE,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest<'a> {
    pub auth_key: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub code: i64,
    #[serde(default)]
    pub session: Option<String>,
}

impl From<AuthResponse> for AuthReply {
    fn from(response: AuthResponse) -> Self {
        AuthReply {
            code: response.code,
            session: response.session,
        }
    }
}

/// Body of verify and release.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest<'a> {
    pub session_key: &'a str,
    pub qq: i64,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

impl From<StatusResponse> for StatusReply {
    fn from(response: StatusResponse) -> Self {
        StatusReply {
            code: response.code,
            msg: response.msg,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest<'a> {
    pub session_key: &'a str,
    pub target: i64,
    pub message_chain: &'a MessageChain,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub message_id: Option<i64>,
}

impl From<SendResponse> for DeliveryReceipt {
    fn from(response: SendResponse) -> Self {
        DeliveryReceipt {
            code: response.code,
            msg: response.msg,
            message_id: response.message_id,
        }
    }
}

/// Fetch result: older gateways return a bare array, newer ones wrap it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Messages(Vec<Message>),
    Envelope {
        code: i64,
        #[serde(default)]
        msg: String,
        #[serde(default)]
        data: Vec<Message>,
    },
}
