//! Inbound message entities

use crate::message::component::{MessageChain, QuoteId};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Display-only text field; a missing or `null` value reads as empty.
fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sender of a friend (private) message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    #[serde(rename = "nickName", default, deserialize_with = "nullable")]
    pub nickname: String,
    #[serde(default, deserialize_with = "nullable")]
    pub remark: String,
}

/// A chat group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub permission: String,
}

/// Sender of a group message: a member plus the group it spoke in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: i64,
    #[serde(default, deserialize_with = "nullable")]
    pub member_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub permission: String,
    pub group: Group,
}

/// Kind tag of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Friend,
    Group,
    /// Any event kind other than friend or group messages.
    Other,
}

impl MessageKind {
    /// Tag used by the gateway for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Friend => "FriendMessage",
            MessageKind::Group => "GroupMessage",
            MessageKind::Other => "Other",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inbound event delivered by the gateway.
///
/// Friend and group messages are modelled explicitly; every other event type
/// is kept as [`Message::Other`] together with its raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Message {
    Friend {
        sender: Friend,
        chain: MessageChain,
    },
    Group {
        sender: GroupMember,
        chain: MessageChain,
    },
    Other {
        kind: String,
        chain: MessageChain,
        raw: Value,
    },
}

/// Wire shape of the two message kinds this client understands.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownMessage {
    FriendMessage {
        sender: Friend,
        #[serde(rename = "messageChain", default)]
        chain: MessageChain,
    },
    GroupMessage {
        sender: GroupMember,
        #[serde(rename = "messageChain", default)]
        chain: MessageChain,
    },
}

impl Message {
    /// Friend message from `sender_id`.
    pub fn friend(sender_id: i64, chain: MessageChain) -> Self {
        Self::Friend {
            sender: Friend {
                id: sender_id,
                ..Friend::default()
            },
            chain,
        }
    }

    /// Group message from `sender_id` in `group_id`.
    pub fn group(group_id: i64, sender_id: i64, chain: MessageChain) -> Self {
        Self::Group {
            sender: GroupMember {
                id: sender_id,
                group: Group {
                    id: group_id,
                    ..Group::default()
                },
                ..GroupMember::default()
            },
            chain,
        }
    }

    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Friend { .. } => MessageKind::Friend,
            Self::Group { .. } => MessageKind::Group,
            Self::Other { .. } => MessageKind::Other,
        }
    }

    /// The gateway's type tag, including unrecognised ones.
    pub fn kind_name(&self) -> &str {
        match self {
            Self::Other { kind, .. } => kind.as_str(),
            other => other.kind().as_str(),
        }
    }

    pub fn chain(&self) -> &MessageChain {
        match self {
            Self::Friend { chain, .. } | Self::Group { chain, .. } | Self::Other { chain, .. } => {
                chain
            }
        }
    }

    /// Id of the account that sent the message, when known.
    pub fn sender_id(&self) -> Option<i64> {
        match self {
            Self::Friend { sender, .. } => Some(sender.id),
            Self::Group { sender, .. } => Some(sender.id),
            Self::Other { raw, .. } => raw
                .get("sender")
                .and_then(|s| s.get("id"))
                .and_then(Value::as_i64),
        }
    }

    /// Quote id of this message, see [`MessageChain::quote_id`].
    pub fn quote_id(&self) -> Option<QuoteId> {
        self.chain().quote_id()
    }
}

impl From<Value> for Message {
    fn from(raw: Value) -> Self {
        match KnownMessage::deserialize(&raw) {
            Ok(KnownMessage::FriendMessage { sender, chain }) => Self::Friend { sender, chain },
            Ok(KnownMessage::GroupMessage { sender, chain }) => Self::Group { sender, chain },
            Err(_) => {
                let kind = raw
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or("Unknown")
                    .to_string();
                let chain = raw
                    .get("messageChain")
                    .cloned()
                    .and_then(|v| serde_json::from_value(v).ok())
                    .unwrap_or_default();
                Self::Other { kind, chain, raw }
            }
        }
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        match message {
            Message::Friend { sender, chain } => serde_json::json!({
                "type": "FriendMessage",
                "sender": sender,
                "messageChain": chain,
            }),
            Message::Group { sender, chain } => serde_json::json!({
                "type": "GroupMessage",
                "sender": sender,
                "messageChain": chain,
            }),
            Message::Other { raw, .. } => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::component::MessageComponent;
    use serde_json::json;

    #[test]
    fn test_null_sender_names_still_parse() {
        let message: Message = serde_json::from_value(json!({
            "type": "GroupMessage",
            "messageChain": [{ "type": "Plain", "text": "hi" }],
            "sender": {
                "id": 2,
                "memberName": null,
                "permission": null,
                "group": { "id": 100, "name": null, "permission": "MEMBER" }
            }
        }))
        .unwrap();

        assert_eq!(message.kind(), MessageKind::Group);
        match &message {
            Message::Group { sender, .. } => {
                assert_eq!(sender.member_name, "");
                assert_eq!(sender.group.name, "");
                assert_eq!(sender.group.permission, "MEMBER");
            }
            other => panic!("expected group message, got {:?}", other),
        }

        let friend: Message = serde_json::from_value(json!({
            "type": "FriendMessage",
            "messageChain": [],
            "sender": { "id": 1, "nickName": null, "remark": null }
        }))
        .unwrap();
        assert_eq!(friend.kind(), MessageKind::Friend);
    }

    #[test]
    fn test_parse_group_message() {
        let message: Message = serde_json::from_value(json!({
            "type": "GroupMessage",
            "messageChain": [
                { "type": "Source", "uid": 7 },
                { "type": "Plain", "text": "ping" }
            ],
            "sender": {
                "id": 2001,
                "memberName": "alice",
                "permission": "MEMBER",
                "group": { "id": 100, "name": "rustaceans", "permission": "MEMBER" }
            }
        }))
        .unwrap();

        assert_eq!(message.kind(), MessageKind::Group);
        assert_eq!(message.sender_id(), Some(2001));
        assert_eq!(message.quote_id(), QuoteId::new(7));
        match &message {
            Message::Group { sender, .. } => {
                assert_eq!(sender.group.id, 100);
                assert_eq!(sender.member_name, "alice");
            }
            other => panic!("expected group message, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_friend_message_minimal_sender() {
        let message: Message = serde_json::from_value(json!({
            "type": "FriendMessage",
            "messageChain": [{ "type": "Plain", "text": "hi" }],
            "sender": { "id": 3003 }
        }))
        .unwrap();

        assert_eq!(message.kind(), MessageKind::Friend);
        assert_eq!(message.chain().plain_text(), "hi");
        assert!(message.quote_id().is_none());
    }

    #[test]
    fn test_unknown_kind_becomes_other() {
        let raw = json!({
            "type": "TempMessage",
            "messageChain": [{ "type": "Plain", "text": "psst" }],
            "sender": { "id": 9 }
        });
        let message: Message = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(message.kind(), MessageKind::Other);
        assert_eq!(message.kind_name(), "TempMessage");
        assert_eq!(message.sender_id(), Some(9));
        assert_eq!(message.chain().components(), &[MessageComponent::plain("psst")]);
        // Raw payload is written back unchanged
        assert_eq!(serde_json::to_value(&message).unwrap(), raw);
    }

    #[test]
    fn test_group_message_without_group_is_other() {
        let message: Message = serde_json::from_value(json!({
            "type": "GroupMessage",
            "messageChain": [],
            "sender": { "id": 1 }
        }))
        .unwrap();
        assert_eq!(message.kind(), MessageKind::Other);
        assert_eq!(message.kind_name(), "GroupMessage");
    }

    #[test]
    fn test_constructors() {
        let friend = Message::friend(5, MessageChain::plain("a"));
        assert_eq!(friend.kind_name(), "FriendMessage");
        assert_eq!(friend.sender_id(), Some(5));

        let group = Message::group(100, 6, MessageChain::default());
        match group {
            Message::Group { sender, .. } => {
                assert_eq!(sender.group.id, 100);
                assert_eq!(sender.id, 6);
            }
            other => panic!("expected group message, got {:?}", other),
        }
    }
}
