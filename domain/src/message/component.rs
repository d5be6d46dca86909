//! Message components and chains.
//!
//! A [`MessageChain`] is the ordered content of one message. Components the
//! client understands get their own variant; anything else is carried as
//! [`MessageComponent::Opaque`] and written back to the gateway untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Identifier of an earlier message that a reply can quote.
///
/// Only non-negative source ids are quotable; the gateway uses negative
/// values for messages it cannot reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(i64);

impl QuoteId {
    /// Returns `None` for negative ids.
    pub fn new(uid: i64) -> Option<Self> {
        (uid >= 0).then_some(Self(uid))
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single element of a message chain.
///
/// Serialized in the gateway's `{"type": "...", ...}` form. Unknown
/// component types round-trip through [`Opaque`](Self::Opaque).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum MessageComponent {
    /// Metadata identifying the message this chain belongs to.
    Source { uid: i64, time: Option<i64> },
    /// Plain text.
    Plain { text: String },
    /// Mention of a group member.
    At { target: i64, display: String },
    /// Built-in emoticon.
    Face { face_id: i64, name: Option<String> },
    /// Any component this client does not model.
    Opaque(Value),
}

impl MessageComponent {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain { text: text.into() }
    }

    pub fn source(uid: i64) -> Self {
        Self::Source { uid, time: None }
    }

    pub fn at(target: i64) -> Self {
        Self::At {
            target,
            display: String::new(),
        }
    }

    /// The gateway's type tag for this component.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Source { .. } => "Source",
            Self::Plain { .. } => "Plain",
            Self::At { .. } => "At",
            Self::Face { .. } => "Face",
            Self::Opaque(value) => value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("Unknown"),
        }
    }

    fn parse_known(value: &Value) -> Option<Self> {
        let int = |key: &str| value.get(key).and_then(Value::as_i64);
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

        match value.get("type").and_then(Value::as_str)? {
            "Source" => Some(Self::Source {
                // Newer gateway builds renamed `uid` to `id`.
                uid: int("uid").or_else(|| int("id"))?,
                time: int("time"),
            }),
            "Plain" => Some(Self::Plain {
                text: text("text")?,
            }),
            "At" => Some(Self::At {
                target: int("target")?,
                display: text("display").unwrap_or_default(),
            }),
            "Face" => Some(Self::Face {
                face_id: int("faceId")?,
                name: text("name"),
            }),
            _ => None,
        }
    }
}

impl From<Value> for MessageComponent {
    fn from(value: Value) -> Self {
        Self::parse_known(&value).unwrap_or(Self::Opaque(value))
    }
}

impl From<MessageComponent> for Value {
    fn from(component: MessageComponent) -> Self {
        match component {
            MessageComponent::Source { uid, time } => {
                let mut value = json!({ "type": "Source", "uid": uid });
                if let Some(time) = time {
                    value["time"] = json!(time);
                }
                value
            }
            MessageComponent::Plain { text } => json!({ "type": "Plain", "text": text }),
            MessageComponent::At { target, display } => {
                json!({ "type": "At", "target": target, "display": display })
            }
            MessageComponent::Face { face_id, name } => {
                let mut value = json!({ "type": "Face", "faceId": face_id });
                if let Some(name) = name {
                    value["name"] = json!(name);
                }
                value
            }
            MessageComponent::Opaque(value) => value,
        }
    }
}

/// Ordered sequence of components making up one message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageChain(Vec<MessageComponent>);

impl MessageChain {
    pub fn new(components: Vec<MessageComponent>) -> Self {
        Self(components)
    }

    /// A chain holding a single plain-text component.
    pub fn plain(text: impl Into<String>) -> Self {
        Self(vec![MessageComponent::plain(text)])
    }

    /// Append a component (builder style).
    pub fn with(mut self, component: MessageComponent) -> Self {
        self.0.push(component);
        self
    }

    pub fn push(&mut self, component: MessageComponent) {
        self.0.push(component);
    }

    pub fn components(&self) -> &[MessageComponent] {
        &self.0
    }

    pub fn first(&self) -> Option<&MessageComponent> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Quote id carried by this chain.
    ///
    /// Only the first component is considered, and only when it is a
    /// `Source` with a non-negative uid.
    pub fn quote_id(&self) -> Option<QuoteId> {
        match self.first()? {
            MessageComponent::Source { uid, .. } => QuoteId::new(*uid),
            _ => None,
        }
    }

    /// Concatenated text of all `Plain` components.
    pub fn plain_text(&self) -> String {
        self.0
            .iter()
            .filter_map(|c| match c {
                MessageComponent::Plain { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl From<Vec<MessageComponent>> for MessageChain {
    fn from(components: Vec<MessageComponent>) -> Self {
        Self(components)
    }
}

impl<'a> IntoIterator for &'a MessageChain {
    type Item = &'a MessageComponent;
    type IntoIter = std::slice::Iter<'a, MessageComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
