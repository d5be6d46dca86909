//! Console formatter for inbound messages and session events

use chrono::{DateTime, Local};
use colored::Colorize;
use mirai_domain::{Message, MessageChain, MessageComponent, Signal};

/// Formats gateway traffic for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per inbound message, stamped with the local receive time
    pub fn format_message(message: &Message) -> String {
        Self::format_message_at(message, Local::now())
    }

    pub fn format_message_at(message: &Message, at: DateTime<Local>) -> String {
        let time = at.format("%H:%M:%S").to_string().dimmed();
        let body = Self::render_chain(message.chain());

        match message {
            Message::Friend { sender, .. } => format!(
                "{} {} {} {}",
                time,
                "[friend]".green().bold(),
                Self::name_with_id(&sender.nickname, sender.id).yellow(),
                body
            ),
            Message::Group { sender, .. } => format!(
                "{} {} {} {} {}",
                time,
                "[group]".cyan().bold(),
                Self::name_with_id(&sender.group.name, sender.group.id).cyan(),
                Self::name_with_id(&sender.member_name, sender.id).yellow(),
                body
            ),
            Message::Other { kind, .. } => {
                format!("{} {} {}", time, format!("[{}]", kind).dimmed(), body)
            }
        }
    }

    /// Lifecycle signal notice
    pub fn format_signal(signal: Signal) -> String {
        let label = match signal {
            Signal::Authed => "authenticated".green(),
            Signal::Verified => "verified".green(),
            Signal::Released => "released".yellow(),
        };
        format!("{} session {}", "●".bold(), label.bold())
    }

    /// Render a chain as readable text; quoting metadata is omitted
    pub fn render_chain(chain: &MessageChain) -> String {
        chain
            .components()
            .iter()
            .filter_map(|component| match component {
                MessageComponent::Source { .. } => None,
                MessageComponent::Plain { text } => Some(text.clone()),
                MessageComponent::At { target, display } if display.is_empty() => {
                    Some(format!("@{}", target))
                }
                MessageComponent::At { display, .. } => Some(display.clone()),
                MessageComponent::Face { name: Some(name), .. } => Some(format!("[{}]", name)),
                MessageComponent::Face { face_id, .. } => Some(format!("[face:{}]", face_id)),
                other => Some(format!("[{}]", other.type_name())),
            })
            .collect()
    }

    fn name_with_id(name: &str, id: i64) -> String {
        if name.is_empty() {
            id.to_string()
        } else {
            format!("{}({})", name, id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn no_color() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_render_chain_skips_source() {
        let chain = MessageChain::default()
            .with(MessageComponent::source(7))
            .with(MessageComponent::plain("hello "))
            .with(MessageComponent::at(42));
        assert_eq!(ConsoleFormatter::render_chain(&chain), "hello @42");
    }

    #[test]
    fn test_render_chain_opaque_component() {
        let chain: MessageChain = serde_json::from_value(json!([
            {"type": "Image", "imageId": "{ABC}.png"},
            {"type": "Face", "faceId": 14, "name": "smile"},
            {"type": "Face", "faceId": 15}
        ]))
        .unwrap();
        assert_eq!(
            ConsoleFormatter::render_chain(&chain),
            "[Image][smile][face:15]"
        );
    }

    #[test]
    fn test_format_group_message() {
        no_color();
        let message = Message::from(json!({
            "type": "GroupMessage",
            "sender": {
                "id": 2,
                "memberName": "alice",
                "permission": "MEMBER",
                "group": {"id": 100, "name": "rustaceans", "permission": "MEMBER"}
            },
            "messageChain": [{"type": "Plain", "text": "hi"}]
        }));

        let line = ConsoleFormatter::format_message(&message);
        assert!(line.contains("[group]"));
        assert!(line.contains("rustaceans(100)"));
        assert!(line.contains("alice(2)"));
        assert!(line.ends_with("hi"));
    }

    #[test]
    fn test_format_friend_message_without_nickname() {
        no_color();
        let message = Message::friend(5, MessageChain::plain("yo"));
        let line = ConsoleFormatter::format_message(&message);
        assert!(line.contains("[friend] 5 yo"));
    }

    #[test]
    fn test_format_signal() {
        no_color();
        assert_eq!(
            ConsoleFormatter::format_signal(Signal::Released),
            "● session released"
        );
    }
}
