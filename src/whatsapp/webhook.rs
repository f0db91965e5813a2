//! Green API webhook payloads and inbound message extraction.

use serde::Deserialize;

/// Subset of the Green API notification body the gateway cares about.
/// Every field is optional so malformed payloads degrade to filtered
/// statuses instead of deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub type_webhook: Option<String>,
    #[serde(default)]
    pub sender_data: Option<SenderData>,
    #[serde(default)]
    pub message_data: Option<MessageData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderData {
    #[serde(default)]
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    #[serde(default)]
    pub text_message_data: Option<TextMessageData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessageData {
    #[serde(default)]
    pub text_message: Option<String>,
}

/// A processable inbound message: who sent it and what they wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingMessage {
    pub contact_id: String,
    pub text: String,
}

/// Filter a notification down to a processable message. `Err` carries the
/// status label reported back to the gateway for skipped notifications.
pub fn extract_incoming(notification: &Notification) -> Result<IncomingMessage, &'static str> {
    if notification.type_webhook.as_deref() != Some("incomingMessageReceived") {
        return Err("ignored");
    }

    let text = notification
        .message_data
        .as_ref()
        .and_then(|m| m.text_message_data.as_ref())
        .and_then(|t| t.text_message.as_deref())
        .unwrap_or_default();
    if text.is_empty() {
        return Err("no_text");
    }

    let chat_id = notification
        .sender_data
        .as_ref()
        .and_then(|s| s.chat_id.as_deref())
        .unwrap_or_default();
    let contact_id = chat_id.replace("@c.us", "");
    if contact_id.is_empty() {
        return Err("no_sender");
    }
    if chat_id.contains("@g.us") {
        return Err("group_ignored");
    }

    Ok(IncomingMessage {
        contact_id,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: serde_json::Value) -> Notification {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn extracts_contact_and_text_from_a_real_payload() {
        let notification = parse(json!({
            "typeWebhook": "incomingMessageReceived",
            "instanceData": {"idInstance": 1101234567u64, "typeInstance": "whatsapp"},
            "timestamp": 1588091580,
            "idMessage": "F7AEC1B7086ECDC7",
            "senderData": {
                "chatId": "5493412345678@c.us",
                "sender": "5493412345678@c.us",
                "senderName": "Ana"
            },
            "messageData": {
                "typeMessage": "textMessage",
                "textMessageData": {"textMessage": "busco depto en alquiler"}
            }
        }));

        let message = extract_incoming(&notification).unwrap();
        assert_eq!(message.contact_id, "5493412345678");
        assert_eq!(message.text, "busco depto en alquiler");
    }

    #[test]
    fn non_message_webhooks_are_ignored() {
        let outgoing = parse(json!({"typeWebhook": "outgoingAPIMessageReceived"}));
        assert_eq!(extract_incoming(&outgoing), Err("ignored"));

        let empty = parse(json!({}));
        assert_eq!(extract_incoming(&empty), Err("ignored"));
    }

    #[test]
    fn notifications_without_text_are_skipped() {
        let no_message_data = parse(json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": {"chatId": "5493412345678@c.us"}
        }));
        assert_eq!(extract_incoming(&no_message_data), Err("no_text"));

        let empty_text = parse(json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": {"chatId": "5493412345678@c.us"},
            "messageData": {"textMessageData": {"textMessage": ""}}
        }));
        assert_eq!(extract_incoming(&empty_text), Err("no_text"));
    }

    #[test]
    fn notifications_without_a_sender_are_skipped() {
        let notification = parse(json!({
            "typeWebhook": "incomingMessageReceived",
            "messageData": {"textMessageData": {"textMessage": "hola"}}
        }));
        assert_eq!(extract_incoming(&notification), Err("no_sender"));
    }

    #[test]
    fn group_chats_are_filtered() {
        let notification = parse(json!({
            "typeWebhook": "incomingMessageReceived",
            "senderData": {"chatId": "120363041234567890@g.us"},
            "messageData": {"textMessageData": {"textMessage": "hola grupo"}}
        }));
        assert_eq!(extract_incoming(&notification), Err("group_ignored"));
    }
}
