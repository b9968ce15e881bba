//! Inbound receipt event types, the trigger payload handed to the
//! extractor.

use serde::Deserialize;

/// The delivery trigger event: `{"Records": [{"mail": {"messageId": ...}}]}`.
///
/// Only the first record is honored; the upstream delivery system invokes
/// the extractor once per received message.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptEvent {
    #[serde(rename = "Records")]
    pub records: Vec<ReceiptRecord>,
}

/// One record of a receipt event.
#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptRecord {
    pub mail: MailRef,
}

/// Reference to a received message.
#[derive(Debug, Clone, Deserialize)]
pub struct MailRef {
    #[serde(rename = "messageId")]
    pub message_id: String,
}

impl ReceiptEvent {
    /// The message id of the first record, if any.
    pub fn first_message_id(&self) -> Option<&str> {
        self.records.first().map(|r| r.mail.message_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_single_record() {
        let json = r#"{"Records": [{"mail": {"messageId": "m-1"}}]}"#;
        let event: ReceiptEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.first_message_id(), Some("m-1"));
    }

    #[test]
    fn only_first_record_is_honored() {
        let json = r#"{
            "Records": [
                {"mail": {"messageId": "first"}},
                {"mail": {"messageId": "second"}}
            ]
        }"#;
        let event: ReceiptEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.first_message_id(), Some("first"));
    }

    #[test]
    fn empty_records_yields_none() {
        let json = r#"{"Records": []}"#;
        let event: ReceiptEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.first_message_id(), None);
    }

    #[test]
    fn extra_record_fields_are_ignored() {
        let json = r#"{"Records": [{"mail": {"messageId": "m-2", "source": "a@b.com"}, "receipt": {}}]}"#;
        let event: ReceiptEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.first_message_id(), Some("m-2"));
    }
}
