//! Message, document, and result types for the public output contract.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Structured sender, extracted from the first parsed From address.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Sender {
    /// Display name (may be empty).
    pub name: String,
    /// Bare email address, lowercased for stable comparison and keying.
    pub address: String,
}

/// One received email message.
///
/// `message_id` is immutable once assigned and is the join key between
/// the raw stored message and every document derived from it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Message {
    pub message_id: String,
    /// URL of the raw stored message object.
    pub eml_file: String,
    /// Decoded `To:` header display text.
    pub to: String,
    /// Decoded `From:` header display text.
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Parsed from the `Date:` header; absent if the header is missing
    /// or unparseable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    pub sender: Sender,
}

/// One extracted attachment, persisted as its own object.
///
/// Immutable after creation; deletion is delegated to the storage
/// layer's retention rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    /// Content-derived identity: identical bytes yield the same id,
    /// independent of filename or message.
    pub document_id: Uuid,
    /// Wall clock at extraction time, not message time.
    pub created_at: DateTime<Utc>,
    pub file_name: String,
    pub content_type: String,
    /// Decoded size in bytes.
    pub size: u64,
    /// URL of the persisted attachment object.
    pub location: String,
}

impl Document {
    /// Derive the deterministic document id from a storage content
    /// checksum: UUIDv5 over the checksum string, DNS namespace.
    pub fn derive_id(checksum: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_DNS, checksum.as_bytes())
    }
}

/// A message joined with one of its documents, one entry per extracted
/// attachment in the result.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    #[serde(flatten)]
    pub message: Message,
    #[serde(flatten)]
    pub document: Document,
}

/// Aggregate pipeline output returned to the invoker.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExtractionResult {
    pub message_id: String,
    pub function_name: String,
    pub document_count: usize,
    pub documents: Vec<DocumentRecord>,
}
