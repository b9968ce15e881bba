//! The extraction pipeline: fetch the stored message, parse it, persist
//! document-type attachments, and assemble the result.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{error, info};

use crate::doctypes;
use crate::error::{ExtractError, Result};
use crate::event::ReceiptEvent;
use crate::model::{Document, DocumentRecord, ExtractionResult, Message};
use crate::parser;
use crate::storage::ObjectStore;

/// Pipeline configuration. Storage location and path prefixes come from
/// the environment; see `Args` in the binary.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Reported as `FunctionName` in the result.
    pub function_name: String,
    /// Prefix under which the delivery trigger stores raw messages.
    pub incoming_prefix: String,
    /// Prefix under which extracted attachments are persisted.
    pub attachments_prefix: String,
}

/// Processes one received message per invocation.
pub struct Extractor {
    store: Arc<dyn ObjectStore>,
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(store: Arc<dyn ObjectStore>, config: ExtractorConfig) -> Self {
        Self { store, config }
    }

    /// Process the message referenced by the first record of a receipt
    /// event.
    pub async fn process_event(&self, event: &ReceiptEvent) -> Result<ExtractionResult> {
        let message_id = event
            .first_message_id()
            .ok_or_else(|| ExtractError::Event("event carries no records".into()))?;
        self.process_message(message_id).await
    }

    /// Run the full pipeline for one message id.
    ///
    /// The completion log line and the document count are finalized from
    /// whatever accumulated, on the success and the failure path alike.
    /// On failure the partial result is logged, not returned; the
    /// caller sees the typed error.
    pub async fn process_message(&self, message_id: &str) -> Result<ExtractionResult> {
        info!(message_id, "processing received message");

        let mut documents = Vec::new();
        let outcome = self.extract_documents(message_id, &mut documents).await;

        let result = ExtractionResult {
            message_id: message_id.to_string(),
            function_name: self.config.function_name.clone(),
            document_count: documents.len(),
            documents,
        };
        info!(
            message_id,
            document_count = result.document_count,
            "message processing done"
        );

        match outcome {
            Ok(()) => Ok(result),
            Err(err) => {
                error!(message_id, error = %err, "message processing failed");
                Err(err)
            }
        }
    }

    async fn extract_documents(
        &self,
        message_id: &str,
        documents: &mut Vec<DocumentRecord>,
    ) -> Result<()> {
        let eml_key = format!("{}/{}", self.config.incoming_prefix, message_id);
        let eml_file = self.store.object_url(&eml_key);
        info!(message_id, eml_file = %eml_file, "fetching stored message");

        let raw = self.store.get_object(&eml_key).await?;
        let parsed = parser::parse_message(&raw)?;

        let message = Message {
            message_id: message_id.to_string(),
            eml_file,
            to: parsed.to,
            from: parsed.from,
            subject: parsed.subject,
            received_at: parsed.date,
            sender: parsed.sender,
        };
        info!(
            message_id,
            from = %message.from,
            sender = %message.sender.address,
            parts = parsed.attachments.len(),
            "parsed message"
        );

        for (index, part) in parsed.attachments.iter().enumerate() {
            if !doctypes::is_document_type(&part.content_type) {
                info!(
                    message_id,
                    content_type = %part.content_type,
                    "skipping unsupported attachment"
                );
                continue;
            }

            let file_name = part
                .file_name
                .clone()
                .unwrap_or_else(|| format!("part-{index}"));
            // Same filename within one message overwrites at this key;
            // last write wins.
            let key = format!(
                "{}/{}/{}",
                self.config.attachments_prefix, message_id, file_name
            );
            let receipt = self
                .store
                .put_object(&key, Bytes::from(part.content.clone()), &part.content_type)
                .await?;

            let document = Document {
                document_id: Document::derive_id(&receipt.checksum),
                created_at: Utc::now(),
                file_name,
                content_type: part.content_type.clone(),
                size: part.content.len() as u64,
                location: self.store.object_url(&key),
            };
            info!(
                message_id,
                document_id = %document.document_id,
                file_name = %document.file_name,
                size = document.size,
                "extracted attachment"
            );
            documents.push(DocumentRecord {
                message: message.clone(),
                document,
            });
        }

        Ok(())
    }
}
