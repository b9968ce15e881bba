//! Inbound mail ingestion and attachment extraction.
//!
//! Fetches a raw stored message by id, parses it, persists attachments
//! of recognized document types as separate objects, and produces a
//! structured result for downstream consumers.

pub mod doctypes;
pub mod error;
pub mod event;
pub mod extractor;
pub mod model;
pub mod parser;
pub mod storage;

pub use error::{ExtractError, Result};
pub use event::ReceiptEvent;
pub use extractor::{Extractor, ExtractorConfig};
pub use model::ExtractionResult;
