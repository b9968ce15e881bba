//! The content-type allow-list for attachment extraction.

/// MIME types eligible for extraction: PDF, legacy and OOXML Office
/// formats, RTF, plain text, CSV.
pub const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.ms-excel",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/rtf",
    "text/plain",
    "text/csv",
    "text/rtf",
];

/// Whether a declared content type is in the allow-list.
pub fn is_document_type(content_type: &str) -> bool {
    let normalized = content_type.trim().to_ascii_lowercase();
    DOCUMENT_TYPES.contains(&normalized.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_listed_type() {
        for ct in DOCUMENT_TYPES {
            assert!(is_document_type(ct), "{ct} should be accepted");
        }
    }

    #[test]
    fn rejects_images_and_archives() {
        assert!(!is_document_type("image/png"));
        assert!(!is_document_type("image/jpeg"));
        assert!(!is_document_type("application/zip"));
        assert!(!is_document_type("application/octet-stream"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert!(is_document_type("Application/PDF"));
        assert!(is_document_type("TEXT/CSV"));
    }

    #[test]
    fn rejects_empty_and_partial_types() {
        assert!(!is_document_type(""));
        assert!(!is_document_type("application"));
        assert!(!is_document_type("application/pdf; charset=binary"));
    }
}
