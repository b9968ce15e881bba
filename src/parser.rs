//! Raw MIME message parsing.

use chrono::{DateTime, Utc};
use mailparse::{
    addrparse, dateparse, parse_mail, DispositionType, MailAddr, MailHeaderMap, ParsedMail,
};

use crate::error::{ExtractError, Result};
use crate::model::Sender;

/// A parsed inbound message: envelope fields plus the ordered attachment
/// parts found in the body.
#[derive(Debug)]
pub struct ParsedEmail {
    pub to: String,
    pub from: String,
    pub subject: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub sender: Sender,
    pub attachments: Vec<AttachmentPart>,
}

/// One attachment part with its decoded payload.
#[derive(Debug)]
pub struct AttachmentPart {
    /// Declared filename; parts without one get a generated name at
    /// extraction time.
    pub file_name: Option<String>,
    /// Declared MIME type, lowercased.
    pub content_type: String,
    /// Decoded binary content.
    pub content: Vec<u8>,
}

/// Parse raw message bytes into envelope fields and attachment parts.
///
/// `To` and `From` headers and a parseable From address are required;
/// `Subject` and `Date` are optional. A message with no attachments
/// parses to an empty attachment list.
pub fn parse_message(raw: &[u8]) -> Result<ParsedEmail> {
    let mail = parse_mail(raw).map_err(|e| ExtractError::Parse(e.to_string()))?;

    let to = header_first(&mail, "To")
        .ok_or_else(|| ExtractError::Parse("missing To header".into()))?;
    let from = header_first(&mail, "From")
        .ok_or_else(|| ExtractError::Parse("missing From header".into()))?;
    let subject = header_first(&mail, "Subject");
    let date = header_first(&mail, "Date")
        .and_then(|v| dateparse(&v).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    let sender = parse_sender(&from)?;

    let mut attachments = Vec::new();
    collect_attachments(&mail, &mut attachments)?;

    Ok(ParsedEmail {
        to,
        from,
        subject,
        date,
        sender,
        attachments,
    })
}

fn header_first(mail: &ParsedMail, name: &str) -> Option<String> {
    mail.headers
        .get_first_value(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First structured address from the From header, address lowercased.
fn parse_sender(from_header: &str) -> Result<Sender> {
    let addrs = addrparse(from_header)
        .map_err(|e| ExtractError::Parse(format!("invalid From address: {e}")))?;
    let (name, address) = addrs
        .iter()
        .find_map(|addr| match addr {
            MailAddr::Single(s) => Some((s.display_name.clone(), s.addr.clone())),
            MailAddr::Group(g) => g
                .addrs
                .first()
                .map(|s| (s.display_name.clone(), s.addr.clone())),
        })
        .ok_or_else(|| ExtractError::Parse("From header has no address".into()))?;
    Ok(Sender {
        name: name.unwrap_or_default(),
        address: address.to_lowercase(),
    })
}

/// Walk the MIME tree collecting attachment parts in document order.
///
/// A part counts as an attachment when its disposition is `attachment`,
/// or when it is a leaf that declares a filename. Body parts (inline
/// text/html without a filename) are never collected.
fn collect_attachments(part: &ParsedMail, out: &mut Vec<AttachmentPart>) -> Result<()> {
    let disposition = part.get_content_disposition();
    if matches!(disposition.disposition, DispositionType::Attachment) {
        out.push(to_attachment(part, part_file_name(part))?);
        return Ok(());
    }
    if part.subparts.is_empty() {
        if let Some(name) = part_file_name(part) {
            out.push(to_attachment(part, Some(name))?);
        }
        return Ok(());
    }
    for sub in &part.subparts {
        collect_attachments(sub, out)?;
    }
    Ok(())
}

fn part_file_name(part: &ParsedMail) -> Option<String> {
    let disposition = part.get_content_disposition();
    disposition
        .params
        .get("filename")
        .cloned()
        .or_else(|| part.ctype.params.get("name").cloned())
        .filter(|n| !n.is_empty())
}

fn to_attachment(part: &ParsedMail, file_name: Option<String>) -> Result<AttachmentPart> {
    let content = part
        .get_body_raw()
        .map_err(|e| ExtractError::Parse(format!("undecodable attachment body: {e}")))?;
    Ok(AttachmentPart {
        file_name,
        content_type: part.ctype.mimetype.to_ascii_lowercase(),
        content,
    })
}
