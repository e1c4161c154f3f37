//! Link extraction from email messages
//!
//! Reads an RFC 822 message, concatenates the HTML body parts that are not
//! attachments, and returns every anchor target whose URL path ends in `.csv`.
//! Failures never escape [`LinkExtractor::extract`]: they are written to the
//! download log and reported as "no links".

use crate::activity_log::ActivityLog;
use crate::error::{Error, Result};
use crate::types::Link;
use crate::utils::has_csv_suffix;
use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Matches `<a ... href="target" ...>` with single or double quotes
const ANCHOR_PATTERN: &str = r#"<a[^>]+href=["']([^"']+)["'][^>]*>"#;

/// Pulls CSV links out of a message file
pub struct LinkExtractor<'a> {
    anchor: Regex,
    log: &'a ActivityLog,
}

impl<'a> LinkExtractor<'a> {
    /// Create an extractor that reports problems to `log`
    pub fn new(log: &'a ActivityLog) -> Result<Self> {
        let anchor = RegexBuilder::new(ANCHOR_PATTERN)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config {
                message: format!("invalid anchor pattern: {e}"),
                key: None,
            })?;
        Ok(Self { anchor, log })
    }

    /// Extract CSV links from the message at `path`
    ///
    /// A missing or unparseable message is logged and yields an empty list.
    pub fn extract(&self, path: &Path) -> Vec<Link> {
        match self.try_extract(path) {
            Ok(links) => {
                tracing::debug!(path = %path.display(), count = links.len(), "extracted links");
                links
            }
            Err(Error::InputNotFound(missing)) => {
                self.log
                    .error(format!("EMAIL NOT FOUND: {}", missing.display()));
                Vec::new()
            }
            Err(Error::Parse(reason)) => {
                self.log.error(format!("FAILED TO PARSE EMAIL: {reason}"));
                Vec::new()
            }
            Err(e) => {
                self.log.error(format!("FAILED TO PARSE EMAIL: {e}"));
                Vec::new()
            }
        }
    }

    /// Like [`extract`](Self::extract), but returns the failure instead of logging it
    pub fn try_extract(&self, path: &Path) -> Result<Vec<Link>> {
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read(path).map_err(|e| Error::Parse(e.to_string()))?;
        self.links_in_message(&raw)
    }

    /// Extract CSV links from raw message bytes
    pub fn links_in_message(&self, raw: &[u8]) -> Result<Vec<Link>> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Parse("message is empty".into()));
        }
        let message = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| Error::Parse("not a readable email message".into()))?;

        let mut body = String::new();
        collect_inline_html(&message, &mut body);

        // Single-part messages: use the top-level payload whatever its type
        if body.is_empty()
            && let Some(root) = message.parts.first()
            && !matches!(root.body, PartType::Multipart(_))
        {
            body = part_text(root);
        }

        Ok(self.links_in_html(&body))
    }

    /// Extract CSV links from an HTML fragment, in order of appearance
    pub fn links_in_html(&self, body: &str) -> Vec<Link> {
        self.anchor
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().replace("&amp;", "&"))
            .filter(|href| points_at_csv(href))
            .map(Link::from)
            .collect()
    }
}

/// Append every inline HTML part, descending into embedded `message/rfc822` parts
fn collect_inline_html(message: &Message<'_>, body: &mut String) {
    for part in &message.parts {
        match &part.body {
            PartType::Message(inner) => collect_inline_html(inner, body),
            _ if is_inline_html(part) => body.push_str(&part_text(part)),
            _ => {}
        }
    }
}

/// An HTML body part that is not an attachment
fn is_inline_html(part: &MessagePart<'_>) -> bool {
    if part
        .content_disposition()
        .is_some_and(|disposition| disposition.ctype().eq_ignore_ascii_case("attachment"))
    {
        return false;
    }
    part.content_type().is_some_and(|ct| {
        ct.ctype().eq_ignore_ascii_case("text")
            && ct.subtype().is_some_and(|s| s.eq_ignore_ascii_case("html"))
    })
}

/// Decoded text of a part, lossy for binary payloads
fn part_text(part: &MessagePart<'_>) -> String {
    match &part.body {
        PartType::Html(text) | PartType::Text(text) => text.to_string(),
        PartType::Multipart(_) => String::new(),
        _ => String::from_utf8_lossy(part.contents()).into_owned(),
    }
}

/// Whether the URL path (or the raw target, for non-URLs) ends in `.csv`
fn points_at_csv(href: &str) -> bool {
    match url::Url::parse(href) {
        Ok(url) => has_csv_suffix(url.path()),
        Err(_) => has_csv_suffix(href),
    }
}
