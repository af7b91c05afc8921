//! Feed fetcher with security measures.
//!
//! Fetches and parses RSS/Atom feeds with SSRF protection, size limits
//! and timeouts.

use crate::error::{BhubError, Result};
use crate::feed::types::{ParsedEntry, ParsedFeed, MAX_ABSTRACT_LENGTH, MAX_FEED_SIZE};
use feed_rs::parser;
use reqwest::Client;
use std::net::IpAddr;
use std::time::Duration;

/// Connect timeout in seconds.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Total timeout in seconds.
const TOTAL_TIMEOUT_SECS: u64 = 30;

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

/// User agent string for feed fetching.
const USER_AGENT: &str = "bhub/0.1 (+feed aggregator)";

/// Feed fetcher holding a reusable HTTP client.
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new fetcher with default settings.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(TOTAL_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BhubError::Feed(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch and parse a feed from the given URL.
    ///
    /// Performs SSRF validation and enforces the size limit. Timeouts are
    /// reported as `BhubError::FeedTimeout` so the API layer can map them
    /// to 408.
    pub async fn fetch(&self, url: &str) -> Result<ParsedFeed> {
        validate_url(url)?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                BhubError::FeedTimeout(url.to_string())
            } else {
                BhubError::Feed(format!("failed to fetch feed: {e}"))
            }
        })?;

        if !response.status().is_success() {
            return Err(BhubError::Feed(format!("HTTP error: {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_FEED_SIZE {
                return Err(BhubError::Feed(format!(
                    "feed too large: {content_length} bytes (max {MAX_FEED_SIZE} bytes)"
                )));
            }
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                BhubError::FeedTimeout(url.to_string())
            } else {
                BhubError::Feed(format!("failed to read response: {e}"))
            }
        })?;

        if bytes.len() as u64 > MAX_FEED_SIZE {
            return Err(BhubError::Feed(format!(
                "feed too large: {} bytes (max {MAX_FEED_SIZE} bytes)",
                bytes.len()
            )));
        }

        parse_feed(&bytes)
    }
}

/// Validate a URL for SSRF protection.
///
/// Accepts only http/https URLs whose host is neither a private/reserved
/// address nor a reserved internal hostname.
pub fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).map_err(|e| BhubError::Feed(format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(BhubError::Feed(format!("unsupported URL scheme: {scheme}")));
        }
    }

    let host = parsed
        .host()
        .ok_or_else(|| BhubError::Feed("URL has no host".to_string()))?;

    match host {
        url::Host::Domain(domain) => {
            if is_forbidden_hostname(domain) {
                return Err(BhubError::Feed(format!("forbidden host: {domain}")));
            }
        }
        url::Host::Ipv4(ipv4) => {
            if is_private_ip(&IpAddr::V4(ipv4)) {
                return Err(BhubError::Feed(format!(
                    "private IP address not allowed: {ipv4}"
                )));
            }
        }
        url::Host::Ipv6(ipv6) => {
            if is_private_ip(&IpAddr::V6(ipv6)) {
                return Err(BhubError::Feed(format!(
                    "private IP address not allowed: {ipv6}"
                )));
            }
        }
    }

    Ok(())
}

/// Check if a hostname is reserved for internal use.
fn is_forbidden_hostname(host: &str) -> bool {
    let host = host.to_lowercase();

    if host == "localhost" {
        return true;
    }

    [".local", ".localhost", ".internal", ".intranet", ".corp", ".home", ".lan"]
        .iter()
        .any(|suffix| host.ends_with(suffix))
}

/// Check if an IP address is private/reserved.
fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                // Documentation ranges: 192.0.2.0/24, 198.51.100.0/24, 203.0.113.0/24
                || (octets[0] == 192 && octets[1] == 0 && octets[2] == 2)
                || (octets[0] == 198 && octets[1] == 51 && octets[2] == 100)
                || (octets[0] == 203 && octets[1] == 0 && octets[2] == 113)
        }
        IpAddr::V6(v6) => {
            let segments = v6.segments();
            v6.is_loopback()
                || v6.is_unspecified()
                // Unique local: fc00::/7
                || (segments[0] & 0xfe00) == 0xfc00
                // Link-local: fe80::/10
                || (segments[0] & 0xffc0) == 0xfe80
        }
    }
}

/// Parse feed bytes into a ParsedFeed.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed> {
    let feed =
        parser::parse(bytes).map_err(|e| BhubError::Feed(format!("failed to parse feed: {e}")))?;

    let title = feed
        .title
        .map(|t| t.content)
        .unwrap_or_else(|| "Untitled Feed".to_string());
    let description = feed.description.map(|d| strip_html(&d.content));
    let site_url = feed.links.first().map(|l| l.href.clone());

    let entries: Vec<ParsedEntry> = feed
        .entries
        .into_iter()
        .map(|entry| {
            let guid = entry.id;
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let link = entry.links.first().map(|l| l.href.clone());
            let summary = entry
                .summary
                .map(|t| t.content)
                .or(entry.content.and_then(|c| c.body))
                .map(|d| truncate_abstract(&strip_html(&d)));
            let authors = entry
                .authors
                .into_iter()
                .map(|a| a.name)
                .filter(|name| !name.trim().is_empty())
                .collect();
            let published_at = entry.published.or(entry.updated);

            ParsedEntry {
                guid,
                title,
                link,
                summary,
                authors,
                published_at,
            }
        })
        .collect();

    Ok(ParsedFeed {
        title,
        description,
        site_url,
        entries,
    })
}

/// Strip HTML tags and decode common entities.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }

    let decoded = decode_entities(&text);

    // Collapse whitespace runs left behind by removed markup
    decoded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Decode common HTML entities in plain text.
fn decode_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        while let Some(&next) = chars.peek() {
            if next == ';' {
                chars.next();
                terminated = true;
                break;
            }
            if next == '&' || entity.len() > 10 {
                break;
            }
            entity.push(next);
            chars.next();
        }

        if !terminated {
            result.push('&');
            result.push_str(&entity);
            continue;
        }

        match entity.as_str() {
            "amp" => result.push('&'),
            "lt" => result.push('<'),
            "gt" => result.push('>'),
            "quot" => result.push('"'),
            "apos" => result.push('\''),
            "nbsp" => result.push(' '),
            _ => match parse_numeric_entity(&entity).and_then(char::from_u32) {
                Some(c) => result.push(c),
                None => {
                    // Unknown entity, keep as-is
                    result.push('&');
                    result.push_str(&entity);
                    result.push(';');
                }
            },
        }
    }

    result
}

/// Parse a numeric HTML entity (e.g., "#123" or "#x7B").
fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse().ok()
    } else {
        None
    }
}

/// Truncate an abstract to the maximum stored length.
fn truncate_abstract(text: &str) -> String {
    if text.len() <= MAX_ABSTRACT_LENGTH {
        text.to_string()
    } else {
        text.chars().take(MAX_ABSTRACT_LENGTH).collect()
    }
}
