//! Calendar feed parser.
//!
//! Turns raw iCal feed text into structured booking events: dates, free-text
//! description, the reservation URL embedded by the platform, the external
//! booking id extracted from that URL, and the blackout flag for
//! host-initiated unavailability entries.
//!
//! Entries missing their date properties are skipped and counted; an entry
//! whose external id cannot be extracted aborts the whole feed, because a
//! reservation without a traceable id cannot be reconciled.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::MANUAL_BLOCK_ID_PREFIX;
use crate::errors::{Result, StaySyncError};

lazy_static! {
    /// Matches the reservation link the platform embeds in DESCRIPTION.
    static ref RESERVATION_URL_RE: Regex =
        Regex::new(r"Reservation URL:\s*(https?://\S+)").unwrap();

    /// Matches the phone fragment line in DESCRIPTION.
    static ref PHONE_RE: Regex =
        Regex::new(r"Phone Number \(Last 4 Digits\):\s*(\d+)").unwrap();

    /// Extracts the booking id from the reservation URL path.
    static ref DETAILS_ID_RE: Regex = Regex::new(r"/details/([A-Za-z0-9]+)").unwrap();
}

/// One structured calendar entry. Exists only within a parse pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    pub dtstamp: Option<DateTime<Utc>>,
    pub reservation_url: Option<String>,
    pub phone_last_digits: Option<String>,
    pub external_id: String,
    pub is_blackout: bool,
}

/// Result of parsing one feed.
#[derive(Debug, Clone, Default)]
pub struct ParsedFeed {
    pub events: Vec<FeedEvent>,
    /// Entries dropped because a required date property was missing.
    pub skipped: usize,
}

/// Parse raw feed text into structured events.
///
/// `not_available_summary` is the platform's marker for blackout entries; an
/// entry is a manual block iff its summary equals the marker and no
/// reservation URL was found in its description.
pub fn parse_feed(raw: &str, not_available_summary: &str) -> Result<ParsedFeed> {
    let mut parsed = ParsedFeed::default();
    let mut current: Option<RawEntry> = None;

    for line in unfold_lines(raw) {
        if line.eq_ignore_ascii_case("BEGIN:VEVENT") {
            current = Some(RawEntry::default());
            continue;
        }
        if line.eq_ignore_ascii_case("END:VEVENT") {
            if let Some(entry) = current.take() {
                match finalize_entry(entry, not_available_summary)? {
                    Some(event) => parsed.events.push(event),
                    None => parsed.skipped += 1,
                }
            }
            continue;
        }
        if let Some(ref mut entry) = current {
            entry.apply_line(&line);
        }
    }

    Ok(parsed)
}

/// Property accumulator for one VEVENT block.
#[derive(Debug, Default)]
struct RawEntry {
    uid: Option<String>,
    dtstart: Option<String>,
    dtend: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    dtstamp: Option<String>,
}

impl RawEntry {
    fn apply_line(&mut self, line: &str) {
        let Some((name_and_params, value)) = line.split_once(':') else {
            return;
        };
        let name = name_and_params.split(';').next().unwrap_or(name_and_params);

        match name.to_ascii_uppercase().as_str() {
            "UID" => self.uid = Some(value.to_string()),
            "DTSTART" => self.dtstart = Some(value.to_string()),
            "DTEND" => self.dtend = Some(value.to_string()),
            "SUMMARY" => self.summary = Some(unescape_text(value)),
            "DESCRIPTION" => self.description = Some(unescape_text(value)),
            "DTSTAMP" => self.dtstamp = Some(value.to_string()),
            _ => {}
        }
    }
}

fn finalize_entry(entry: RawEntry, not_available_summary: &str) -> Result<Option<FeedEvent>> {
    // Missing dates are a silent skip, not an error: feeds routinely carry
    // stub entries the platform never completed.
    let (Some(start_raw), Some(end_raw)) = (entry.dtstart.as_deref(), entry.dtend.as_deref())
    else {
        return Ok(None);
    };
    let (Some(start), Some(end)) = (parse_feed_datetime(start_raw), parse_feed_datetime(end_raw))
    else {
        return Ok(None);
    };

    let summary = entry.summary.unwrap_or_default();
    let description = entry.description.unwrap_or_default();
    let uid = entry.uid.unwrap_or_default();

    let reservation_url = RESERVATION_URL_RE
        .captures(&description)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let phone_last_digits =
        PHONE_RE.captures(&description).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string());

    let is_blackout = summary == not_available_summary && reservation_url.is_none();

    let external_id = if is_blackout {
        if uid.is_empty() {
            return Ok(None);
        }
        synthetic_block_id(&uid)
    } else {
        extract_external_id(reservation_url.as_deref(), &uid)?
    };

    Ok(Some(FeedEvent {
        uid,
        start,
        end,
        summary,
        description,
        dtstamp: entry.dtstamp.as_deref().and_then(parse_feed_datetime),
        reservation_url,
        phone_last_digits,
        external_id,
        is_blackout,
    }))
}

/// Derive the deterministic synthetic id for a blackout entry, so repeated
/// parses of the same entry collide to the same external id.
pub fn synthetic_block_id(uid: &str) -> String {
    let prefix = uid.split('@').next().unwrap_or(uid);
    format!("{MANUAL_BLOCK_ID_PREFIX}{prefix}")
}

fn extract_external_id(reservation_url: Option<&str>, uid: &str) -> Result<String> {
    reservation_url
        .and_then(|url| DETAILS_ID_RE.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            StaySyncError::FeedParse(format!(
                "no external id extractable from entry '{uid}': reservation URL missing or \
                 without /details/ segment"
            ))
        })
}

/// Parse an iCal date value. Bare `YYYYMMDD` dates are UTC midnight; values
/// with a time component are UTC instants regardless of a trailing `Z`.
fn parse_feed_datetime(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y%m%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let without_zulu = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(without_zulu, "%Y%m%dT%H%M%S").ok().map(|dt| dt.and_utc())
}

/// Unfold RFC 5545 folded lines: a line starting with space or tab continues
/// the previous one.
fn unfold_lines(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in raw.lines() {
        let trimmed_end = line.trim_end_matches('\r');
        if let Some(continuation) = trimmed_end.strip_prefix([' ', '\t']) {
            if let Some(last) = lines.last_mut() {
                last.push_str(continuation);
                continue;
            }
        }
        lines.push(trimmed_end.to_string());
    }

    lines
}

fn unescape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => result.push('\n'),
            Some(escaped) => result.push(escaped),
            None => result.push('\\'),
        }
    }

    result
}
