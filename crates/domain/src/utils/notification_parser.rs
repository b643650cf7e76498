//! Notification email parser.
//!
//! Classifies a forwarded booking-platform email by subject keywords into a
//! payout, creation, or cancellation event, and extracts the booking id and
//! optional monetary amount via pattern matching.
//!
//! Forwarded bodies sometimes arrive with their quoted-printable transfer
//! encoding still in place, so every body pattern is tried against both the
//! raw and the decoded form, and the euro sign is matched in either shape.
//! Amounts use `,` as the decimal separator; an unmatched amount leaves the
//! price unset rather than failing the event.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::NotificationKind;

// The euro sign as it appears decoded and as its quoted-printable bytes.
const EURO_PATTERN: &str = r"(?:€|=E2=82=AC)";

lazy_static! {
    /// 10-character booking codes, e.g. `HMPSS2HE58`.
    static ref BOOKING_ID_RE: Regex = Regex::new(r"\b([A-Z0-9]{10})\b").unwrap();

    static ref PAYOUT_AMOUNT_RE: Regex = Regex::new(&format!(
        r"(?i)(?:sent a payout of|versement de)\s*([0-9]+(?:[.,][0-9]+)?)\s*{EURO_PATTERN}"
    ))
    .unwrap();

    static ref EARN_AMOUNT_RE: Regex = Regex::new(&format!(
        r"(?i)(?:YOU EARN|VOUS GAGNEZ)\s*:?\s*([0-9]+(?:[.,][0-9]+)?)\s*{EURO_PATTERN}"
    ))
    .unwrap();

    static ref NEW_AMOUNT_RE: Regex = Regex::new(&format!(
        r"(?i)(?:amount is now|montant est (?:désormais|maintenant) de)\s*([0-9]+(?:[.,][0-9]+)?)\s*{EURO_PATTERN}"
    ))
    .unwrap();

    static ref FULL_REFUND_RE: Regex =
        Regex::new(r"(?i)(?:full refund|remboursement int[ée]gral)").unwrap();
}

/// Structured event extracted from one email, before a received timestamp is
/// attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNotification {
    pub booking_id: String,
    pub kind: NotificationKind,
    pub price: Option<f64>,
}

/// Parse one message into a notification event.
///
/// Returns `None` when the message is not classifiable: no booking id in the
/// body, or a subject matching none of the known markers. Both cases are an
/// "ignored" outcome for the caller, not an error.
pub fn parse_notification(
    subject: &str,
    raw_body: &str,
    decoded_body: &str,
) -> Option<ParsedNotification> {
    let booking_id = find_booking_id(decoded_body).or_else(|| find_booking_id(raw_body))?;
    let kind = classify_subject(subject)?;

    let price = match kind {
        NotificationKind::Payout => capture_amount(&PAYOUT_AMOUNT_RE, subject),
        NotificationKind::Creation => capture_amount(&EARN_AMOUNT_RE, raw_body)
            .or_else(|| capture_amount(&EARN_AMOUNT_RE, decoded_body)),
        NotificationKind::Cancellation => {
            if FULL_REFUND_RE.is_match(raw_body) || FULL_REFUND_RE.is_match(decoded_body) {
                Some(0.0)
            } else {
                capture_amount(&NEW_AMOUNT_RE, raw_body)
                    .or_else(|| capture_amount(&NEW_AMOUNT_RE, decoded_body))
            }
        }
    };

    Some(ParsedNotification { booking_id, kind, price })
}

fn classify_subject(subject: &str) -> Option<NotificationKind> {
    let lower = subject.to_lowercase();

    if lower.contains("payment sent") || lower.contains("versement") {
        return Some(NotificationKind::Payout);
    }
    if lower.contains("reservation confirmed") || lower.contains("réservation confirmée") {
        return Some(NotificationKind::Creation);
    }
    if lower.contains("cancel") || lower.contains("annul") {
        return Some(NotificationKind::Cancellation);
    }

    None
}

fn find_booking_id(body: &str) -> Option<String> {
    // All-caps words of exactly ten letters are common in shouty marketing
    // copy; a genuine code always mixes in a digit.
    BOOKING_ID_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .find(|candidate| candidate.chars().any(|c| c.is_ascii_digit()))
}

fn capture_amount(pattern: &Regex, text: &str) -> Option<f64> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    raw.replace(',', ".").parse::<f64>().ok()
}
