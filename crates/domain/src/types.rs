//! Common data types used throughout the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a reservation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationKind {
    /// A genuine booking made by a traveler.
    Reservation,
    /// A host-initiated blackout that reserves dates without a booking.
    ManualBlockDate,
}

impl ReservationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reservation => "reservation",
            Self::ManualBlockDate => "manual_block_date",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reservation" => Some(Self::Reservation),
            "manual_block_date" => Some(Self::ManualBlockDate),
            _ => None,
        }
    }
}

/// Lifecycle status of a reservation.
///
/// `Confirmed` is the initial state. Later notification events can overwrite
/// the status in any order; no transition table is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Paid,
    Canceled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Paid => "paid",
            Self::Canceled => "canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(Self::Confirmed),
            "paid" => Some(Self::Paid),
            "canceled" => Some(Self::Canceled),
            _ => None,
        }
    }
}

/// A calendar feed registered for a listing platform.
///
/// Sources are created and edited by the admin surface; the pipeline only
/// reads active ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub url: String,
    pub platform: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for registering a new calendar source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCalendarSource {
    pub url: String,
    pub platform: String,
    pub active: bool,
}

/// Canonical reservation record, the join point of both ingestion flows.
///
/// `end` is exclusive (checkout day). `external_id` is unique; manual
/// blackouts carry a deterministic synthetic id so repeated parses collide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub external_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub price: f64,
    pub guest_count: u32,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub source_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parameters for creating a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReservation {
    pub external_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub price: f64,
    pub guest_count: u32,
    pub kind: ReservationKind,
    pub status: ReservationStatus,
    pub source_id: Option<String>,
}

/// Partial update applied to an existing reservation.
///
/// Only populated fields are written; `updated_at` moves only when the
/// repository actually applies at least one field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationPatch {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub price: Option<f64>,
    pub guest_count: Option<u32>,
    pub kind: Option<ReservationKind>,
    pub status: Option<ReservationStatus>,
    pub source_id: Option<String>,
}

impl ReservationPatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.price.is_none()
            && self.guest_count.is_none()
            && self.kind.is_none()
            && self.status.is_none()
            && self.source_id.is_none()
    }
}

/// Reservation-shaped value produced by a platform adapter from one feed
/// event, before the reconciliation engine attaches internal id and source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub external_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub price: f64,
    pub guest_count: u32,
    pub kind: ReservationKind,
}

/// Kind of signal extracted from a notification email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Payout,
    Creation,
    Cancellation,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payout => "payout",
            Self::Creation => "creation",
            Self::Cancellation => "cancellation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "payout" => Some(Self::Payout),
            "creation" => Some(Self::Creation),
            "cancellation" => Some(Self::Cancellation),
            _ => None,
        }
    }
}

/// Structured event extracted from one notification email.
///
/// Mutated exactly once (`consumed` set true) by the event processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: String,
    pub booking_id: String,
    pub received_at: DateTime<Utc>,
    pub kind: NotificationKind,
    pub price: Option<f64>,
    pub consumed: bool,
    pub created_at: DateTime<Utc>,
}

/// Parameters for storing a newly extracted notification event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotificationEvent {
    pub booking_id: String,
    pub received_at: DateTime<Utc>,
    pub kind: NotificationKind,
    pub price: Option<f64>,
}

/// One fully buffered message pulled from the mailbox.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub uid: u32,
    pub subject: String,
    pub sender: String,
    /// Value of the Date header, when present and parsable.
    pub date: Option<DateTime<Utc>>,
    /// Body as transported, possibly still quoted-printable encoded.
    pub raw_body: String,
    /// Body after transfer-encoding decode.
    pub decoded_body: String,
}

/// Aggregate result of one calendar sync run across all active sources.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub errors: usize,
}

/// Aggregate result of one mailbox poll run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxReport {
    pub stored: usize,
    pub duplicates: usize,
    pub ignored: usize,
    pub errors: usize,
}

/// Aggregate result of one event processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessReport {
    pub applied: usize,
    pub orphaned: usize,
    pub errors: usize,
}
