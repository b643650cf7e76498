//! Mock feed fetcher plus iCal fixture builders.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use staysync_core::calendar::ports::FeedFetcher;
use staysync_domain::{Result as DomainResult, StaySyncError};

/// In-memory mock for `FeedFetcher`.
///
/// Serves canned feed bodies per URL; unknown URLs fail like a network
/// error so per-source isolation can be exercised.
#[derive(Default, Clone)]
pub struct MockFeedFetcher {
    feeds: Arc<Mutex<HashMap<String, String>>>,
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(self, url: &str, body: &str) -> Self {
        self.feeds.lock().unwrap().insert(url.to_string(), body.to_string());
        self
    }

    /// Replace a feed body, simulating the platform republishing the feed.
    pub fn set_feed(&self, url: &str, body: &str) {
        self.feeds.lock().unwrap().insert(url.to_string(), body.to_string());
    }
}

#[async_trait]
impl FeedFetcher for MockFeedFetcher {
    async fn fetch(&self, url: &str) -> DomainResult<String> {
        self.feeds
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| StaySyncError::Network(format!("connection refused: {url}")))
    }
}

/// Wrap VEVENT bodies in a VCALENDAR envelope.
pub fn feed(entries: &[String]) -> String {
    let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Airbnb//EN\r\n");
    for entry in entries {
        body.push_str(entry);
    }
    body.push_str("END:VCALENDAR\r\n");
    body
}

/// A booked entry carrying a reservation URL with the given booking id.
pub fn reserved_entry(uid: &str, booking_id: &str, start: &str, end: &str) -> String {
    format!(
        "BEGIN:VEVENT\r\nDTSTAMP:20251201T080000Z\r\nDTSTART;VALUE=DATE:{start}\r\n\
         DTEND;VALUE=DATE:{end}\r\nSUMMARY:Reserved\r\nUID:{uid}\r\n\
         DESCRIPTION:Reservation URL: https://www.airbnb.com/hosting/reservations/details/{booking_id}\\n\
         Phone Number (Last 4 Digits): 4242\r\nEND:VEVENT\r\n"
    )
}

/// A host blackout entry without any reservation URL.
pub fn blackout_entry(uid: &str, start: &str, end: &str) -> String {
    format!(
        "BEGIN:VEVENT\r\nDTSTAMP:20251201T080000Z\r\nDTSTART;VALUE=DATE:{start}\r\n\
         DTEND;VALUE=DATE:{end}\r\nSUMMARY:Airbnb (Not available)\r\nUID:{uid}\r\nEND:VEVENT\r\n"
    )
}
