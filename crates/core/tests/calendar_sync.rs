//! Integration tests for the calendar sync service against mock ports.

mod support;

use std::sync::Arc;

use staysync_core::{CalendarSyncService, PlatformRegistry};
use staysync_domain::{NewCalendarSource, ReservationKind, SyncReport};
use support::calendar::{blackout_entry, feed, reserved_entry};
use support::{MockCalendarSourceRepository, MockFeedFetcher, MockReservationRepository};

const FEED_URL: &str = "https://www.airbnb.com/calendar/ical/1234.ics?s=secret";

fn service(
    fetcher: MockFeedFetcher,
    sources: MockCalendarSourceRepository,
    reservations: MockReservationRepository,
) -> CalendarSyncService {
    CalendarSyncService::new(
        Arc::new(fetcher),
        PlatformRegistry::with_defaults(),
        Arc::new(sources),
        Arc::new(reservations),
    )
}

async fn airbnb_source(sources: &MockCalendarSourceRepository, url: &str) {
    use staysync_core::reservations::ports::CalendarSourceRepository;
    sources
        .create(NewCalendarSource {
            url: url.to_string(),
            platform: "airbnb".to_string(),
            active: true,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn syncing_twice_against_unchanged_feed_is_idempotent() {
    let body = feed(&[
        reserved_entry("e1@airbnb.com", "HMPSS2HE58", "20251221", "20251224"),
        blackout_entry("abc123@airbnb.com", "20260105", "20260107"),
    ]);
    let fetcher = MockFeedFetcher::new().with_feed(FEED_URL, &body);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    let service = service(fetcher, sources, reservations.clone());

    let first = service.sync_all().await.unwrap();
    assert_eq!(first, SyncReport { created: 2, updated: 0, errors: 0 });

    let second = service.sync_all().await.unwrap();
    assert_eq!(second, SyncReport { created: 0, updated: 0, errors: 0 });

    assert_eq!(reservations.all().len(), 2);
}

#[tokio::test]
async fn reservation_url_yields_exact_external_id() {
    let body = feed(&[reserved_entry("e1@airbnb.com", "HMPSS2HE58", "20251221", "20251224")]);
    let fetcher = MockFeedFetcher::new().with_feed(FEED_URL, &body);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    service(fetcher, sources, reservations.clone()).sync_all().await.unwrap();

    let stored = reservations.all();
    assert_eq!(stored[0].external_id, "HMPSS2HE58");
    assert_eq!(stored[0].kind, ReservationKind::Reservation);
}

#[tokio::test]
async fn blackout_maps_to_reproducible_synthetic_id() {
    let body = feed(&[blackout_entry("abc123@airbnb.com", "20260105", "20260107")]);
    let fetcher = MockFeedFetcher::new().with_feed(FEED_URL, &body);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    let service = service(fetcher, sources, reservations.clone());
    service.sync_all().await.unwrap();
    service.sync_all().await.unwrap();

    let stored = reservations.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].external_id, "MANUAL_BLOCK_abc123");
    assert_eq!(stored[0].kind, ReservationKind::ManualBlockDate);
    assert_eq!(stored[0].guest_count, 1);
}

#[tokio::test]
async fn one_night_booking_spans_twenty_four_hours() {
    let body = feed(&[reserved_entry("e1@airbnb.com", "HMABCDEF12", "20251221", "20251222")]);
    let fetcher = MockFeedFetcher::new().with_feed(FEED_URL, &body);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    service(fetcher, sources, reservations.clone()).sync_all().await.unwrap();

    let stored = reservations.all();
    assert_eq!((stored[0].end - stored[0].start).num_hours(), 24);
}

#[tokio::test]
async fn failing_source_does_not_stop_the_others() {
    let good_url = "https://www.airbnb.com/calendar/ical/good.ics";
    let dead_url = "https://www.airbnb.com/calendar/ical/dead.ics";
    let body = feed(&[reserved_entry("e1@airbnb.com", "HMPSS2HE58", "20251221", "20251224")]);
    let fetcher = MockFeedFetcher::new().with_feed(good_url, &body);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, dead_url).await;
    airbnb_source(&sources, good_url).await;

    let report = service(fetcher, sources, reservations.clone()).sync_all().await.unwrap();

    assert_eq!(report, SyncReport { created: 1, updated: 0, errors: 1 });
    assert_eq!(reservations.all().len(), 1);
}

#[tokio::test]
async fn changed_dates_update_the_existing_reservation() {
    let fetcher = MockFeedFetcher::new().with_feed(
        FEED_URL,
        &feed(&[reserved_entry("e1@airbnb.com", "HMPSS2HE58", "20251221", "20251224")]),
    );
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    let service = service(fetcher.clone(), sources, reservations.clone());
    service.sync_all().await.unwrap();

    // Guest extends the stay by one night; the feed is republished.
    fetcher.set_feed(
        FEED_URL,
        &feed(&[reserved_entry("e1@airbnb.com", "HMPSS2HE58", "20251221", "20251225")]),
    );

    let report = service.sync_all().await.unwrap();

    assert_eq!(report, SyncReport { created: 0, updated: 1, errors: 0 });
    let stored = reservations.all();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].end.format("%Y%m%d").to_string(), "20251225");
}

#[tokio::test]
async fn unextractable_external_id_counts_as_source_error() {
    let broken = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nDTSTART;VALUE=DATE:20251221\r\n\
                  DTEND;VALUE=DATE:20251222\r\nSUMMARY:Reserved\r\nUID:noid@airbnb.com\r\n\
                  DESCRIPTION:No reservation link in here\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
    let fetcher = MockFeedFetcher::new().with_feed(FEED_URL, broken);
    let sources = MockCalendarSourceRepository::new();
    let reservations = MockReservationRepository::new();
    airbnb_source(&sources, FEED_URL).await;

    let report = service(fetcher, sources, reservations.clone()).sync_all().await.unwrap();

    assert_eq!(report, SyncReport { created: 0, updated: 0, errors: 1 });
    assert!(reservations.all().is_empty());
}
