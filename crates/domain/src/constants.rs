//! Domain constants shared across the pipeline.

/// Summary marker Airbnb puts on entries that are real bookings.
pub const AIRBNB_RESERVED_SUMMARY: &str = "Reserved";

/// Summary marker Airbnb puts on host blackout entries.
pub const AIRBNB_NOT_AVAILABLE_SUMMARY: &str = "Airbnb (Not available)";

/// Platform tag carried by calendar sources pointing at Airbnb feeds.
pub const AIRBNB_PLATFORM: &str = "airbnb";

/// Email domain marking a forwarded message as coming from Airbnb.
pub const AIRBNB_EMAIL_DOMAIN: &str = "airbnb.com";

/// Prefix of the synthetic external id derived for manual blackout entries.
pub const MANUAL_BLOCK_ID_PREFIX: &str = "MANUAL_BLOCK_";

/// Defaults for fields calendar feeds do not carry.
pub const FEED_DEFAULT_PRICE: f64 = 0.0;
pub const FEED_DEFAULT_GUEST_COUNT: u32 = 1;
