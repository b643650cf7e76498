//! Calendar feed retrieval over HTTP.

pub mod fetcher;

pub use fetcher::HttpFeedFetcher;
