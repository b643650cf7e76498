//! Pure parsing utilities for the ingestion pipeline.

pub mod feed_parser;
pub mod notification_parser;
