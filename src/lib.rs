//! Social post scraper library.
//!
//! Fetches TikTok, Instagram and Threads search results from the
//! EnsembleData API, normalizes each post into a flat record and appends new
//! posts to a local SQLite database, skipping ones already stored.

pub mod api;
pub mod config;
pub mod constants;
pub mod db;
pub mod ingest;
pub mod normalize;
pub mod platform;
pub mod scrape;
