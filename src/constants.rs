//! Shared constants used across the application.

/// Base URL of the EnsembleData REST API.
pub const DEFAULT_API_URL: &str = "https://ensembledata.com/apis";

/// Database location relative to the user's home directory.
pub const DEFAULT_DATABASE_SUBPATH: &str = "Desktop/JoyNet/norman/scraped_data/scraped_videos.db";

/// User agent string sent with API requests.
pub const USER_AGENT: &str = concat!("social-post-scraper/", env!("CARGO_PKG_VERSION"));
