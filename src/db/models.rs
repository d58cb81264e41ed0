use std::fmt;

use serde::{Deserialize, Serialize};

use crate::platform::Platform;

/// A row of the platform registry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PlatformRow {
    pub p_id: i64,
    pub platform: String,
}

/// Query parameters a batch was fetched with, stored alongside each row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchContext {
    pub query: String,
    /// TikTok day window.
    pub days: Option<i64>,
    /// TikTok cursor, Instagram chunk size.
    pub max_cursor: Option<i64>,
}

/// A normalized TikTok post, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TikTokRecord {
    pub url: String,
    pub username: String,
    pub description: String,
    pub hashtags: Vec<String>,
    pub likes: i64,
    pub comments: i64,
    pub views: i64,
    pub collects: i64,
    pub shares: i64,
    pub video_mp3: Option<String>,
}

impl TikTokRecord {
    /// Hashtags in their stored form: `#a, #b`.
    #[must_use]
    pub fn hashtags_joined(&self) -> String {
        self.hashtags.join(", ")
    }
}

/// A normalized Instagram post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstagramRecord {
    pub url: String,
    pub username: String,
    pub description: String,
    pub likes: i64,
    pub comments: i64,
    /// Shortcode; `None` binds NULL so posts without one never collide.
    pub code: Option<String>,
}

/// A normalized Threads post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadsRecord {
    pub url: Option<String>,
    pub username: String,
    pub verified: bool,
    pub description: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub quotes: i64,
}

/// A normalized post of any platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostRecord {
    TikTok(TikTokRecord),
    Instagram(InstagramRecord),
    Threads(ThreadsRecord),
}

impl PostRecord {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            Self::TikTok(_) => Platform::TikTok,
            Self::Instagram(_) => Platform::Instagram,
            Self::Threads(_) => Platform::Threads,
        }
    }

    /// The key used to detect an already stored copy of this post.
    #[must_use]
    pub fn unique_key(&self) -> UniqueKey<'_> {
        match self {
            Self::TikTok(r) => UniqueKey::Url(&r.url),
            Self::Instagram(r) => UniqueKey::Url(&r.url),
            Self::Threads(r) => UniqueKey::Content {
                username: &r.username,
                description: &r.description,
                likes: r.likes,
                comments: r.comments,
                shares: r.shares,
                quotes: r.quotes,
            },
        }
    }
}

/// Natural uniqueness key of a post.
///
/// Threads responses may lack a stable URL, so their posts are keyed by
/// content. Two distinct posts with identical text and counts collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey<'a> {
    Url(&'a str),
    Content {
        username: &'a str,
        description: &'a str,
        likes: i64,
        comments: i64,
        shares: i64,
        quotes: i64,
    },
}

impl fmt::Display for UniqueKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Content {
                username,
                likes,
                comments,
                shares,
                quotes,
                ..
            } => write!(
                f,
                "@{username} (likes={likes}, comments={comments}, shares={shares}, quotes={quotes})"
            ),
        }
    }
}

/// A stored TikTok post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TikTokRow {
    pub v_id: i64,
    pub p_id: Option<i64>,
    pub search_query: Option<String>,
    pub search_days: Option<i64>,
    pub max_cursor: Option<i64>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub hashtags: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub views: Option<i64>,
    pub collects: Option<i64>,
    pub shares: Option<i64>,
    pub video_mp3: Option<String>,
}

/// A stored Instagram post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InstagramRow {
    pub v_id: i64,
    pub p_id: Option<i64>,
    pub search_query: Option<String>,
    pub max_cursor: Option<i64>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub code: Option<String>,
}

/// A stored Threads post.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ThreadsRow {
    pub v_id: i64,
    pub p_id: Option<i64>,
    pub search_query: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub description: Option<String>,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
    pub quotes: Option<i64>,
    /// Stored as text: `"1"` or `"0"`.
    pub verified: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threads_record() -> ThreadsRecord {
        ThreadsRecord {
            url: None,
            username: "poster".to_string(),
            verified: false,
            description: "same words".to_string(),
            likes: 3,
            comments: 1,
            shares: 0,
            quotes: 0,
        }
    }

    #[test]
    fn test_threads_key_ignores_url_and_verified() {
        let a = threads_record();
        let b = ThreadsRecord {
            url: Some("https://cdn.example.com/v.mp4".to_string()),
            verified: true,
            ..threads_record()
        };
        assert_eq!(
            PostRecord::Threads(a).unique_key(),
            PostRecord::Threads(b).unique_key()
        );
    }

    #[test]
    fn test_hashtags_joined() {
        let record = TikTokRecord {
            url: "https://v.example.com/1".to_string(),
            username: String::new(),
            description: String::new(),
            hashtags: vec!["#sunset".to_string(), "#vibes".to_string()],
            likes: 0,
            comments: 0,
            views: 0,
            collects: 0,
            shares: 0,
            video_mp3: None,
        };
        assert_eq!(record.hashtags_joined(), "#sunset, #vibes");
        assert_eq!(PostRecord::TikTok(record).platform(), Platform::TikTok);
    }

    #[test]
    fn test_unique_key_display() {
        assert_eq!(UniqueKey::Url("https://x").to_string(), "https://x");
        let record = PostRecord::Threads(threads_record());
        assert_eq!(
            record.unique_key().to_string(),
            "@poster (likes=3, comments=1, shares=0, quotes=0)"
        );
    }
}
