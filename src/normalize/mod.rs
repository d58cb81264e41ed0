//! Per-platform mapping from raw API responses to flat post records.
//!
//! Each mapper is pure: it never fails, substitutes declared defaults for
//! missing fields and skips items it cannot identify.

mod extract;
pub mod instagram;
pub mod threads;
pub mod tiktok;

pub use extract::{sanitize_utf8, strip_lone_surrogates};

use serde_json::Value;

use crate::db::PostRecord;
use crate::platform::Platform;

/// Normalize a response with the mapper for `platform`.
pub fn normalize(platform: Platform, response: &Value) -> Vec<PostRecord> {
    match platform {
        Platform::TikTok => tiktok::normalize(response)
            .into_iter()
            .map(PostRecord::TikTok)
            .collect(),
        Platform::Instagram => instagram::normalize(response)
            .into_iter()
            .map(PostRecord::Instagram)
            .collect(),
        Platform::Threads => threads::normalize(response)
            .into_iter()
            .map(PostRecord::Threads)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_carry_their_platform() {
        let response = json!({
            "data": {
                "posts": [{"itemInfos": {"video": {"urls": ["https://v.example.com/1"]}}}],
                "recent_posts": [{"node": {"display_url": "https://cdn.example.com/1.jpg"}}]
            }
        });

        let tiktok = normalize(Platform::TikTok, &response);
        assert_eq!(tiktok.len(), 1);
        assert_eq!(tiktok[0].platform(), Platform::TikTok);

        let instagram = normalize(Platform::Instagram, &response);
        assert_eq!(instagram.len(), 1);
        assert_eq!(instagram[0].platform(), Platform::Instagram);

        // `data` is an object, not the node list Threads expects
        assert!(normalize(Platform::Threads, &response).is_empty());
    }
}
