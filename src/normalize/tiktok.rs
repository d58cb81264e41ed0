use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::extract::{count_at, first_str_at, list_at, text_at};
use crate::db::TikTokRecord;

static HASHTAG: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// Map a `/tt/hashtag/recent-posts` response to TikTok records.
///
/// Posts live under `data.posts`. Items without a video URL are skipped,
/// since the URL is what identifies them.
pub fn normalize(response: &Value) -> Vec<TikTokRecord> {
    list_at(response, "/data/posts")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = normalize_item(item);
            if record.is_none() {
                debug!(index, "Skipping TikTok item without a video URL");
            }
            record
        })
        .collect()
}

fn normalize_item(item: &Value) -> Option<TikTokRecord> {
    let url = first_str_at(item, "/itemInfos/video/urls")?;
    let description = text_at(item, "/itemInfos/text");

    Some(TikTokRecord {
        url: url.to_string(),
        username: text_at(item, "/authorInfos/uniqueId"),
        hashtags: extract_hashtags(&description),
        description,
        likes: count_at(item, "/itemInfos/diggCount"),
        comments: count_at(item, "/itemInfos/commentCount"),
        views: count_at(item, "/itemInfos/playCount"),
        collects: count_at(item, "/itemInfos/collectCount"),
        shares: count_at(item, "/itemInfos/shareCount"),
        video_mp3: first_str_at(item, "/musicInfos/playUrl").map(String::from),
    })
}

/// Hashtags in caption order, `#` included.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
