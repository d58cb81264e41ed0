use serde_json::Value;
use tracing::debug;

use super::extract::{count_at, flag_at, list_at, str_at, text_at};
use crate::db::ThreadsRecord;

/// Map a `/threads/keyword/search` response to Threads records.
///
/// The response is a list of nodes under `data`; the post is taken from the
/// first item of each node's thread. Nodes without that post are skipped.
pub fn normalize(response: &Value) -> Vec<ThreadsRecord> {
    list_at(response, "/data")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let post = item
                .pointer("/node/thread/thread_items/0/post")
                .filter(|post| post.as_object().is_some_and(|o| !o.is_empty()));
            if post.is_none() {
                debug!(index, "Skipping Threads node without a post");
            }
            post.map(normalize_post)
        })
        .collect()
}

fn normalize_post(post: &Value) -> ThreadsRecord {
    ThreadsRecord {
        url: str_at(post, "/video_versions/0/url").map(String::from),
        username: text_at(post, "/user/username"),
        verified: flag_at(post, "/user/is_verified"),
        description: text_at(post, "/text_post_app_info/text_fragments/fragments/0/plaintext"),
        likes: count_at(post, "/like_count"),
        comments: count_at(post, "/text_post_app_info/direct_reply_count"),
        shares: count_at(post, "/text_post_app_info/repost_count"),
        quotes: count_at(post, "/text_post_app_info/quote_count"),
    }
}
