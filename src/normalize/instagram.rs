use serde_json::Value;
use tracing::debug;

use super::extract::{count_at, list_at, str_at, text_at};
use crate::db::InstagramRecord;

/// Map an `/instagram/hashtag/posts` response to Instagram records.
///
/// Posts live under `data.recent_posts`, each wrapping its fields in `node`.
pub fn normalize(response: &Value) -> Vec<InstagramRecord> {
    list_at(response, "/data/recent_posts")
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let record = item.get("node").and_then(normalize_node);
            if record.is_none() {
                debug!(index, "Skipping Instagram item without a display URL");
            }
            record
        })
        .collect()
}

fn normalize_node(node: &Value) -> Option<InstagramRecord> {
    let url = str_at(node, "/display_url")?;

    Some(InstagramRecord {
        url: url.to_string(),
        username: text_at(node, "/owner/username"),
        description: text_at(node, "/edge_media_to_caption/edges/0/node/text"),
        likes: count_at(node, "/edge_liked_by/count"),
        comments: count_at(node, "/edge_media_to_comment/count"),
        code: str_at(node, "/shortcode").map(String::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_full_node() {
        let response = json!({"data": {"recent_posts": [{"node": {
            "display_url": "https://cdn.example.com/p/1.jpg",
            "owner": {"username": "gardener"},
            "edge_media_to_caption": {"edges": [
                {"node": {"text": "First fragment"}},
                {"node": {"text": "Second fragment"}}
            ]},
            "edge_liked_by": {"count": 55},
            "edge_media_to_comment": {"count": 8},
            "shortcode": "Cx1AbC"
        }}]}});
        let records = normalize(&response);

        assert_eq!(
            records,
            vec![InstagramRecord {
                url: "https://cdn.example.com/p/1.jpg".to_string(),
                username: "gardener".to_string(),
                description: "First fragment".to_string(),
                likes: 55,
                comments: 8,
                code: Some("Cx1AbC".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_liked_by_yields_zero_likes() {
        let response = json!({"data": {"recent_posts": [{"node": {
            "display_url": "https://cdn.example.com/p/2.jpg",
            "edge_media_to_comment": {"count": 3}
        }}]}});
        let records = normalize(&response);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].likes, 0);
        assert_eq!(records[0].comments, 3);
        assert_eq!(records[0].description, "");
        assert_eq!(records[0].username, "");
        assert_eq!(records[0].code, None);
    }

    #[test]
    fn test_empty_caption_edges() {
        let response = json!({"data": {"recent_posts": [{"node": {
            "display_url": "https://cdn.example.com/p/3.jpg",
            "edge_media_to_caption": {"edges": []}
        }}]}});
        let records = normalize(&response);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_skips_nodes_without_url() {
        let response = json!({"data": {"recent_posts": [
            {"node": {"shortcode": "nourl"}},
            {"not_node": {}},
            42,
            {"node": {"display_url": "https://cdn.example.com/p/4.jpg"}}
        ]}});
        let records = normalize(&response);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://cdn.example.com/p/4.jpg");
    }
}
