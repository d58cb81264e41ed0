use anyhow::{Context, Result};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::models::{
    InstagramRow, PlatformRow, PostRecord, SearchContext, ThreadsRow, TikTokRow, UniqueKey,
};
use crate::platform::Platform;

// ========== Platform Registry ==========

/// Get the id registered for a platform name, registering it on first use.
///
/// Lookup ignores case; new names are stored lower-case.
pub async fn resolve_platform_id(pool: &SqlitePool, name: &str) -> Result<i64> {
    let name = name.trim().to_lowercase();

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT p_id FROM scraped_data WHERE lower(platform) = ? ORDER BY p_id LIMIT 1",
    )
    .bind(&name)
    .fetch_optional(pool)
    .await
    .context("Failed to look up platform")?;

    if let Some((p_id,)) = existing {
        return Ok(p_id);
    }

    let result = sqlx::query("INSERT INTO scraped_data (platform) VALUES (?)")
        .bind(&name)
        .execute(pool)
        .await
        .context("Failed to register platform")?;

    let p_id = result.last_insert_rowid();
    info!(platform = %name, p_id, "Registered platform");
    Ok(p_id)
}

/// List all registered platforms in id order.
pub async fn list_platforms(pool: &SqlitePool) -> Result<Vec<PlatformRow>> {
    sqlx::query_as("SELECT p_id, platform FROM scraped_data ORDER BY p_id")
        .fetch_all(pool)
        .await
        .context("Failed to list platforms")
}

// ========== Posts ==========

/// Check whether a post with the record's natural key is already stored.
pub async fn post_exists(conn: &mut SqliteConnection, record: &PostRecord) -> sqlx::Result<bool> {
    let row: Option<(i64,)> = match record.unique_key() {
        UniqueKey::Url(url) => {
            let sql = format!(
                "SELECT 1 FROM {} WHERE url = ? LIMIT 1",
                record.platform().as_str()
            );
            sqlx::query_as(&sql).bind(url).fetch_optional(conn).await?
        }
        UniqueKey::Content {
            username,
            description,
            likes,
            comments,
            shares,
            quotes,
        } => {
            sqlx::query_as(
                r"
                SELECT 1 FROM threads
                WHERE username = ? AND description = ? AND likes = ?
                  AND comments = ? AND shares = ? AND quotes = ?
                LIMIT 1
                ",
            )
            .bind(username)
            .bind(description)
            .bind(likes)
            .bind(comments)
            .bind(shares)
            .bind(quotes)
            .fetch_optional(conn)
            .await?
        }
    };

    Ok(row.is_some())
}

/// Insert a post into its platform's table, returning the new row id.
///
/// Errors are returned unwrapped so callers can tell constraint violations
/// apart from other failures.
pub async fn insert_post(
    conn: &mut SqliteConnection,
    platform_id: i64,
    record: &PostRecord,
    search: &SearchContext,
) -> sqlx::Result<i64> {
    let result = match record {
        PostRecord::TikTok(post) => {
            sqlx::query(
                r"
                INSERT INTO tiktok (p_id, search_query, search_days, max_cursor, url, username,
                    description, hashtags, likes, comments, views, collects, shares, video_mp3)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(platform_id)
            .bind(&search.query)
            .bind(search.days)
            .bind(search.max_cursor)
            .bind(&post.url)
            .bind(&post.username)
            .bind(&post.description)
            .bind(post.hashtags_joined())
            .bind(post.likes)
            .bind(post.comments)
            .bind(post.views)
            .bind(post.collects)
            .bind(post.shares)
            .bind(&post.video_mp3)
            .execute(conn)
            .await?
        }
        PostRecord::Instagram(post) => {
            sqlx::query(
                r"
                INSERT INTO instagram (p_id, search_query, max_cursor, url, username,
                    description, likes, comments, code)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(platform_id)
            .bind(&search.query)
            .bind(search.max_cursor)
            .bind(&post.url)
            .bind(&post.username)
            .bind(&post.description)
            .bind(post.likes)
            .bind(post.comments)
            .bind(&post.code)
            .execute(conn)
            .await?
        }
        PostRecord::Threads(post) => {
            sqlx::query(
                r"
                INSERT INTO threads (p_id, search_query, url, username, verified,
                    description, likes, comments, shares, quotes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(platform_id)
            .bind(&search.query)
            .bind(&post.url)
            .bind(&post.username)
            .bind(post.verified)
            .bind(&post.description)
            .bind(post.likes)
            .bind(post.comments)
            .bind(post.shares)
            .bind(post.quotes)
            .execute(conn)
            .await?
        }
    };

    Ok(result.last_insert_rowid())
}

/// Count stored posts for a platform.
pub async fn count_posts(pool: &SqlitePool, platform: Platform) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", platform.as_str());
    let (count,): (i64,) = sqlx::query_as(&sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to count {platform} posts"))?;
    Ok(count)
}

/// Get all stored TikTok posts in insertion order.
pub async fn get_tiktok_posts(pool: &SqlitePool) -> Result<Vec<TikTokRow>> {
    sqlx::query_as(
        r"
        SELECT v_id, p_id, search_query, search_days, max_cursor, url, username, description,
               hashtags, likes, comments, views, collects, shares, video_mp3
        FROM tiktok
        ORDER BY v_id
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch TikTok posts")
}

/// Get all stored Instagram posts in insertion order.
pub async fn get_instagram_posts(pool: &SqlitePool) -> Result<Vec<InstagramRow>> {
    sqlx::query_as(
        r"
        SELECT v_id, p_id, search_query, max_cursor, url, username, description,
               likes, comments, code
        FROM instagram
        ORDER BY v_id
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch Instagram posts")
}

/// Get all stored Threads posts in insertion order.
pub async fn get_threads_posts(pool: &SqlitePool) -> Result<Vec<ThreadsRow>> {
    sqlx::query_as(
        r"
        SELECT v_id, p_id, search_query, url, username, description,
               likes, comments, shares, quotes, verified
        FROM threads
        ORDER BY v_id
        ",
    )
    .fetch_all(pool)
    .await
    .context("Failed to fetch Threads posts")
}
