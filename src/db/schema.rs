use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Create the registry and per-platform tables if they do not exist.
///
/// Never alters or drops existing tables, so it is safe on every startup and
/// against databases written by earlier versions of the scraper.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    debug!("Ensuring database schema");

    // Platform registry
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS scraped_data (
            p_id INTEGER PRIMARY KEY AUTOINCREMENT,
            platform TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create scraped_data table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS tiktok (
            v_id INTEGER PRIMARY KEY AUTOINCREMENT,
            p_id INTEGER,
            search_query TEXT,
            search_days INTEGER,
            max_cursor INTEGER,
            url TEXT UNIQUE,
            username TEXT,
            description TEXT UNIQUE,
            hashtags TEXT,
            likes INTEGER,
            comments INTEGER,
            views INTEGER,
            collects INTEGER,
            shares INTEGER,
            video_mp3 TEXT,
            FOREIGN KEY (p_id) REFERENCES scraped_data(p_id)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create tiktok table")?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS instagram (
            v_id INTEGER PRIMARY KEY AUTOINCREMENT,
            p_id INTEGER,
            search_query TEXT,
            max_cursor INTEGER,
            url TEXT UNIQUE,
            username TEXT,
            description TEXT,
            likes INTEGER,
            comments INTEGER,
            code TEXT UNIQUE,
            FOREIGN KEY (p_id) REFERENCES scraped_data(p_id)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create instagram table")?;

    // Threads posts may lack a URL, so uniqueness is on content
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS threads (
            v_id INTEGER PRIMARY KEY AUTOINCREMENT,
            p_id INTEGER,
            search_query TEXT,
            url TEXT,
            username TEXT,
            verified TEXT,
            description TEXT,
            likes INTEGER,
            comments INTEGER,
            shares INTEGER,
            quotes INTEGER,
            FOREIGN KEY (p_id) REFERENCES scraped_data(p_id),
            UNIQUE(username, description, likes, comments, shares, quotes)
        )
        ",
    )
    .execute(pool)
    .await
    .context("Failed to create threads table")?;

    Ok(())
}
