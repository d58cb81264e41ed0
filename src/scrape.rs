//! One scrape run: fetch, normalize, register the platform, persist.

use anyhow::{Context, Result};
use tracing::info;

use crate::api::{EnsembleClient, FetchRequest};
use crate::db::{resolve_platform_id, Database};
use crate::ingest::{persist, PersistSummary};
use crate::normalize::normalize;

/// Fetch one page of posts for `request` and store the new ones.
///
/// # Errors
///
/// Returns an error if the API call fails or the batch cannot be written.
pub async fn scrape(
    db: &Database,
    client: &EnsembleClient,
    request: &FetchRequest,
) -> Result<PersistSummary> {
    let response = client
        .fetch(request)
        .await
        .with_context(|| format!("Failed to fetch {} posts", request.platform))?;

    let records = normalize(request.platform, &response);
    info!(
        platform = %request.platform,
        hashtag = %request.hashtag,
        records = records.len(),
        "Normalized response"
    );

    let platform_id = resolve_platform_id(db.pool(), request.platform.as_str()).await?;
    let summary = persist(db, platform_id, &records, &request.search_context()).await?;

    info!(
        "Added {} posts with {} to {} database",
        summary.inserted, request.hashtag, request.platform
    );
    Ok(summary)
}
