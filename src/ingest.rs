//! Deduplicating batch insert of normalized posts.

use anyhow::{Context, Result};
use sqlx::error::ErrorKind;
use tracing::{debug, info, warn};

use crate::db::{insert_post, post_exists, Database, PostRecord, SearchContext};

/// Outcome of persisting one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    /// Rows written.
    pub inserted: usize,
    /// Records whose key was already stored (or seen earlier in the batch).
    pub duplicates: usize,
    /// Records the database refused with a constraint violation.
    pub rejected: usize,
}

impl PersistSummary {
    /// Number of records examined.
    #[must_use]
    pub fn total(&self) -> usize {
        self.inserted + self.duplicates + self.rejected
    }
}

/// Insert every record whose natural key is not yet stored.
///
/// All records are written in one transaction that is committed once at the
/// end. Duplicates and constraint violations skip the single record; any other
/// database error aborts the batch and rolls it back.
///
/// # Errors
///
/// Returns an error if the transaction cannot be opened or committed, or if a
/// query fails for a reason other than a constraint violation.
pub async fn persist(
    db: &Database,
    platform_id: i64,
    records: &[PostRecord],
    search: &SearchContext,
) -> Result<PersistSummary> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .context("Failed to begin insert transaction")?;
    let mut summary = PersistSummary::default();

    for record in records {
        let platform = record.platform();
        let key = record.unique_key();

        if post_exists(&mut *tx, record)
            .await
            .context("Failed to check for existing post")?
        {
            warn!(%platform, %key, "Post already exists, skipping");
            summary.duplicates += 1;
            continue;
        }

        match insert_post(&mut *tx, platform_id, record, search).await {
            Ok(v_id) => {
                debug!(%platform, %key, v_id, "Inserted post");
                summary.inserted += 1;
            }
            Err(e) if is_constraint_violation(&e) => {
                warn!(%platform, %key, error = %e, "Failed to insert post, skipping");
                summary.rejected += 1;
            }
            Err(e) => return Err(e).context("Failed to insert post"),
        }
    }

    tx.commit()
        .await
        .context("Failed to commit insert transaction")?;

    info!(
        platform_id,
        search_query = %search.query,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        "Batch persisted"
    );
    Ok(summary)
}

fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => !matches!(db_err.kind(), ErrorKind::Other),
        _ => false,
    }
}
