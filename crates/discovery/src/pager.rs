//! Page-at-a-time iteration over remote listings.
//!
//! A [`PageSource`] is a handle, not a future: callers can only ask for the
//! next page, never await the whole listing as one value. Iteration is
//! strictly in provider order, lazy, finite, and not restartable.

use crate::error::{RemoteListingError, Result};

/// One remote listing being paged through.
#[async_trait::async_trait]
pub trait PageSource: Send {
    /// Fetch the next page of raw records. `Ok(None)` means exhausted;
    /// calling again after exhaustion keeps returning `Ok(None)`.
    async fn next_page(&mut self) -> Result<Option<Vec<serde_json::Value>>>;
}

/// Everything one drain produced, including a partial result.
#[derive(Debug, Default)]
pub struct DrainOutcome {
    /// Records in provider order, across page boundaries.
    pub records: Vec<serde_json::Value>,
    /// Set when a page fetch failed mid-drain; `records` then holds
    /// everything fetched before the failure.
    pub error: Option<RemoteListingError>,
}

/// Pull pages until the source is exhausted or a fetch fails.
pub async fn drain(source: &mut dyn PageSource) -> DrainOutcome {
    let mut outcome = DrainOutcome::default();
    loop {
        match source.next_page().await {
            Ok(Some(page)) => outcome.records.extend(page),
            Ok(None) => break,
            Err(e) => {
                outcome.error = Some(e);
                break;
            },
        }
    }
    outcome
}
