//! Drains every page of a search result into one Bundle

use fhir_core::Bundle;

use crate::client::SearchClient;
use crate::error::Result;

/// Walks the `next` links of a search result, starting from its first page.
///
/// Pages are requested one at a time because each request needs the link
/// returned by the previous response.
pub struct BundleFetcher<'a, C> {
    client: &'a C,
    original: &'a Bundle,
}

impl<'a, C: SearchClient> BundleFetcher<'a, C> {
    pub fn starting_with(client: &'a C, original: &'a Bundle) -> Self {
        Self { client, original }
    }

    /// Fetch all remaining pages and return the aggregate.
    ///
    /// The aggregate starts as a copy of the original page, so the caller's
    /// bundle is never modified. It keeps the original's declared `total`,
    /// has every page's entries in link order, and carries no links since
    /// they described the consumed page chain. A total that disagrees with
    /// the number of entries is logged and otherwise ignored.
    pub async fn fetch_all(&self) -> Result<Bundle> {
        let mut aggregated = self.original.clone();
        tracing::debug!(
            total = ?self.original.total,
            entries = self.original.entry.len(),
            "Original bundle of the search"
        );

        let mut partial: Option<Bundle> = None;
        let mut pages = 1;
        loop {
            // Continue from the last fetched page, never from the aggregate
            let current = partial.as_ref().unwrap_or(self.original);
            if current.next_link().is_none() {
                break;
            }

            let mut page = self.client.fetch_next_page(current).await?;
            pages += 1;
            tracing::debug!(
                page = pages,
                entries = page.entry.len(),
                "Got the next bundle"
            );

            aggregated.entry.append(&mut page.entry);
            partial = Some(page);
        }

        if let Some(total) = aggregated.total
            && total as usize != aggregated.entry.len()
        {
            tracing::error!(
                expected = total,
                actual = aggregated.entry.len(),
                pages = pages,
                "Counts didn't match! The aggregated bundle does not hold the declared total"
            );
        }

        aggregated.link.clear();

        Ok(aggregated)
    }
}

/// Shorthand for `BundleFetcher::starting_with(client, starting_page).fetch_all()`
pub async fn fetch_all<C: SearchClient>(client: &C, starting_page: &Bundle) -> Result<Bundle> {
    BundleFetcher::starting_with(client, starting_page)
        .fetch_all()
        .await
}
