//! Paged submission of bulk writes

use std::future::Future;

use tracing::debug;

/// Submit `items` in contiguous pages of at most `page_size`, in order.
///
/// Stops at the first failing page and returns its error; pages already
/// written are not rolled back. An empty slice submits nothing. Returns the
/// number of pages submitted.
pub async fn submit_in_pages<'a, T, F, Fut, E>(
    items: &'a [T],
    page_size: usize,
    mut submit: F,
) -> Result<usize, E>
where
    F: FnMut(&'a [T]) -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut submitted = 0;

    for (index, page) in items.chunks(page_size.max(1)).enumerate() {
        debug!(page = index + 1, len = page.len(), "submitting page");
        submit(page).await?;
        submitted += 1;
    }

    Ok(submitted)
}
