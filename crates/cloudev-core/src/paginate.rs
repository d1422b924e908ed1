// ── Paginated listings as lazy streams ──
//
// A `Paginator` turns "fetch one page for this request" into a stream of
// item batches, one batch per page. Pages of a single listing are fetched
// strictly one after another and yielded in server order. Streams are built
// fresh on every call, so a listing can be replayed from the first page.

use std::fmt;
use std::future::Future;

use async_stream::stream;
use cloudev_api::{Operation, PagedRequest, PagedResponse};
use futures_util::stream::{self, BoxStream, StreamExt};
use tracing::{trace, warn};

/// A lazy sequence of item batches.
pub type Batches<T> = BoxStream<'static, Vec<T>>;

/// A lazy sequence of item batches that ends with the first error.
pub type TryBatches<T, E> = BoxStream<'static, Result<Vec<T>, E>>;

/// Drives a paged listing.
///
/// `fetch` is called with the current request; its response supplies the
/// items and, if present and non-empty, the continuation token for the next
/// call.
pub struct Paginator<Req, F> {
    operation: Operation,
    request: Req,
    fetch: F,
}

impl<Req, F, Fut, Resp, E> Paginator<Req, F>
where
    Req: PagedRequest,
    F: Fn(Req) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, E>> + Send + 'static,
    Resp: PagedResponse + Send + 'static,
    Resp::Item: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    pub fn new(operation: Operation, request: Req, fetch: F) -> Self {
        Self {
            operation,
            request,
            fetch,
        }
    }

    /// Strict listing: a failed page fetch is yielded as `Err` and ends the
    /// stream.
    pub fn try_pages(&self) -> TryBatches<Resp::Item, E> {
        let operation = self.operation;
        let fetch = self.fetch.clone();
        let mut request = self.request.clone();

        Box::pin(stream! {
            let mut page = 0_u32;
            loop {
                page += 1;
                trace!(%operation, page, "fetching page");
                match fetch(request.clone()).await {
                    Ok(resp) => {
                        let next = resp.next_token().map(str::to_owned);
                        yield Ok(resp.into_items());
                        let Some(token) = next else { break };
                        request.set_next_token(Some(token));
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        })
    }

    /// Fail-soft listing: a failed page fetch is logged, replaced by an empty
    /// batch, and ends the stream. Batches already yielded stand.
    pub fn pages(&self) -> Batches<Resp::Item> {
        let operation = self.operation;
        let mut strict = self.try_pages();

        Box::pin(stream! {
            while let Some(page) = strict.next().await {
                match page {
                    Ok(items) => yield items,
                    Err(e) => {
                        warn!(%operation, error = %e, "listing failed, ending early");
                        yield Vec::new();
                        break;
                    }
                }
            }
        })
    }

    /// Fail-soft listing, flattened to single items.
    pub fn items(&self) -> BoxStream<'static, Resp::Item> {
        self.pages().flat_map(stream::iter).boxed()
    }
}

/// For every item of `outer`, run the listing `f` builds from it and merge
/// the results.
///
/// Inner listings run concurrently; batches from different inner listings
/// may interleave in any order. Within one inner listing, order is kept.
pub fn map_inner<T, U, F>(outer: Batches<T>, f: F) -> Batches<U>
where
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Batches<U> + Send + 'static,
{
    outer
        .flat_map(stream::iter)
        .flat_map_unordered(None, f)
        .boxed()
}
