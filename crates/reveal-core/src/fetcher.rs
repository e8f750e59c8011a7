//! Routing provider abstraction.

use futures::future::BoxFuture;
use std::time::Duration;

use crate::error::RouteError;
use crate::models::{RouteRequest, RouteResult};

/// A remote routing call that yields a single route or a typed failure.
///
/// Implementations must honour `timeout` themselves so a caller can never
/// hang on a provider that stops answering.
pub trait RouteFetcher: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &str;

    fn fetch<'a>(
        &'a self,
        request: &'a RouteRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RouteResult, RouteError>>;
}

/// Fetch through `fetcher`, converting an elapsed deadline into `RouteError::Timeout`.
pub async fn fetch_with_deadline(
    fetcher: &dyn RouteFetcher,
    request: &RouteRequest,
    timeout: Duration,
) -> Result<RouteResult, RouteError> {
    match crate::timeout::await_with_timeout(fetcher.fetch(request, timeout), timeout).await {
        Ok(result) => result,
        Err(_) => Err(RouteError::Timeout(timeout)),
    }
}
