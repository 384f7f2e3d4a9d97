use futures::{
  future::{join_all, try_join_all},
  stream::{self, StreamExt, TryStreamExt},
  Future,
};

// Runs all futures concurrently, with at most `limit` of them in flight
// (`None` for no limit), and collects their outputs in input order no
// matter which one finishes first.
//
// The first error is returned as soon as it happens and the futures still
// pending are dropped, so a failure never yields a partial list.
pub async fn try_join_ordered<A, E>(
  futs: Vec<impl Future<Output = Result<A, E>>>,
  limit: Option<usize>,
) -> Result<Vec<A>, E> {
  match limit {
    None => try_join_all(futs).await,
    Some(limit) => {
      stream::iter(futs)
        .buffered(limit.max(1))
        .try_collect()
        .await
    }
  }
}

// Same as `try_join_ordered`, but keeps going after failures and hands
// every outcome back, still in input order.
pub async fn join_ordered<T>(
  futs: Vec<impl Future<Output = T>>,
  limit: Option<usize>,
) -> Vec<T> {
  match limit {
    None => join_all(futs).await,
    Some(limit) => stream::iter(futs).buffered(limit.max(1)).collect().await,
  }
}
