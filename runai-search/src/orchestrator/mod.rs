//! Search orchestration: bounded fan-out and chained two-phase lookup.
//!
//! Both searchers dispatch one future per query under a counting semaphore
//! and collect outcomes positionally, so output order always equals input
//! order regardless of completion order.

pub mod chained;
pub mod fanout;

use crate::types::SearchOutcome;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Drive every future to completion and collect outcomes in input order.
///
/// A panic inside one future becomes a [`SearchOutcome::Failure`] for that
/// position; siblings keep running.
pub(crate) async fn gather<I, F>(futures: I) -> Vec<SearchOutcome>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = SearchOutcome>,
{
    let guarded = futures.into_iter().map(|fut| async move {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(panic = %message, "query task panicked");
                SearchOutcome::Failure(format!("query task panicked: {message}"))
            }
        }
    });
    futures::future::join_all(guarded).await
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn gather_keeps_input_order_when_completion_is_reversed() {
        let futures = (0..5u64).map(|i| async move {
            tokio::time::sleep(Duration::from_millis(100 - i * 20)).await;
            SearchOutcome::Success(i.to_string())
        });
        let outcomes = gather(futures).await;
        let texts: Vec<String> = outcomes
            .into_iter()
            .map(|o| match o {
                SearchOutcome::Success(s) | SearchOutcome::Failure(s) => s,
            })
            .collect();
        assert_eq!(texts, vec!["0", "1", "2", "3", "4"]);
    }

    async fn exploding_query() -> SearchOutcome {
        panic!("provider stub exploded")
    }

    #[tokio::test]
    async fn gather_converts_panics_to_failures() {
        let futures: Vec<std::pin::Pin<Box<dyn Future<Output = SearchOutcome> + Send>>> = vec![
            Box::pin(async { SearchOutcome::Success("ok".into()) }),
            Box::pin(exploding_query()),
            Box::pin(async { SearchOutcome::Success("also ok".into()) }),
        ];
        let outcomes = gather(futures).await;
        assert_eq!(outcomes[0], SearchOutcome::Success("ok".into()));
        assert!(matches!(
            &outcomes[1],
            SearchOutcome::Failure(m) if m.contains("provider stub exploded")
        ));
        assert_eq!(outcomes[2], SearchOutcome::Success("also ok".into()));
    }
}
