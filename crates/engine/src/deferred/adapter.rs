use std::sync::OnceLock;

use futures_util::{
    FutureExt,
    future::{BoxFuture, join_all},
};

/// Drives a batch of tasks to completion.
///
/// The executor hands every sibling field and list item to the adapter at once, each task writing
/// its own result slot. Adapters decide how the tasks are scheduled but must poll all of them to
/// completion.
pub trait PromiseAdapter: Send + Sync {
    fn all<'a>(&self, tasks: Vec<BoxFuture<'a, ()>>) -> BoxFuture<'a, ()>;
}

/// Runs tasks one after the other, in the order they were given.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncPromiseAdapter;

impl PromiseAdapter for SyncPromiseAdapter {
    fn all<'a>(&self, tasks: Vec<BoxFuture<'a, ()>>) -> BoxFuture<'a, ()> {
        async move {
            for task in tasks {
                task.await;
            }
        }
        .boxed()
    }
}

/// Polls all tasks together, letting slow resolvers overlap.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConcurrentPromiseAdapter;

impl PromiseAdapter for ConcurrentPromiseAdapter {
    fn all<'a>(&self, tasks: Vec<BoxFuture<'a, ()>>) -> BoxFuture<'a, ()> {
        join_all(tasks).map(|_| ()).boxed()
    }
}

/// Runs `futures` through the adapter and returns their outputs in input order.
///
/// A slot is `None` when the adapter returned without completing its task.
pub(crate) async fn join_in_order<'a, T>(adapter: &dyn PromiseAdapter, futures: Vec<BoxFuture<'a, T>>) -> Vec<Option<T>>
where
    T: Send + Sync + 'a,
{
    let slots = std::iter::repeat_with(OnceLock::new)
        .take(futures.len())
        .collect::<Vec<OnceLock<T>>>();

    let tasks = futures
        .into_iter()
        .zip(&slots)
        .map(|(future, slot)| {
            async move {
                let _ = slot.set(future.await);
            }
            .boxed()
        })
        .collect();

    adapter.all(tasks).await;

    let results = slots.into_iter().map(OnceLock::into_inner).collect::<Vec<_>>();
    let unsettled = results.iter().filter(|result| result.is_none()).count();
    if unsettled > 0 {
        tracing::warn!(unsettled, "promise adapter returned before every task settled");
    }

    results
}
