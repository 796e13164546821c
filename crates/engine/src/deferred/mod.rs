//! Values that are either already settled or still being computed.

mod adapter;

use std::future::{Future, IntoFuture};

use futures_util::{
    FutureExt,
    future::{BoxFuture, Either, Ready, ready},
};

pub use adapter::{ConcurrentPromiseAdapter, PromiseAdapter, SyncPromiseAdapter};
pub(crate) use adapter::join_in_order;

use crate::Error;

/// The outcome of a resolver: ready right away or pending on some asynchronous work.
///
/// A ready value never touches an executor, so purely synchronous schemas resolve in a single
/// pass. Every combinator consumes the value, which settles exactly once.
#[must_use]
pub enum Deferred<'a, T> {
    Ready(Result<T, Error>),
    Pending(BoxFuture<'a, Result<T, Error>>),
}

impl<'a, T: Send + 'a> Deferred<'a, T> {
    pub fn resolved(value: T) -> Self {
        Deferred::Ready(Ok(value))
    }

    pub fn rejected(error: impl Into<Error>) -> Self {
        Deferred::Ready(Err(error.into()))
    }

    /// Settles with whatever `f` returns.
    pub fn from_fn(f: impl FnOnce() -> Result<T, Error>) -> Self {
        Deferred::Ready(f())
    }

    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, Error>> + Send + 'a,
    {
        Deferred::Pending(future.boxed())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Deferred::Ready(_))
    }

    /// The settlement if already available, the deferred itself otherwise.
    pub fn into_ready(self) -> Result<Result<T, Error>, Self> {
        match self {
            Deferred::Ready(result) => Ok(result),
            pending => Err(pending),
        }
    }

    pub fn then<U, F>(self, on_resolved: F) -> Deferred<'a, U>
    where
        U: Send + 'a,
        F: FnOnce(T) -> Result<U, Error> + Send + 'a,
    {
        self.then_or_else(on_resolved, Err)
    }

    pub fn catch<F>(self, on_rejected: F) -> Self
    where
        F: FnOnce(Error) -> Result<T, Error> + Send + 'a,
    {
        self.then_or_else(Ok, on_rejected)
    }

    pub fn then_or_else<U, F, G>(self, on_resolved: F, on_rejected: G) -> Deferred<'a, U>
    where
        U: Send + 'a,
        F: FnOnce(T) -> Result<U, Error> + Send + 'a,
        G: FnOnce(Error) -> Result<U, Error> + Send + 'a,
    {
        let settle = move |result: Result<T, Error>| match result {
            Ok(value) => on_resolved(value),
            Err(error) => on_rejected(error),
        };

        match self {
            Deferred::Ready(result) => Deferred::Ready(settle(result)),
            Deferred::Pending(future) => Deferred::Pending(future.map(settle).boxed()),
        }
    }

    /// Chains another deferred computation on success.
    pub fn and_then<U, F>(self, on_resolved: F) -> Deferred<'a, U>
    where
        U: Send + 'a,
        F: FnOnce(T) -> Deferred<'a, U> + Send + 'a,
    {
        match self {
            Deferred::Ready(Ok(value)) => on_resolved(value),
            Deferred::Ready(Err(error)) => Deferred::Ready(Err(error)),
            Deferred::Pending(future) => Deferred::from_future(async move { on_resolved(future.await?).await }),
        }
    }

    /// Blocks the current thread until the value settles.
    pub fn wait(self) -> Result<T, Error> {
        match self {
            Deferred::Ready(result) => result,
            Deferred::Pending(future) => futures::executor::block_on(future),
        }
    }

    /// Waits for every item, keeping each outcome in its original position.
    pub fn all(adapter: &'a dyn PromiseAdapter, items: Vec<Deferred<'a, T>>) -> Deferred<'a, Vec<Result<T, Error>>>
    where
        T: Sync,
    {
        if items.iter().all(Deferred::is_ready) {
            let results = items
                .into_iter()
                .filter_map(|item| item.into_ready().ok())
                .collect();
            return Deferred::resolved(results);
        }

        Deferred::from_future(async move {
            let futures = items.into_iter().map(|item| item.into_future().boxed()).collect();

            let results = join_in_order(adapter, futures)
                .await
                .into_iter()
                .map(|slot| slot.unwrap_or_else(|| Err(Error::internal("promise adapter left a task unsettled"))))
                .collect();

            Ok(results)
        })
    }
}

impl<'a, T: Send + 'a> IntoFuture for Deferred<'a, T> {
    type Output = Result<T, Error>;
    type IntoFuture = Either<Ready<Result<T, Error>>, BoxFuture<'a, Result<T, Error>>>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Deferred::Ready(result) => Either::Left(ready(result)),
            Deferred::Pending(future) => Either::Right(future),
        }
    }
}

impl<'a, T: Send + 'a> From<Result<T, Error>> for Deferred<'a, T> {
    fn from(result: Result<T, Error>) -> Self {
        Deferred::Ready(result)
    }
}
