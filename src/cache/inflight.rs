//! Coalescing of concurrent fetches for the same term.
//!
//! The first miss for a term registers a shared future under that term;
//! later misses that arrive while it is pending await the same future
//! instead of issuing their own upstream call. The registration is removed
//! once the fetch completes, so a failed fetch is never replayed to later
//! requests. A registration that has finished but not yet been removed is
//! treated as absent and replaced by a fresh fetch.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::future::Future;

use crate::error::ProxyResult;

type SharedFetch = Shared<BoxFuture<'static, ProxyResult<String>>>;

/// Result of [`InFlight::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightOutcome {
    pub result: ProxyResult<String>,
    /// `true` when this caller awaited a fetch started by another request.
    pub joined: bool,
}

/// Registry of fetches currently in progress, keyed by raw term.
#[derive(Default)]
pub struct InFlight {
    pending: DashMap<String, SharedFetch>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` for `term`, or join the fetch already running for it.
    ///
    /// `fetch` is only invoked when no unfinished fetch for the term exists.
    pub async fn run<F, Fut>(&self, term: &str, fetch: F) -> FlightOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProxyResult<String>> + Send + 'static,
    {
        let (shared, joined) = match self.pending.entry(term.to_string()) {
            Entry::Occupied(entry) if entry.get().peek().is_none() => {
                tracing::debug!(term = %term, "Joining in-flight fetch");
                (entry.get().clone(), true)
            }
            Entry::Occupied(mut entry) => {
                let fut = fetch().boxed().shared();
                entry.insert(fut.clone());
                (fut, false)
            }
            Entry::Vacant(entry) => {
                let fut = fetch().boxed().shared();
                entry.insert(fut.clone());
                (fut, false)
            }
        };

        let result = shared.clone().await;
        self.pending.remove_if(term, |_, pending| pending.ptr_eq(&shared));
        FlightOutcome { result, joined }
    }
}
