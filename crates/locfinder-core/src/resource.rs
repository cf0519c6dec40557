//! Lifecycle state for one asynchronously acquired resource.
//!
//! Each of the location, weather and AI flows owns one [`SharedResource`].
//! The presentation layer reads snapshots of it while the flow drives the
//! transitions: `Idle -> Loading -> Ready | Failed`, with `reset` returning
//! to `Idle` from anywhere.
//!
//! Triggers are not single-flight: a second `begin` while loading is
//! accepted and the caller is expected to disable its trigger control.
//! Every `begin` issues a new generation, and a settle carrying an older
//! ticket is dropped so a slow stale response never overwrites a newer one.

use std::fmt::Display;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::UNKNOWN_ERROR;

/// Observable state of a resource. Exactly one variant holds at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        ResourceState::Idle
    }
}

impl<T> ResourceState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, ResourceState::Idle)
    }

    /// True only between an accepted trigger and its settle.
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ResourceState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ResourceState::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ResourceState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResourceState::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Handle for one accepted trigger; pass it back to [`SharedResource::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Inner<T> {
    state: ResourceState<T>,
    generation: u64,
}

/// A resource state cell shared between a flow and its observers.
#[derive(Debug)]
pub struct SharedResource<T> {
    name: &'static str,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for SharedResource<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedResource<T> {
    /// Create an idle resource. `name` is used in log output only.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                state: ResourceState::Idle,
                generation: 0,
            })),
        }
    }

    /// Enter `Loading`, dropping any previous value or error.
    pub fn begin(&self) -> Ticket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = ResourceState::Loading;
        tracing::debug!(resource = self.name, generation = inner.generation, "loading");
        Ticket {
            generation: inner.generation,
        }
    }

    /// Record a validation failure without passing through `Loading`.
    ///
    /// Any trigger still in flight is superseded.
    pub fn fail_fast(&self, message: impl Into<String>) {
        let message = normalize_message(message.into());
        let mut inner = self.inner.lock();
        inner.generation += 1;
        tracing::debug!(resource = self.name, %message, "rejected before loading");
        inner.state = ResourceState::Failed(message);
    }

    /// Settle the trigger identified by `ticket`.
    ///
    /// Returns `false` (and leaves the state untouched) when a newer trigger
    /// or a reset has happened since `ticket` was issued.
    pub fn settle<E: Display>(&self, ticket: Ticket, result: Result<T, E>) -> bool {
        let mut inner = self.inner.lock();
        if ticket.generation != inner.generation {
            tracing::debug!(
                resource = self.name,
                stale = ticket.generation,
                latest = inner.generation,
                "discarding stale result"
            );
            return false;
        }

        inner.state = match result {
            Ok(value) => ResourceState::Ready(value),
            Err(e) => {
                let message = normalize_message(e.to_string());
                tracing::debug!(resource = self.name, %message, "failed");
                ResourceState::Failed(message)
            }
        };
        true
    }

    /// Return to `Idle`, discarding value, error and outstanding tickets.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.state = ResourceState::Idle;
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().state.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.inner.lock().state.error().map(str::to_owned)
    }
}

impl<T: Clone> SharedResource<T> {
    pub fn snapshot(&self) -> ResourceState<T> {
        self.inner.lock().state.clone()
    }

    pub fn value(&self) -> Option<T> {
        self.inner.lock().state.value().cloned()
    }
}

fn normalize_message(message: String) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
