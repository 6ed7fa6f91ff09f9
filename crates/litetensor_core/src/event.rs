//! Completion events and the event tree that waits on them.
//!
//! An [`Event`] marks a point in the work submitted to one target. An
//! [`EventTree`] collects events from any number of targets and
//! [`sync`](EventTree::sync) blocks until every one of them has completed,
//! routing each wait to the backend of the event's target.

#[cfg(feature = "cuda")]
use crate::backend::cuda::CudaEvent;
#[cfg(feature = "mps")]
use crate::backend::mps::MpsEvent;
use crate::{backend::backend, error::Result, target::Target};
use std::{
    fmt,
    sync::{Arc, Condvar, Mutex, PoisonError},
};
use tracing::debug;

/// A completion flag signaled from host code and waitable from any thread.
///
/// Clones share the same flag.
#[derive(Clone, Default)]
pub struct HostEvent {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl HostEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signaled() -> Self {
        let event = Self::new();
        event.signal();
        event
    }

    pub fn signal(&self) {
        let (done, cvar) = &*self.state;
        *done.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_signaled(&self) -> bool {
        *self.state.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks the calling thread until [`signal`](Self::signal) is called.
    pub fn wait(&self) {
        let (done, cvar) = &*self.state;
        let mut guard = done.lock().unwrap_or_else(PoisonError::into_inner);
        while !*guard {
            guard = cvar.wait(guard).unwrap_or_else(PoisonError::into_inner);
        }
    }
}

impl fmt::Debug for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostEvent").field("signaled", &self.is_signaled()).finish()
    }
}

#[derive(Clone)]
pub enum EventHandle {
    Host(HostEvent),
    #[cfg(feature = "cuda")]
    Cuda(Arc<CudaEvent>),
    #[cfg(feature = "mps")]
    Mps(MpsEvent),
}

impl EventHandle {
    fn kind(&self) -> &'static str {
        match self {
            Self::Host(_) => "host",
            #[cfg(feature = "cuda")]
            Self::Cuda(_) => "cuda",
            #[cfg(feature = "mps")]
            Self::Mps(_) => "mps",
        }
    }
}

/// A target-tagged completion event. Cloning copies the handle, not the
/// underlying device event.
#[derive(Clone)]
pub struct Event {
    target: Target,
    handle: EventHandle,
}

impl Event {
    pub fn new(target: Target, handle: EventHandle) -> Self {
        Self { target, handle }
    }

    /// Host event completing when `event` is signaled.
    pub fn host(event: &HostEvent) -> Self {
        Self::new(Target::Host, EventHandle::Host(event.clone()))
    }

    /// Host event that has already completed.
    pub fn completed() -> Self {
        Self::new(Target::Host, EventHandle::Host(HostEvent::signaled()))
    }

    /// Records an event on `target` after all work submitted to it so far.
    pub fn record(target: Target) -> Result<Self> {
        backend(target).record_event(target)
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn handle(&self) -> &EventHandle {
        &self.handle
    }

    /// Polls the event without blocking.
    pub fn is_complete(&self) -> Result<bool> {
        backend(self.target).query_event(self)
    }

    /// Blocks until the event completes.
    pub fn sync(&self) -> Result<()> {
        backend(self.target).sync_event(self)
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("target", &self.target)
            .field("kind", &self.handle.kind())
            .finish()
    }
}

/// Collects completion events across targets for one scheduling epoch.
#[derive(Debug, Clone, Default)]
pub struct EventTree {
    children: Vec<Event>,
}

impl EventTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&mut self, event: Event) {
        self.children.push(event);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.children.iter()
    }

    /// Waits on every collected event in insertion order. The first failing
    /// wait is returned and the remaining events are not waited on.
    pub fn sync(&self) -> Result<()> {
        if self.children.is_empty() {
            return Ok(());
        }
        debug!(events = self.children.len(), "synchronizing event tree");
        for event in &self.children {
            backend(event.target()).sync_event(event)?;
        }
        Ok(())
    }
}

impl Extend<Event> for EventTree {
    fn extend<I: IntoIterator<Item = Event>>(&mut self, iter: I) {
        self.children.extend(iter);
    }
}

impl FromIterator<Event> for EventTree {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventTree {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
