// SPDX-License-Identifier: MIT
//
// Event queue — the one hand-off point between the producing context and
// the frame loop.
//
// Producers (a toolkit dispatch thread, or the terminal poll step) call
// `push`; the frame loop calls `pull` until it sees `None`. A single mutex
// guards the backing `VecDeque`, held for exactly one deque operation per
// call, so the lock is never held across application code.
//
// Growth is explicit: when the deque is full we reserve a fixed increment
// before appending. Nothing is ever dropped or overwritten. If the
// allocator refuses the growth the process aborts.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::BackendConfig;
use crate::event::Event;

/// Initial number of event slots.
pub const DEFAULT_CAPACITY: usize = 20;

/// Number of slots added each time the queue fills up.
pub const DEFAULT_GROWTH: usize = 20;

/// Thread-safe, insertion-ordered queue of canonical events.
///
/// Share it between producer and consumer as `Arc<EventQueue>`.
///
/// # Example
///
/// ```
/// use hb_core::event::Event;
/// use hb_core::queue::EventQueue;
///
/// let queue = EventQueue::new();
/// queue.push(Event::WindowRedrawNeeded);
/// queue.push(Event::WindowClosing);
///
/// assert_eq!(queue.pull(), Some(Event::WindowRedrawNeeded));
/// assert_eq!(queue.pull(), Some(Event::WindowClosing));
/// assert_eq!(queue.pull(), None);
/// ```
#[derive(Debug)]
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
    growth: usize,
}

impl EventQueue {
    /// Create a queue with the default capacity and growth increment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, DEFAULT_GROWTH)
    }

    /// Create a queue with `capacity` initial slots, growing by `growth`.
    ///
    /// A zero growth increment is bumped to 1 so a full queue can always grow.
    #[must_use]
    pub fn with_capacity(capacity: usize, growth: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            growth: growth.max(1),
        }
    }

    /// Create a queue sized from a backend configuration.
    #[must_use]
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::with_capacity(config.queue_capacity, config.queue_growth)
    }

    /// Append an event at the back of the queue.
    ///
    /// Grows the backing store first if it is full. Aborts the process if
    /// that allocation fails.
    pub fn push(&self, event: Event) {
        let mut events = self.lock();
        if events.len() == events.capacity() {
            let growth = self.growth;
            if let Err(err) = events.try_reserve_exact(growth) {
                tracing::error!(
                    len = events.len(),
                    growth,
                    "event queue growth failed ({err}), aborting"
                );
                std::process::abort();
            }
        }
        events.push_back(event);
    }

    /// Remove and return the oldest event, or `None` if the queue is empty.
    pub fn pull(&self) -> Option<Event> {
        self.lock().pop_front()
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no events are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current number of slots in the backing store.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Lock the deque. A poisoned lock is still consistent: every critical
    /// section is a single deque call.
    fn lock(&self) -> MutexGuard<'_, VecDeque<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
