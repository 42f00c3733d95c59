// SPDX-License-Identifier: MIT
//
// Backend configuration.
//
// Plain data with sensible defaults. Backends read what they need and
// ignore the rest: the terminal backend only cares about the queue sizing,
// the toolkit backend also uses the launch-wait timing and the title.

use std::time::Duration;

use crate::queue::{DEFAULT_CAPACITY, DEFAULT_GROWTH};

/// Configuration shared by every window backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Initial event queue capacity (slots).
    pub queue_capacity: usize,
    /// Slots added each time the event queue fills up.
    pub queue_growth: usize,
    /// Sleep between checks while waiting for the native toolkit to
    /// finish launching.
    pub launch_poll_interval: Duration,
    /// How long the launch wait may take before a warning is logged.
    ///
    /// The wait itself is not bounded: after the warning it keeps
    /// polling until the toolkit reports that it has launched.
    pub launch_warn_after: Duration,
    /// Initial window title.
    pub title: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_CAPACITY,
            queue_growth: DEFAULT_GROWTH,
            launch_poll_interval: Duration::from_millis(10),
            launch_warn_after: Duration::from_secs(5),
            title: String::from("halfblock"),
        }
    }
}
