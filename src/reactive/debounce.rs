//! Debouncing of rapidly changing values.

use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::trace;

/// A value waiting for its delay to elapse.
#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Delays propagation of a value until it has been stable for `delay`.
///
/// The output starts out equal to the initial input. Each pushed value restarts
/// the delay and replaces whatever was pending. Nothing propagates after
/// [`Debouncer::cancel`] or once the debouncer is dropped.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    value: T,
    pending: Option<Pending<T>>,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            delay,
            value: initial,
            pending: None,
        }
    }

    /// Returns the debounced output.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Returns the most recent input, pending or not.
    pub fn input(&self) -> &T {
        self.pending
            .as_ref()
            .map(|p| &p.value)
            .unwrap_or(&self.value)
    }

    /// Returns when the pending value is due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Feeds a new input at `now`. Returns false if it equals the latest input.
    pub fn push(&mut self, value: T, now: Instant) -> bool {
        if *self.input() == value {
            return false;
        }
        let deadline = now + self.delay;
        trace!(delay_ms = self.delay.as_millis() as u64, "debounce timer restarted");
        self.pending = Some(Pending { value, deadline });
        true
    }

    /// Commits the pending value if its deadline has passed and returns it.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| p.deadline <= now);
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        self.value = pending.value;
        Some(self.value.clone())
    }

    /// Waits on the tokio timer for the pending value and commits it.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        time::sleep_until(deadline).await;
        self.poll(deadline)
    }

    /// Drops the pending value without propagating it.
    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            trace!("pending debounce cancelled");
        }
    }
}
