//! Cooperative deadlines and cancellation.
//!
//! Every solver receives a [`Deadline`] and polls [`Deadline::expired`] at its
//! loop heads and recursive entries. The scheduler keeps a clone of the
//! [`CancelToken`] so it can stop a solver from the outside once its hard
//! deadline has passed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once [`CancelToken::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A time budget that started when it was created.
#[derive(Clone, Debug)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
    token: CancelToken,
}

impl Deadline {
    /// Starts a budget of `limit` tied to `token`.
    #[must_use]
    pub fn new(limit: Duration, token: CancelToken) -> Self {
        Self {
            started: Instant::now(),
            limit,
            token,
        }
    }

    /// Starts a budget of `limit` with a private token.
    #[must_use]
    pub fn after(limit: Duration) -> Self {
        Self::new(limit, CancelToken::new())
    }

    /// The configured budget.
    #[must_use]
    pub const fn limit(&self) -> Duration {
        self.limit
    }

    /// Time spent since the budget started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, saturating at zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.limit.saturating_sub(self.elapsed())
    }

    /// The token this deadline observes.
    #[must_use]
    pub const fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Returns true if the budget is spent or cancellation was requested.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.token.is_cancelled() || self.elapsed() > self.limit
    }
}
