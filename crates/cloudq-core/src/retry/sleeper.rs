//! Blocking sleep abstraction so the retry loop can be observed in tests.

use std::sync::Mutex;
use std::time::Duration;

/// Suspends the calling thread between attempts.
pub trait Sleeper {
    fn sleep(&self, delay: Duration);
}

/// Sleeps on the current thread with [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct TrackingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl TrackingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays requested so far, in order.
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Sleeper for TrackingSleeper {
    fn sleep(&self, delay: Duration) {
        self.slept
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(delay);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, delay: Duration) {
        (**self).sleep(delay);
    }
}
