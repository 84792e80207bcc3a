use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Fixed-interval gate between outbound catalog requests.
/// Shared by reference, so parallel callers would still be paced together.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// A limiter that never waits
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Block until `min_interval` has passed since the previous call.
    /// Returns how long it slept.
    pub fn wait(&self) -> Duration {
        if self.min_interval.is_zero() {
            return Duration::ZERO;
        }

        // A poisoned lock only means another caller panicked mid-wait
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut slept = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                slept = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {slept:?}");
                std::thread::sleep(slept);
            }
        }

        *last = Some(Instant::now());
        slept
    }
}

/// Early-abort signal for the catalog lookup loop: an explicit cancel flag,
/// an optional deadline, or both
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl AbortHandle {
    /// Never aborts unless `cancel` is called
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Clones share the flag, so any clone may cancel
    #[cfg(test)]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_limiter_never_sleeps() {
        let limiter = RateLimiter::disabled();
        for _ in 0..5 {
            assert_eq!(limiter.wait(), Duration::ZERO);
        }
    }

    #[test]
    fn test_first_call_passes_immediately() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        assert_eq!(limiter.wait(), Duration::ZERO);
    }

    #[test]
    fn test_back_to_back_calls_are_spaced() {
        let interval = Duration::from_millis(20);
        let limiter = RateLimiter::new(interval);
        let start = Instant::now();
        limiter.wait();
        limiter.wait();
        limiter.wait();
        assert!(start.elapsed() >= interval * 2);
    }

    #[test]
    fn test_shared_limiter_paces_threads_together() {
        let interval = Duration::from_millis(10);
        let limiter = Arc::new(RateLimiter::new(interval));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || {
                    limiter.wait();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(start.elapsed() >= interval * 3);
    }

    #[test]
    fn test_abort_handle_cancel_is_shared() {
        let handle = AbortHandle::new();
        let clone = handle.clone();
        assert!(!handle.is_aborted());
        clone.cancel();
        assert!(handle.is_aborted());
    }

    #[test]
    fn test_abort_handle_deadline() {
        assert!(AbortHandle::with_deadline(Instant::now()).is_aborted());
        assert!(!AbortHandle::with_timeout(Duration::from_secs(3600)).is_aborted());
    }
}
