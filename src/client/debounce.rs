use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Single-slot debounce register.
///
/// At most one scheduled task is pending at a time. Scheduling replaces the
/// pending task; once a task's delay elapses its work is detached, so later
/// scheduling never cancels a request already in flight.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `work` after the delay unless something else is scheduled first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = tokio::time::Instant::now() + self.delay;
        let mut pending = self.lock();
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tokio::spawn(work);
        }));
    }

    /// Drop the pending task, if it has not fired yet.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock().take() {
            previous.abort();
        }
    }

    /// Whether a task is waiting out its delay.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    fn counter_work(
        counter: &Arc<AtomicUsize>,
        value: usize,
    ) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    async fn settle() {
        // Let spawned tasks observe the advanced clock.
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_after_delay() {
        let debouncer = Debouncer::new(DELAY);
        let seen = Arc::new(AtomicUsize::new(0));
        assert_eq!(debouncer.delay(), DELAY);

        debouncer.schedule(counter_work(&seen, 1));
        tokio::time::advance(Duration::from_millis(299)).await;
        settle().await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::advance(Duration::from_millis(1)).await;
        settle().await;
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_pending() {
        let debouncer = Debouncer::new(DELAY);
        let seen = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        for value in 1..=3 {
            let runs = Arc::clone(&runs);
            let work = counter_work(&seen, value);
            debouncer.schedule(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                work.await;
            });
            tokio::time::advance(Duration::from_millis(100)).await;
            settle().await;
        }

        tokio::time::advance(DELAY).await;
        settle().await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending() {
        let debouncer = Debouncer::new(DELAY);
        let seen = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_work(&seen, 7));
        debouncer.cancel();
        tokio::time::advance(DELAY * 2).await;
        settle().await;

        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn fired_work_survives_rescheduling() {
        let debouncer = Debouncer::new(DELAY);
        let done = Arc::new(AtomicUsize::new(0));

        let slow = {
            let done = Arc::clone(&done);
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                done.fetch_add(1, Ordering::SeqCst);
            }
        };
        debouncer.schedule(slow);
        tokio::time::advance(DELAY).await;
        settle().await;

        // The first task is in flight; a new schedule must not abort it.
        debouncer.schedule(async {});
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;

        assert_eq!(done.load(Ordering::SeqCst), 1);
    }
}
