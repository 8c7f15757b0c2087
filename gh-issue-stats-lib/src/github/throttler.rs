use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};

/// Limits concurrency, spaces out request dispatch, and supports temporary pausing.
///
/// Call [`Throttler::acquire`] before each request. At most `max_concurrent` requests are in
/// flight at once, and consecutive dispatches are at least `min_interval` apart. Any task can
/// call [`Throttler::pause_for`] to halt dispatch until a rate limit resets.
///
/// When multiple tasks call [`Throttler::pause_for`] concurrently, the longest pause wins.
#[derive(Debug)]
pub struct Throttler {
    semaphore: Arc<Semaphore>,
    min_interval: Duration,
    next_dispatch: tokio::sync::Mutex<Option<tokio::time::Instant>>,
    paused: AtomicBool,
    resume: Notify,
    resume_at: Mutex<Option<Instant>>,
}

impl Throttler {
    /// Minimum extension required for a new pause to override an active one, so concurrent
    /// tasks that saw the same reset time don't each re-establish the pause.
    const MIN_PAUSE_EXTENSION: Duration = Duration::from_secs(1);

    pub fn new(max_concurrent: usize, min_interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            min_interval,
            next_dispatch: tokio::sync::Mutex::new(None),
            paused: AtomicBool::new(false),
            resume: Notify::new(),
            resume_at: Mutex::new(None),
        })
    }

    /// Wait until unpaused and spaced from the previous dispatch, then take a concurrency slot.
    ///
    /// The returned permit must be held for the duration of the request.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        loop {
            // registered before the check so a resume between the two is not lost
            let resumed = self.resume.notified();
            if self.is_paused() {
                resumed.await;
                continue;
            }
            drop(resumed);

            let permit = Arc::clone(&self.semaphore)
                .acquire_owned()
                .await
                .expect("semaphore is never closed");

            self.wait_for_dispatch_slot().await;

            // a pause may have started while this task was waiting
            if self.is_paused() {
                drop(permit);
                continue;
            }

            return permit;
        }
    }

    async fn wait_for_dispatch_slot(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut next = self.next_dispatch.lock().await;
        let now = tokio::time::Instant::now();
        let slot = next.map_or(now, |n| n.max(now));
        *next = Some(slot + self.min_interval);
        drop(next);

        tokio::time::sleep_until(slot).await;
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause dispatching for `duration`, then automatically resume.
    ///
    /// Requests already in flight are not interrupted. Returns `true` only when a new pause is
    /// actually established, `false` if an equivalent or longer pause is already active.
    pub fn pause_for(self: &Arc<Self>, duration: Duration) -> bool {
        let new_resume_at = Instant::now() + duration;

        {
            let mut guard = self.resume_at.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.is_some_and(|existing| existing + Self::MIN_PAUSE_EXTENSION >= new_resume_at) {
                return false;
            }
            *guard = Some(new_resume_at);
        }

        self.paused.store(true, Ordering::Release);
        let this = Arc::clone(self);
        drop(tokio::spawn(async move {
            tokio::time::sleep(duration).await;

            let should_resume = {
                let mut guard = this.resume_at.lock().unwrap_or_else(PoisonError::into_inner);
                if guard.is_some_and(|t| Instant::now() >= t) {
                    *guard = None;
                    true
                } else {
                    false // a longer pause was scheduled after us
                }
            };

            if should_resume {
                this.paused.store(false, Ordering::Release);
                this.resume.notify_waiters();
            }
        }));

        true
    }
}
