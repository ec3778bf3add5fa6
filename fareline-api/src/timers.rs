use crate::service::Ticketing;
use fareline_shared::models::Ticket;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// The collaborator-owned countdown driver.
///
/// One repeating one-second task per watched ticket refreshes the
/// display and asks the engine to flip the record once the window has
/// elapsed. The timers are a UI refresh mechanism only; whether a
/// ticket is expired is always recomputed from wall clock by the
/// engine. The whole group is cancellable at teardown.
#[derive(Default)]
pub struct TimerGroup {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TimerGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a one-second countdown for `ticket`. `on_tick` receives
    /// the remaining seconds on every beat; the task stops itself after
    /// reporting zero and marking the ticket expired.
    pub fn watch<F>(&self, service: Arc<Ticketing>, ticket: &Ticket, mut on_tick: F)
    where
        F: FnMut(u64) + Send + 'static,
    {
        let ticket = ticket.clone();

        let handle = tokio::spawn(async move {
            let mut beat = tokio::time::interval(Duration::from_secs(1));
            loop {
                beat.tick().await;

                let remaining = service.remaining_seconds(&ticket);
                on_tick(remaining);

                if remaining == 0 {
                    service.mark_expired_if_due(&ticket.id);
                    break;
                }
            }
        });

        self.push(handle);
    }

    /// Abort every running countdown. Idempotent; safe to call at
    /// teardown regardless of how many timers are left.
    pub fn stop_all(&self) {
        let mut handles = match self.handles.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if handles.is_empty() {
            return;
        }

        debug!(count = handles.len(), "stopping countdown timers");
        for handle in handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of countdowns started and not yet stopped as a group.
    pub fn watched(&self) -> usize {
        match self.handles.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn push(&self, handle: JoinHandle<()>) {
        match self.handles.lock() {
            Ok(mut guard) => guard.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }
}

impl Drop for TimerGroup {
    fn drop(&mut self) {
        self.stop_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fareline_shared::SystemClock;
    use fareline_store::{AppConfig, MemoryBackend};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn service() -> Arc<Ticketing> {
        Arc::new(Ticketing::new(
            AppConfig::default(),
            Arc::new(MemoryBackend::new()),
            Arc::new(SystemClock),
        ))
    }

    #[tokio::test]
    async fn test_watch_ticks_and_stop_all_is_idempotent() {
        let service = service();
        let ticket = service.create_ticket("11", 1).unwrap();

        let ticks = Arc::new(AtomicU32::new(0));
        let seen = ticks.clone();

        let timers = TimerGroup::new();
        timers.watch(service, &ticket, move |_remaining| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(timers.watched(), 1);

        // first interval beat fires immediately
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ticks.load(Ordering::SeqCst) >= 1);

        timers.stop_all();
        timers.stop_all();
        assert_eq!(timers.watched(), 0);

        let after_stop = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_exhausted_ticket_is_marked_and_dropped() {
        let clock = Arc::new(fareline_shared::ManualClock::new(chrono::Utc::now()));
        let service = Arc::new(Ticketing::new(
            AppConfig::default(),
            Arc::new(MemoryBackend::new()),
            clock.clone(),
        ));
        let ticket = service.create_ticket("11", 1).unwrap();
        clock.advance(chrono::Duration::seconds(3601));

        let timers = TimerGroup::new();
        timers.watch(service.clone(), &ticket, |remaining| {
            assert_eq!(remaining, 0);
        });

        tokio::time::sleep(Duration::from_millis(100)).await;

        // the watcher flipped the stored record on its way out
        let stored = service
            .list_tickets()
            .into_iter()
            .find(|t| t.id == ticket.id)
            .unwrap();
        assert!(stored.is_expired);
    }
}
