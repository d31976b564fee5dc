//! Deterministic scheduler for tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::clock::{duration_millis, Clock, ManualClock};

use super::{Scheduler, TickHandle, TickId};

#[derive(Debug)]
struct Entry {
    id: TickId,
    interval_ms: i64,
    next_due: i64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<Entry>,
    scheduled: usize,
    fired: usize,
}

/// Scheduler paired with a [`ManualClock`].
///
/// Nothing fires on its own: [`ManualScheduler::advance`] walks the clock
/// forward and hands every due tick to a callback in chronological order,
/// moving the clock to each tick's due instant first.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    clock: Arc<ManualClock>,
    inner: Arc<Mutex<Inner>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of schedules currently installed.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Ids of the schedules currently installed.
    #[must_use]
    pub fn active_ids(&self) -> Vec<TickId> {
        self.lock().entries.iter().map(|e| e.id).collect()
    }

    /// Number of schedules ever installed.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.lock().scheduled
    }

    /// Number of ticks delivered so far.
    #[must_use]
    pub fn fired_count(&self) -> usize {
        self.lock().fired
    }

    /// Advances the clock by `by`, delivering due ticks to `on_tick`.
    ///
    /// Schedules cancelled from inside `on_tick` stop firing immediately.
    pub fn advance(&self, by: Duration, mut on_tick: impl FnMut(TickId)) {
        let end = self.clock.now_millis().saturating_add(duration_millis(by));

        while let Some((id, due)) = self.pop_due(end) {
            // Ticks overdue from a manual clock jump fire late, never in the past
            self.clock.set(due.max(self.clock.now_millis()));
            on_tick(id);
        }

        self.clock.set(end);
    }

    fn pop_due(&self, end: i64) -> Option<(TickId, i64)> {
        let mut inner = self.lock();
        let index = inner
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.next_due <= end)
            .min_by_key(|(_, e)| e.next_due)
            .map(|(index, _)| index)?;

        let entry = &mut inner.entries[index];
        let due = entry.next_due;
        let id = entry.id;
        entry.next_due += entry.interval_ms;
        inner.fired += 1;

        Some((id, due))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, id: TickId) -> TickHandle {
        let interval_ms = duration_millis(interval).max(1);
        {
            let mut inner = self.lock();
            inner.entries.push(Entry {
                id,
                interval_ms,
                next_due: self.clock.now_millis() + interval_ms,
            });
            inner.scheduled += 1;
        }

        let inner = Arc::clone(&self.inner);
        TickHandle::new(id, move || {
            inner
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .entries
                .retain(|e| e.id != id);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_scheduler() -> (ManualScheduler, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (ManualScheduler::new(Arc::clone(&clock)), clock)
    }

    #[test]
    fn test_fires_at_each_interval() {
        let (scheduler, clock) = create_scheduler();
        let _handle = scheduler.schedule_repeating(Duration::from_millis(250), TickId::first());

        let mut seen = Vec::new();
        scheduler.advance(Duration::from_millis(1_000), |id| {
            seen.push((id, clock.now_millis()));
        });

        let times: Vec<i64> = seen.iter().map(|(_, at)| *at).collect();
        assert_eq!(times, vec![250, 500, 750, 1_000]);
        assert_eq!(scheduler.fired_count(), 4);
        assert_eq!(clock.now_millis(), 1_000);
    }

    #[test]
    fn test_nothing_due_still_moves_clock() {
        let (scheduler, clock) = create_scheduler();
        let _handle = scheduler.schedule_repeating(Duration::from_millis(250), TickId::first());

        let mut count = 0;
        scheduler.advance(Duration::from_millis(100), |_| count += 1);

        assert_eq!(count, 0);
        assert_eq!(clock.now_millis(), 100);
    }

    #[test]
    fn test_cancel_removes_schedule() {
        let (scheduler, _clock) = create_scheduler();
        let handle = scheduler.schedule_repeating(Duration::from_millis(250), TickId::first());
        assert_eq!(scheduler.active_count(), 1);

        handle.cancel();
        assert_eq!(scheduler.active_count(), 0);
        assert_eq!(scheduler.scheduled_count(), 1);

        let mut count = 0;
        scheduler.advance(Duration::from_secs(1), |_| count += 1);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cancel_inside_callback_stops_firing() {
        let (scheduler, _clock) = create_scheduler();
        let mut handle =
            Some(scheduler.schedule_repeating(Duration::from_millis(100), TickId::first()));

        let mut count = 0;
        scheduler.advance(Duration::from_secs(1), |_| {
            count += 1;
            if let Some(h) = handle.take() {
                h.cancel();
            }
        });

        assert_eq!(count, 1);
    }

    #[test]
    fn test_interleaves_schedules_in_order() {
        let (scheduler, _clock) = create_scheduler();
        let a = TickId::first();
        let b = a.next();
        let _ha = scheduler.schedule_repeating(Duration::from_millis(300), a);
        let _hb = scheduler.schedule_repeating(Duration::from_millis(200), b);

        let mut seen = Vec::new();
        scheduler.advance(Duration::from_millis(600), |id| seen.push(id));

        assert_eq!(seen, vec![b, a, b, a, b]);
        assert_eq!(scheduler.active_ids(), vec![a, b]);
    }

    #[test]
    fn test_overdue_ticks_fire_late() {
        let (scheduler, clock) = create_scheduler();
        let _handle = scheduler.schedule_repeating(Duration::from_millis(250), TickId::first());
        clock.advance(Duration::from_secs(2));

        let mut times = Vec::new();
        scheduler.advance(Duration::from_millis(250), |_| times.push(clock.now_millis()));

        assert!(times.iter().all(|&at| at == 2_000 || at == 2_250));
        assert_eq!(clock.now_millis(), 2_250);
    }
}
