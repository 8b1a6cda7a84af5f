use std::time::Duration;

/// Names one scheduled action so it can be cancelled later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Pending<A> {
    handle: TimerHandle,
    due: Duration,
    action: A,
}

/// Cancellable one-shot timers, fired in due order.
///
/// Entries are kept sorted by due time; ties keep insertion order, so
/// actions scheduled for the same instant fire in the order they were
/// scheduled.
pub struct Scheduler<A> {
    pending: Vec<Pending<A>>,
    next_id: u64,
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, due: Duration, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let idx = self.pending.partition_point(|p| p.due <= due);
        self.pending.insert(idx, Pending { handle, due, action });
        handle
    }

    /// Remove a pending timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|p| p.handle == handle) {
            Some(idx) => {
                self.pending.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Take the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerHandle, A)> {
        if self.pending.first()?.due > now {
            return None;
        }
        let Pending { handle, action, .. } = self.pending.remove(0);
        Some((handle, action))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn drain(scheduler: &mut Scheduler<&'static str>, now: Duration) -> Vec<&'static str> {
        std::iter::from_fn(|| scheduler.pop_due(now).map(|(_, a)| a)).collect()
    }

    #[test]
    fn fires_in_due_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(1800), "third");
        scheduler.schedule(ms(0), "first");
        scheduler.schedule(ms(900), "second");

        assert_eq!(drain(&mut scheduler, ms(1000)), vec!["first", "second"]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(drain(&mut scheduler, ms(1800)), vec!["third"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(ms(5), "a");
        scheduler.schedule(ms(5), "b");
        scheduler.schedule(ms(5), "c");

        assert_eq!(drain(&mut scheduler, ms(5)), vec!["a", "b", "c"]);
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut scheduler = Scheduler::new();
        let keep = scheduler.schedule(ms(10), "keep");
        let drop = scheduler.schedule(ms(20), "drop");

        assert!(scheduler.cancel(drop));
        assert!(!scheduler.cancel(drop));
        assert_eq!(drain(&mut scheduler, ms(100)), vec!["keep"]);
        assert!(!scheduler.cancel(keep));
    }
}
