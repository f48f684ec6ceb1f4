use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

struct Timer<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

/// One-shot timers for the control context.
///
/// Time only moves when the owner calls `tick`, so the control loop stays
/// single threaded and tests stay deterministic.
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer<T>>,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 1,
            timers: Vec::new(),
        }
    }

    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Time until the earliest timer, if any.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.timers
            .iter()
            .map(|t| t.due.saturating_sub(self.now))
            .min()
    }

    /// Advance time and hand back everything that came due, earliest first.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<(TimerId, T)> {
        self.now += elapsed;
        let now = self.now;

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.timers.len() {
            if self.timers[i].due <= now {
                due.push(self.timers.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|t| (t.due, t.id.0));
        due.into_iter().map(|t| (t.id, t.task)).collect()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
