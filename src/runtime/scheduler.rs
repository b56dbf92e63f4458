use crate::runtime::event::AppEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Restarts the timer for `key`; any earlier entry under the same key is dropped.
    Debounce {
        key: String,
        delay: Duration,
        event: AppEvent,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    key: String,
    event: AppEvent,
}

/// Keyed timers. At most one entry is pending per key.
#[derive(Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::Debounce { key, delay, event } => {
                self.delayed.retain(|task| task.key != key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    key,
                    event,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.delayed.retain(|task| task.key != key);
            }
        }
    }

    /// Removes and returns every event due at `now`, earliest first.
    pub fn drain_ready(&mut self, now: Instant) -> Vec<AppEvent> {
        let mut due = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                due.push(self.delayed.swap_remove(idx));
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|task| task.due_at);
        due.into_iter().map(|task| task.event).collect()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        let mut next = default_timeout;

        for task in &self.delayed {
            let due_in = task.due_at.saturating_duration_since(now);
            if due_in < next {
                next = due_in;
            }
        }

        next
    }
}

#[cfg(test)]
mod tests {
    use super::{Scheduler, SchedulerCommand};
    use crate::runtime::event::AppEvent;
    use std::time::{Duration, Instant};

    fn elapsed(target: &str, generation: u64) -> AppEvent {
        AppEvent::DebounceElapsed {
            target: target.to_string(),
            generation,
        }
    }

    fn debounce(key: &str, generation: u64, delay_ms: u64) -> SchedulerCommand {
        SchedulerCommand::Debounce {
            key: key.to_string(),
            delay: Duration::from_millis(delay_ms),
            event: elapsed(key, generation),
        }
    }

    #[test]
    fn debounce_keeps_only_latest_entry() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        let fallback = Duration::from_millis(120);

        scheduler.schedule(debounce("search", 1, 500), start);
        scheduler.schedule(debounce("search", 2, 500), start + Duration::from_millis(200));

        assert!(scheduler.drain_ready(start + Duration::from_millis(600)).is_empty());
        assert_eq!(
            scheduler.drain_ready(start + Duration::from_millis(700)),
            vec![elapsed("search", 2)]
        );
        assert_eq!(scheduler.poll_timeout(start, fallback), fallback);
    }

    #[test]
    fn cancel_drops_pending_debounce() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();

        scheduler.schedule(debounce("search", 1, 100), start);
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "search".to_string(),
            },
            start,
        );

        assert!(scheduler.drain_ready(start + Duration::from_secs(1)).is_empty());
    }

    #[test]
    fn keys_debounce_independently() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();

        scheduler.schedule(debounce("other", 9, 50), start);
        scheduler.schedule(debounce("search", 1, 10), start);
        scheduler.schedule(
            SchedulerCommand::Cancel {
                key: "missing".to_string(),
            },
            start,
        );

        let fired = scheduler.drain_ready(start + Duration::from_millis(60));
        assert_eq!(fired, vec![elapsed("search", 1), elapsed("other", 9)]);
    }

    #[test]
    fn poll_timeout_tracks_nearest_deadline() {
        let mut scheduler = Scheduler::new();
        let start = Instant::now();
        let fallback = Duration::from_millis(120);

        assert_eq!(scheduler.poll_timeout(start, fallback), fallback);

        scheduler.schedule(debounce("search", 1, 40), start);
        assert_eq!(
            scheduler.poll_timeout(start, fallback),
            Duration::from_millis(40)
        );
        assert_eq!(
            scheduler.poll_timeout(start + Duration::from_millis(100), fallback),
            Duration::ZERO
        );
    }
}
