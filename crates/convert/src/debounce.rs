use std::time::{Duration, Instant};

/// Quiet period before a burst of edits triggers one conversion.
pub const INPUT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delay before converting pasted content.
pub const PASTE_DELAY: Duration = Duration::from_millis(10);

/// Collapses bursts of input events into a single deferred call.
///
/// Callers `schedule` on every edit and `poll` once per frame; `poll`
/// returns `true` exactly once after the deadline passes.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(INPUT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Restarts the quiet period from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fires after `delay` instead of the configured period, unless an
    /// earlier deadline is already pending.
    pub fn schedule_within(&mut self, now: Instant, delay: Duration) {
        let candidate = now + delay;
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < candidate => existing,
            _ => candidate,
        });
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending call fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_into_one_call() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        for step in 0..5u64 {
            debouncer.schedule(start + Duration::from_millis(step * 100));
        }
        assert!(!debouncer.poll(start + Duration::from_millis(500)));
        assert!(debouncer.poll(start + Duration::from_millis(700)));
        assert!(!debouncer.poll(start + Duration::from_millis(800)));
    }

    #[test]
    fn paste_shortens_pending_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(start);
        debouncer.schedule_within(start, PASTE_DELAY);
        assert!(debouncer.poll(start + Duration::from_millis(10)));
    }

    #[test]
    fn cancel_drops_pending_call() {
        let start = Instant::now();
        let mut debouncer = Debouncer::default();
        debouncer.schedule(start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_secs(1)));
    }
}
