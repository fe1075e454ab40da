/// Trailing-edge debounce timer.
///
/// Each trigger cancels and reschedules the single pending deadline
/// (last-writer-wins, never stacking); the action fires only after a
/// full quiet window passes with no further triggers. Time is
/// caller-supplied milliseconds, so the timer is deterministic under
/// test and carries no background task of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debounce {
    window_ms: u64,
    deadline_ms: Option<u64>,
}

impl Debounce {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            deadline_ms: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Start or restart the quiet window from `now_ms`.
    pub fn trigger(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms + self.window_ms);
    }

    /// Drop any pending deadline without firing.
    pub fn cancel(&mut self) {
        self.deadline_ms = None;
    }

    /// True exactly once per burst: on the first poll at or past the
    /// deadline. Callers poll this from their frame loop and send the
    /// coalesced message when it fires.
    pub fn fire_ready(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Debounce;

    #[test]
    fn burst_collapses_to_one_fire_after_the_last_trigger() {
        let mut debounce = Debounce::new(1000);
        // Per-pixel drag spam: each event resets the window.
        for t in [0, 100, 250, 400] {
            debounce.trigger(t);
        }
        assert!(!debounce.fire_ready(1399));
        assert!(debounce.fire_ready(1400));
        // Fired once; stays quiet until the next trigger.
        assert!(!debounce.fire_ready(5000));
    }

    #[test]
    fn fires_only_after_a_full_quiet_window() {
        let mut debounce = Debounce::new(500);
        debounce.trigger(0);
        assert!(!debounce.fire_ready(499));
        assert!(debounce.is_pending());
        assert!(debounce.fire_ready(500));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn cancel_discards_the_pending_deadline() {
        let mut debounce = Debounce::new(500);
        debounce.trigger(0);
        debounce.cancel();
        assert!(!debounce.fire_ready(10_000));
    }
}
