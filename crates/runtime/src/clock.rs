/// Wrap point for the trail-progress parameter.
pub const TIME_WRAP: f64 = 100.0;

/// Cooperative per-frame clock driving trail interpolation.
///
/// Runs one tick per display frame while started, advancing a relative
/// accumulator by `speed / 1000` and wrapping at `TIME_WRAP` so the
/// trail-progress parameter stays bounded. Stop takes effect
/// immediately (no further advancement, no orphaned work); restart
/// resumes from the held value at the next frame boundary, since
/// accumulated time is relative, not wall-clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    speed: f64,
    time: f64,
    running: bool,
}

impl AnimationClock {
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            time: 0.0,
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance one frame. No-op while stopped.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }
        self.time = (self.time + self.speed / 1000.0) % TIME_WRAP;
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationClock, TIME_WRAP};

    #[test]
    fn advances_by_speed_over_1000_per_tick() {
        let mut clock = AnimationClock::new(5.0);
        clock.start();
        clock.tick();
        clock.tick();
        assert!((clock.time() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn accumulator_wraps_at_modulus() {
        let mut clock = AnimationClock::new(60_000.0);
        clock.start();
        clock.tick(); // +60
        clock.tick(); // +60, wraps past 100
        assert!(clock.time() < TIME_WRAP);
        assert!((clock.time() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn stop_freezes_and_restart_resumes_from_held_value() {
        let mut clock = AnimationClock::new(1000.0);
        clock.start();
        clock.tick();
        assert_eq!(clock.time(), 1.0);

        clock.stop();
        clock.tick();
        clock.tick();
        assert_eq!(clock.time(), 1.0);

        clock.start();
        clock.tick();
        assert_eq!(clock.time(), 2.0);
    }
}
