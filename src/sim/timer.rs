//! Cancelable scheduled tasks owned by the world
//!
//! Timers advance with simulation time, so a restart can cancel them and
//! tests can drive them without a clock.

/// Repeats while a trigger is held. Arming an armed timer is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatTimer {
    interval_ms: f32,
    /// `Some` while armed: time left until the next repeat
    remaining_ms: Option<f32>,
}

impl RepeatTimer {
    pub fn new(interval_ms: f32) -> Self {
        Self {
            interval_ms,
            remaining_ms: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Arm the timer. Returns true only when it was not already armed.
    pub fn arm(&mut self) -> bool {
        if self.remaining_ms.is_some() {
            return false;
        }
        self.remaining_ms = Some(self.interval_ms);
        true
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    /// Advance an armed timer. Returns true (at most once per call) when due.
    pub fn advance(&mut self, dt_ms: f32) -> bool {
        let Some(remaining) = self.remaining_ms.as_mut() else {
            return false;
        };
        *remaining -= dt_ms;
        if *remaining <= 0.0 {
            // Never bank more than one interval of backlog
            *remaining = (*remaining + self.interval_ms).max(0.0);
            return true;
        }
        false
    }

    /// Drive from a held trigger: fires on press, then every interval while
    /// held; releasing cancels.
    pub fn poll(&mut self, held: bool, dt_ms: f32) -> bool {
        if !held {
            self.cancel();
            return false;
        }
        if self.arm() {
            return true;
        }
        self.advance(dt_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_press_then_repeats() {
        let mut timer = RepeatTimer::new(100.0);
        assert!(timer.poll(true, 16.0));
        let fired = (0..12).filter(|_| timer.poll(true, 16.0)).count();
        // 192 ms held after the press -> one repeat at 100 ms
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_rearm_does_not_double_fire() {
        let mut timer = RepeatTimer::new(100.0);
        assert!(timer.arm());
        assert!(!timer.arm());
        assert!(timer.is_armed());
    }

    #[test]
    fn test_release_cancels() {
        let mut timer = RepeatTimer::new(100.0);
        assert!(timer.poll(true, 16.0));
        assert!(!timer.poll(false, 16.0));
        assert!(!timer.is_armed());
        assert!(!timer.advance(500.0));
        // Pressing again fires immediately
        assert!(timer.poll(true, 16.0));
    }

    #[test]
    fn test_long_frame_banks_at_most_one_repeat() {
        let mut timer = RepeatTimer::new(100.0);
        timer.arm();
        assert!(timer.advance(1000.0));
        assert!(timer.advance(0.0));
        assert!(!timer.advance(0.0));
    }
}
