//! Wall-clock timers for spawning and scoring
//!
//! Both run on milliseconds supplied by the caller, never on frame count.

/// Fixed-period timer. Fires once per elapsed period on a fixed schedule
/// anchored at `start`, catching up if polled late.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl IntervalTimer {
    /// A disarmed timer
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: None,
        }
    }

    /// Start firing every period from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    /// Stop for good (until restarted)
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Number of periods that have come due since the last poll
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };

        let mut fired = 0;
        while now_ms >= due {
            fired += 1;
            due += self.period_ms;
        }
        self.next_due_ms = Some(due);
        fired
    }
}

/// Score clock: one point when strictly more than a period has passed
/// since the last point, re-anchored at the moment it awards.
#[derive(Debug, Clone)]
pub struct ScoreClock {
    period_ms: f64,
    last_award_ms: f64,
}

impl ScoreClock {
    /// Anchored at `now_ms`, so the first point comes one full period after
    /// the run starts rather than on its first frame.
    pub fn new(period_ms: f64, now_ms: f64) -> Self {
        Self {
            period_ms,
            last_award_ms: now_ms,
        }
    }

    /// True if a point is earned at `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if now_ms - self.last_award_ms > self.period_ms {
            self.last_award_ms = now_ms;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_timer_never_fires() {
        let mut timer = IntervalTimer::new(2000.0);
        assert!(!timer.is_active());
        assert_eq!(timer.poll(1.0e9), 0);
    }

    #[test]
    fn test_timer_fires_on_fixed_schedule() {
        let mut timer = IntervalTimer::new(2000.0);
        timer.start(1000.0);
        assert_eq!(timer.poll(2999.0), 0);
        assert_eq!(timer.poll(3000.0), 1);
        assert_eq!(timer.poll(4500.0), 0);
        // Schedule stays anchored at start, not at the poll time
        assert_eq!(timer.poll(5000.0), 1);
    }

    #[test]
    fn test_timer_catches_up_after_stall() {
        let mut timer = IntervalTimer::new(2000.0);
        timer.start(0.0);
        assert_eq!(timer.poll(7000.0), 3);
        assert_eq!(timer.poll(8000.0), 1);
    }

    #[test]
    fn test_cancelled_timer_stays_quiet() {
        let mut timer = IntervalTimer::new(2000.0);
        timer.start(0.0);
        timer.cancel();
        assert!(!timer.is_active());
        assert_eq!(timer.poll(10_000.0), 0);
    }

    #[test]
    fn test_score_clock_awards_after_full_period() {
        let mut clock = ScoreClock::new(1000.0, 0.0);
        assert!(!clock.tick(500.0));
        assert!(!clock.tick(1000.0));
        assert!(clock.tick(1000.5));
        // Re-anchored at the award
        assert!(!clock.tick(2000.0));
        assert!(clock.tick(2001.0));
    }

    #[test]
    fn test_score_clock_waits_a_period_from_its_anchor() {
        let mut clock = ScoreClock::new(1000.0, 500.0);
        assert!(!clock.tick(500.0));
        assert!(!clock.tick(1500.0));
        assert!(clock.tick(1500.5));
    }

    #[test]
    fn test_score_clock_awards_once_per_tick() {
        let mut clock = ScoreClock::new(1000.0, 0.0);
        assert!(clock.tick(5000.0));
        assert!(!clock.tick(5001.0));
    }
}
