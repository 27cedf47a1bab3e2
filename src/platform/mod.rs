//! Platform abstraction layer
//!
//! Wall-clock time for the frame driver. The browser build drives frames
//! from `requestAnimationFrame` and reads `Date.now()` directly; native and
//! headless runs go through [`Clock`].

use crate::consts::FRAME_MS;

/// Source of wall-clock milliseconds, paced once per frame
pub trait Clock {
    fn now_ms(&mut self) -> f64;

    /// Block (or pretend to) until the next frame is due
    fn wait_for_frame(&mut self);
}

/// Real time, paced by sleeping (native only)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
    frame: std::time::Duration,
}

#[cfg(not(target_arch = "wasm32"))]
impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
            frame: std::time::Duration::from_secs_f64(FRAME_MS / 1000.0),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock for SystemClock {
    fn now_ms(&mut self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wait_for_frame(&mut self) {
        std::thread::sleep(self.frame);
    }
}

/// Simulated time that advances a fixed step per frame
#[derive(Debug, Clone)]
pub struct SteppedClock {
    now_ms: f64,
    step_ms: f64,
}

impl SteppedClock {
    pub fn new(start_ms: f64, step_ms: f64) -> Self {
        Self {
            now_ms: start_ms,
            step_ms,
        }
    }

    /// 60 Hz from zero
    pub fn sixty_hz() -> Self {
        Self::new(0.0, FRAME_MS)
    }
}

impl Clock for SteppedClock {
    fn now_ms(&mut self) -> f64 {
        self.now_ms
    }

    fn wait_for_frame(&mut self) {
        self.now_ms += self.step_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepped_clock_advances_per_frame() {
        let mut clock = SteppedClock::new(100.0, 10.0);
        assert_eq!(clock.now_ms(), 100.0);
        clock.wait_for_frame();
        clock.wait_for_frame();
        assert_eq!(clock.now_ms(), 120.0);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_system_clock_is_monotonic() {
        let mut clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
