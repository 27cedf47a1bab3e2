//! Frame driver
//!
//! The run loop around [`Simulation`]. Each frame polls the spawn timer,
//! updates, and renders. The frame on which the game ends draws the banner
//! and reports [`LoopControl::Halt`], so the caller stops scheduling frames
//! and the banner is presented once.

use crate::platform::Clock;
use crate::renderer::DrawList;
use crate::renderer::Surface;
use crate::sim::{SimPhase, Simulation, TickInput};

/// Whether the caller should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Halt,
}

/// Totals reported when a run ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames that advanced the simulation
    pub frames: u64,
    pub score: u64,
    pub obstacles_spawned: u32,
    /// False if `max_frames` ran out before the game ended
    pub finished: bool,
}

#[derive(Debug)]
pub struct FrameDriver {
    sim: Simulation,
    input: TickInput,
    frames: u64,
}

impl FrameDriver {
    pub fn new(sim: Simulation) -> Self {
        Self {
            sim,
            input: TickInput::default(),
            frames: 0,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Activate input; applied at the start of the next frame
    pub fn queue_jump(&mut self) {
        self.input.jump = true;
    }

    /// Drive one frame at wall-clock `now_ms`
    pub fn frame(&mut self, now_ms: f64, surface: &mut dyn Surface) -> LoopControl {
        if self.sim.phase() == SimPhase::Start {
            self.sim.init(now_ms);
        }

        if self.sim.phase() == SimPhase::GameOver {
            self.sim.render(surface);
            return LoopControl::Halt;
        }

        self.sim.poll_spawn_timer(now_ms);
        let input = std::mem::take(&mut self.input);
        self.sim.update(&input, now_ms);
        self.sim.render(surface);
        self.frames += 1;
        log::trace!("frame {} score {}", self.frames, self.sim.score());

        // The frame that ends the game already drew the banner
        if self.sim.phase() == SimPhase::GameOver {
            return LoopControl::Halt;
        }
        LoopControl::Continue
    }

    /// Explicit run loop: one frame per clock tick until the game ends or
    /// `max_frames` is reached. `on_frame` sees every finished frame and
    /// may queue input for the next one.
    pub fn run<C, F>(&mut self, clock: &mut C, max_frames: Option<u64>, mut on_frame: F) -> RunSummary
    where
        C: Clock,
        F: FnMut(&mut Self, &DrawList),
    {
        let mut surface = DrawList::new();
        let finished = loop {
            if max_frames.is_some_and(|max| self.frames >= max) {
                break false;
            }

            surface.reset();
            let control = self.frame(clock.now_ms(), &mut surface);
            on_frame(self, &surface);
            if control == LoopControl::Halt {
                break true;
            }
            clock.wait_for_frame();
        };

        self.summary(finished)
    }

    pub fn summary(&self, finished: bool) -> RunSummary {
        RunSummary {
            frames: self.frames,
            score: self.sim.score(),
            obstacles_spawned: self.sim.obstacles_spawned(),
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::SteppedClock;
    use crate::renderer::DrawCommand;
    use crate::settings::{Settings, Viewport};

    fn driver(settings: Settings) -> FrameDriver {
        FrameDriver::new(Simulation::new(settings, Viewport::new(800.0, 600.0), 7).unwrap())
    }

    #[test]
    fn test_first_frame_starts_the_game() {
        let mut d = driver(Settings::default());
        let mut list = DrawList::new();
        assert_eq!(d.frame(0.0, &mut list), LoopControl::Continue);
        assert_eq!(d.sim().phase(), SimPhase::Running);
        assert!(list.clears());
    }

    #[test]
    fn test_run_halts_on_collision_frame() {
        let mut d = driver(Settings::default());
        let mut clock = SteppedClock::sixty_hz();
        let mut last_frame = Vec::new();
        let mut calls = 0;

        let summary = d.run(&mut clock, Some(10_000), |_, list| {
            calls += 1;
            last_frame = list.commands().to_vec();
        });

        assert!(summary.finished);
        // Ground obstacle reaches the player on frame 176
        assert_eq!(summary.frames, 176);
        // No extra frame is driven after the one that ended the game
        assert_eq!(calls, 176);
        assert_eq!(d.sim().phase(), SimPhase::GameOver);
        assert!(matches!(
            last_frame.as_slice(),
            [DrawCommand::Text { text, .. }] if text == "Game Over"
        ));
    }

    #[test]
    fn test_banner_is_drawn_on_exactly_one_frame() {
        let mut d = driver(Settings::default());
        let mut clock = SteppedClock::sixty_hz();
        let mut banner_frames = 0;
        let mut halted_on = None;

        d.run(&mut clock, Some(10_000), |d, list| {
            if list.texts().any(|(text, _, _)| text == "Game Over") {
                banner_frames += 1;
                halted_on = Some(d.frames());
            }
        });

        assert_eq!(banner_frames, 1);
        assert_eq!(halted_on, Some(176));
    }

    #[test]
    fn test_halted_driver_stays_halted() {
        let mut d = driver(Settings::default());
        let mut clock = SteppedClock::sixty_hz();
        let summary = d.run(&mut clock, None, |_, _| {});

        let mut list = DrawList::new();
        assert_eq!(d.frame(1.0e7, &mut list), LoopControl::Halt);
        assert_eq!(d.frames(), summary.frames);
        assert_eq!(d.sim().score(), summary.score);
        assert_eq!(d.sim().obstacles_spawned(), summary.obstacles_spawned);
    }

    #[test]
    fn test_max_frames_bounds_endless_run() {
        let mut d = driver(Settings {
            initial_obstacle: false,
            ..Default::default()
        });
        let mut clock = SteppedClock::sixty_hz();
        let summary = d.run(&mut clock, Some(600), |_, _| {});

        assert!(!summary.finished);
        assert_eq!(summary.frames, 600);
        // Frames span just under ten seconds: spawns at 2, 4, 6 and 8 s
        assert_eq!(summary.obstacles_spawned, 4);
        // One award per full second elapsed, the last one before 9983 ms
        assert_eq!(summary.score, 9);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_run_against_system_clock() {
        use crate::platform::SystemClock;

        let mut d = driver(Settings::default());
        let summary = d.run(&mut SystemClock::new(), Some(3), |_, _| {});
        assert!(!summary.finished);
        assert_eq!(summary.frames, 3);
        assert_eq!(d.sim().phase(), SimPhase::Running);
    }

    #[test]
    fn test_queued_jump_applies_next_frame_once() {
        let mut d = driver(Settings {
            initial_obstacle: false,
            ..Default::default()
        });
        let mut list = DrawList::new();
        d.frame(0.0, &mut list);

        d.queue_jump();
        d.frame(16.0, &mut list);
        let player = d.sim().player().unwrap();
        assert!(!player.grounded);
        assert_eq!(player.vel_y, -9.5);

        // Input is consumed; the next frame only applies gravity
        d.frame(32.0, &mut list);
        assert_eq!(d.sim().player().unwrap().vel_y, -9.0);
    }
}
