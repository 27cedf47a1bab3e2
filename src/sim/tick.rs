//! Simulation controller
//!
//! Owns the world and advances it one frame at a time. Physics runs per
//! frame; spawning and scoring run on the wall clock passed in by the
//! caller.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::arena::{Arena, Handle};
use super::clock::{IntervalTimer, ScoreClock};
use super::collision::Collider;
use super::state::{Entity, Obstacle, Player, SimPhase};
use crate::error::SettingsError;
use crate::renderer::{Surface, TextStyle};
use crate::settings::{Settings, Viewport};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Activate (touch/click/key) since the last frame
    pub jump: bool,
}

/// What happened during one [`Simulation::update`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Obstacles that left the screen and were removed
    pub expired: usize,
    /// A point was awarded this frame
    pub scored: bool,
    /// Id of the obstacle that ended the run
    pub hit_by: Option<u32>,
}

/// The whole game world
#[derive(Debug, Clone)]
pub struct Simulation {
    settings: Settings,
    viewport: Viewport,
    phase: SimPhase,
    score: u64,
    entities: Arena<Entity>,
    player: Handle,
    spawn_timer: IntervalTimer,
    score_clock: ScoreClock,
    rng: Pcg32,
    seed: u64,
    next_obstacle_id: u32,
    spawned: u32,
}

impl Simulation {
    /// Build the world in the Start phase. Settings are checked first: an
    /// empty spawn band or a non-positive timer period is rejected here.
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Result<Self, SettingsError> {
        settings.validate()?;

        let ground_level = settings.ground_level(&viewport);
        let mut entities = Arena::new();
        let player = entities.insert(Entity::Player(Player::new(
            settings.player_x,
            ground_level,
            &settings,
        )));

        let mut sim = Self {
            spawn_timer: IntervalTimer::new(settings.spawn_interval_ms),
            score_clock: ScoreClock::new(settings.score_period_ms, 0.0),
            settings,
            viewport,
            phase: SimPhase::Start,
            score: 0,
            entities,
            player,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            next_obstacle_id: 1,
            spawned: 0,
        };

        if sim.settings.initial_obstacle {
            let pos = Vec2::new(sim.settings.spawn_x, ground_level);
            sim.push_obstacle(pos);
        }

        Ok(sim)
    }

    /// Start -> Running. Arms the spawn timer and score clock at `now_ms`.
    pub fn init(&mut self, now_ms: f64) {
        if self.phase != SimPhase::Start {
            return;
        }
        self.phase = SimPhase::Running;
        self.spawn_timer.start(now_ms);
        self.score_clock = ScoreClock::new(self.settings.score_period_ms, now_ms);
        log::info!("Simulation running (seed {})", self.seed);
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Total obstacles created so far, including the initial one
    pub fn obstacles_spawned(&self) -> u32 {
        self.spawned
    }

    pub fn spawn_timer_active(&self) -> bool {
        self.spawn_timer.is_active()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().map(|(_, e)| e)
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
        self.entities().filter_map(Entity::as_obstacle)
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.get(self.player).and_then(Entity::as_player)
    }

    pub fn jump(&mut self) {
        if let Some(player) = self.entities.get_mut(self.player).and_then(Entity::as_player_mut) {
            player.jump();
        }
    }

    /// Add an obstacle at the spawn column, random height in the spawn band
    pub fn spawn_obstacle(&mut self) -> Option<Handle> {
        if self.phase == SimPhase::GameOver {
            return None;
        }
        let y = self
            .rng
            .random_range(self.settings.spawn_min_y..self.settings.spawn_max_y);
        let handle = self.push_obstacle(Vec2::new(self.settings.spawn_x, y));
        log::debug!("Spawned obstacle at y={y:.1} ({} entities)", self.entities.len());
        Some(handle)
    }

    fn push_obstacle(&mut self, pos: Vec2) -> Handle {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        self.spawned += 1;
        self.entities.insert(Entity::Obstacle(Obstacle::new(
            id,
            pos,
            self.settings.obstacle_speed,
            self.settings.obstacle_radius,
        )))
    }

    /// Spawn once for every spawn interval elapsed by `now_ms`
    pub fn poll_spawn_timer(&mut self, now_ms: f64) -> u32 {
        let due = self.spawn_timer.poll(now_ms);
        let mut spawned = 0;
        for _ in 0..due {
            if self.spawn_obstacle().is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Advance one frame: entities, score, then the hit test
    pub fn update(&mut self, input: &TickInput, now_ms: f64) -> TickReport {
        let mut report = TickReport::default();
        if self.phase != SimPhase::Running {
            return report;
        }

        if input.jump {
            self.jump();
        }

        report.expired = self.entities.update_each(Entity::update);
        if report.expired > 0 {
            log::trace!("{} obstacle(s) left the screen", report.expired);
        }

        if self.score_clock.tick(now_ms) {
            self.score += 1;
            report.scored = true;
        }

        report.hit_by = self.first_hit();
        if let Some(id) = report.hit_by {
            self.game_over(id);
        }

        report
    }

    /// The first obstacle, in collection order, touching the player
    fn first_hit(&self) -> Option<u32> {
        let player = self.player()?;
        self.obstacles()
            .find(|obstacle| player.collides_with(*obstacle))
            .map(|obstacle| obstacle.id)
    }

    fn game_over(&mut self, hit_by: u32) {
        self.phase = SimPhase::GameOver;
        self.spawn_timer.cancel();
        log::info!("Game over: hit by obstacle {hit_by}, final score {}", self.score);
    }

    /// Draw the frame. Once the game is over only the banner is drawn, on
    /// top of whatever the last frame left.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.phase == SimPhase::GameOver {
            surface.fill_text("Game Over", self.viewport.center(), TextStyle::BANNER);
            return;
        }

        surface.clear();
        for entity in self.entities() {
            entity.render(surface);
        }
        surface.fill_text(
            &format!("Score: {}", self.score),
            Vec2::new(10.0, 30.0),
            TextStyle::HUD,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, DrawList, colors};
    use proptest::prelude::*;

    const FRAME: f64 = crate::consts::FRAME_MS;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn sim_without_initial() -> Simulation {
        let settings = Settings {
            initial_obstacle: false,
            ..Default::default()
        };
        let mut sim = Simulation::new(settings, viewport(), 42).unwrap();
        sim.init(0.0);
        sim
    }

    #[test]
    fn test_init_moves_start_to_running() {
        let mut sim = Simulation::new(Settings::default(), viewport(), 1).unwrap();
        assert_eq!(sim.phase(), SimPhase::Start);
        assert!(!sim.spawn_timer_active());

        // Nothing advances before init
        let frozen = sim.update(&TickInput::default(), 5000.0);
        assert_eq!(frozen, TickReport::default());

        sim.init(0.0);
        assert_eq!(sim.phase(), SimPhase::Running);
        assert!(sim.spawn_timer_active());
    }

    #[test]
    fn test_world_starts_with_player_and_ground_obstacle() {
        let sim = Simulation::new(Settings::default(), viewport(), 1).unwrap();
        let player = sim.player().unwrap();
        assert_eq!(player.pos, Vec2::new(100.0, 550.0));
        assert!(player.grounded);

        let obstacles: Vec<&Obstacle> = sim.obstacles().collect();
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].pos, Vec2::new(500.0, 550.0));
        assert_eq!(sim.obstacles_spawned(), 1);
    }

    #[test]
    fn test_new_rejects_empty_spawn_band() {
        let settings = Settings {
            spawn_min_y: 200.0,
            spawn_max_y: 200.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(settings, viewport(), 1),
            Err(SettingsError::Invalid {
                field: "spawn_max_y",
                ..
            })
        ));
    }

    #[test]
    fn test_new_rejects_non_positive_periods() {
        for spawn_interval_ms in [0.0, -2000.0, f64::NAN] {
            let settings = Settings {
                spawn_interval_ms,
                ..Default::default()
            };
            assert!(matches!(
                Simulation::new(settings, viewport(), 1),
                Err(SettingsError::Invalid {
                    field: "spawn_interval_ms",
                    ..
                })
            ));
        }

        let settings = Settings {
            score_period_ms: 0.0,
            ..Default::default()
        };
        assert!(Simulation::new(settings, viewport(), 1).is_err());
    }

    #[test]
    fn test_spawn_lands_in_band() {
        let mut sim = sim_without_initial();
        for _ in 0..200 {
            sim.spawn_obstacle();
        }
        for obstacle in sim.obstacles() {
            assert_eq!(obstacle.pos.x, 500.0);
            assert_eq!(obstacle.speed, 2.0);
            assert!((100.0..400.0).contains(&obstacle.pos.y));
        }
        assert_eq!(sim.obstacles().count(), 200);
    }

    #[test]
    fn test_spawn_timer_follows_wall_clock() {
        let mut sim = sim_without_initial();
        assert_eq!(sim.poll_spawn_timer(1999.0), 0);
        assert_eq!(sim.poll_spawn_timer(2000.0), 1);
        assert_eq!(sim.poll_spawn_timer(6500.0), 2);
        assert_eq!(sim.obstacles().count(), 3);
    }

    #[test]
    fn test_expired_obstacle_is_gone_after_update() {
        let mut sim = sim_without_initial();
        sim.spawn_obstacle();

        let mut now = 0.0;
        for _ in 0..250 {
            now += FRAME;
            let report = sim.update(&TickInput::default(), now);
            assert_eq!(report.expired, 0);
        }
        assert_eq!(sim.obstacles().next().map(|o| o.pos.x), Some(0.0));

        let report = sim.update(&TickInput::default(), now + FRAME);
        assert_eq!(report.expired, 1);
        assert_eq!(sim.obstacles().count(), 0);
        assert!(sim.player().is_some());
    }

    #[test]
    fn test_score_counts_elapsed_seconds() {
        let mut sim = sim_without_initial();
        let mut now = 0.0;
        let mut last = 0;
        while now < 5500.0 {
            now += 100.0;
            sim.update(&TickInput::default(), now);
            assert!(sim.score() >= last);
            last = sim.score();
        }
        // Awards at 1100, 2200, 3300, 4400, 5500 (strictly after each period)
        assert_eq!(sim.score(), 5);
    }

    #[test]
    fn test_collision_ends_game_once() {
        let mut sim = Simulation::new(Settings::default(), viewport(), 3).unwrap();
        sim.init(0.0);

        let mut now = 0.0;
        let mut hits = 0;
        for _ in 0..500 {
            now += FRAME;
            if sim.update(&TickInput::default(), now).hit_by.is_some() {
                hits += 1;
            }
        }
        assert_eq!(hits, 1);
        assert_eq!(sim.phase(), SimPhase::GameOver);
        assert!(!sim.spawn_timer_active());
    }

    #[test]
    fn test_hit_happens_when_ground_obstacle_reaches_player() {
        let mut sim = Simulation::new(Settings::default(), viewport(), 3).unwrap();
        sim.init(0.0);

        // Gap closes below 50px after (500 - 100 - 50) / 2 = 175 frames
        let mut frames = 0;
        while sim.phase() == SimPhase::Running {
            frames += 1;
            sim.update(&TickInput::default(), frames as f64 * FRAME);
        }
        assert_eq!(frames, 176);
    }

    #[test]
    fn test_game_over_freezes_world() {
        let mut sim = Simulation::new(Settings::default(), viewport(), 3).unwrap();
        sim.init(0.0);
        let mut now = 0.0;
        while sim.phase() == SimPhase::Running {
            now += FRAME;
            sim.update(&TickInput::default(), now);
        }

        let score = sim.score();
        let positions: Vec<Vec2> = sim.obstacles().map(|o| o.pos).collect();

        assert_eq!(sim.update(&TickInput { jump: true }, now + 10_000.0), TickReport::default());
        assert_eq!(sim.poll_spawn_timer(now + 10_000.0), 0);
        assert!(sim.spawn_obstacle().is_none());
        assert_eq!(sim.score(), score);
        assert_eq!(sim.obstacles().map(|o| o.pos).collect::<Vec<_>>(), positions);
    }

    #[test]
    fn test_band_obstacles_pass_over_grounded_player() {
        let mut sim = sim_without_initial();
        let mut now = 0.0;
        for _ in 0..2000 {
            now += FRAME;
            sim.poll_spawn_timer(now);
            let report = sim.update(&TickInput::default(), now);
            assert!(report.hit_by.is_none());
            let player = sim.player().unwrap();
            assert!(player.pos.y <= player.ground_level());
        }
        assert_eq!(sim.phase(), SimPhase::Running);
        assert!(sim.obstacles_spawned() > 10);
        // Nothing that has left the screen is still tracked
        assert!(sim.obstacles().all(|o| o.pos.x >= 0.0));
    }

    #[test]
    fn test_render_running_frame() {
        let mut sim = sim_without_initial();
        sim.spawn_obstacle();
        sim.spawn_obstacle();

        let mut list = DrawList::new();
        sim.render(&mut list);
        let commands = list.commands();

        assert_eq!(commands[0], DrawCommand::Clear);
        assert!(matches!(commands[1], DrawCommand::Circle { color, .. } if color == colors::PLAYER));
        assert_eq!(list.circles().count(), 3);
        assert_eq!(
            commands.last(),
            Some(&DrawCommand::Text {
                text: "Score: 0".to_string(),
                pos: Vec2::new(10.0, 30.0),
                style: TextStyle::HUD,
            })
        );
    }

    #[test]
    fn test_render_game_over_draws_banner_only() {
        let mut sim = Simulation::new(Settings::default(), viewport(), 3).unwrap();
        sim.init(0.0);
        let mut now = 0.0;
        while sim.phase() == SimPhase::Running {
            now += FRAME;
            sim.update(&TickInput::default(), now);
        }

        let mut list = DrawList::new();
        sim.render(&mut list);
        assert_eq!(
            list.commands(),
            &[DrawCommand::Text {
                text: "Game Over".to_string(),
                pos: Vec2::new(400.0, 300.0),
                style: TextStyle::BANNER,
            }]
        );
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = sim_without_initial();
        let mut b = sim_without_initial();
        for _ in 0..10 {
            a.spawn_obstacle();
            b.spawn_obstacle();
        }
        let ya: Vec<f32> = a.obstacles().map(|o| o.pos.y).collect();
        let yb: Vec<f32> = b.obstacles().map(|o| o.pos.y).collect();
        assert_eq!(ya, yb);
    }

    proptest! {
        #[test]
        fn prop_score_never_decreases(steps in proptest::collection::vec(1.0f64..3000.0, 1..100)) {
            let mut sim = sim_without_initial();
            let mut now = 0.0;
            let mut last = 0;
            for step in steps {
                now += step;
                sim.poll_spawn_timer(now);
                sim.update(&TickInput::default(), now);
                prop_assert!(sim.score() >= last);
                prop_assert!(sim.score() - last <= 1);
                last = sim.score();
            }
        }
    }
}
