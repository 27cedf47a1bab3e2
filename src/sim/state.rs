//! Simulation phase and entity types

use glam::Vec2;

use super::arena::Lifecycle;
use super::collision::Collider;
use crate::renderer::{Surface, colors};
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Constructed, not yet initialized
    Start,
    /// Active gameplay
    Running,
    /// Player was hit; terminal
    GameOver,
}

/// The astronaut
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    pub radius: f32,
    ground_level: f32,
    gravity: f32,
    jump_velocity: f32,
}

impl Player {
    /// Player standing on the ground at column `x`
    pub fn new(x: f32, ground_level: f32, settings: &Settings) -> Self {
        Self {
            pos: Vec2::new(x, ground_level),
            vel_y: 0.0,
            grounded: true,
            radius: settings.player_radius,
            ground_level,
            gravity: settings.gravity,
            jump_velocity: settings.jump_velocity,
        }
    }

    pub fn ground_level(&self) -> f32 {
        self.ground_level
    }

    /// Apply gravity while airborne, then pin to the ground
    pub fn update(&mut self) {
        if !self.grounded {
            self.vel_y += self.gravity;
            self.pos.y += self.vel_y;
        }

        if self.pos.y > self.ground_level {
            self.pos.y = self.ground_level;
            self.vel_y = 0.0;
            self.grounded = true;
        }
    }

    /// Leave the ground. Does nothing while airborne.
    pub fn jump(&mut self) {
        if self.grounded {
            self.vel_y = self.jump_velocity;
            self.grounded = false;
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.pos, self.radius, colors::PLAYER);
    }
}

impl Collider for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// An asteroid drifting left
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, speed: f32, radius: f32) -> Self {
        Self {
            id,
            pos,
            speed,
            radius,
        }
    }

    /// Move left; expires once past the left edge
    pub fn update(&mut self) -> Lifecycle {
        self.pos.x -= self.speed;
        if self.pos.x < 0.0 {
            Lifecycle::Expired
        } else {
            Lifecycle::Alive
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.pos, self.radius, colors::OBSTACLE);
    }
}

impl Collider for Obstacle {
    fn center(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Anything living in the simulation
#[derive(Debug, Clone)]
pub enum Entity {
    Player(Player),
    Obstacle(Obstacle),
}

impl Entity {
    pub fn update(&mut self) -> Lifecycle {
        match self {
            Entity::Player(player) => {
                player.update();
                Lifecycle::Alive
            }
            Entity::Obstacle(obstacle) => obstacle.update(),
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        match self {
            Entity::Player(player) => player.render(surface),
            Entity::Obstacle(obstacle) => obstacle.render(surface),
        }
    }

    /// The obstacle, if this entity is one (candidates for the hit test)
    pub fn as_obstacle(&self) -> Option<&Obstacle> {
        match self {
            Entity::Obstacle(obstacle) => Some(obstacle),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match self {
            Entity::Player(player) => Some(player),
            _ => None,
        }
    }
}
