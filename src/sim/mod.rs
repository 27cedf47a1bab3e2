//! Simulation module
//!
//! All gameplay logic lives here. No rendering backend or platform
//! dependencies: time comes in as milliseconds, drawing goes out through
//! [`Surface`](crate::renderer::Surface).
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the arena)
//! - Removal deferred until a pass completes

pub mod arena;
pub mod clock;
pub mod collision;
pub mod state;
pub mod tick;

pub use arena::{Arena, Handle, Lifecycle};
pub use clock::{IntervalTimer, ScoreClock};
pub use collision::{Collider, circles_overlap};
pub use state::{Entity, Obstacle, Player, SimPhase};
pub use tick::{Simulation, TickInput, TickReport};
