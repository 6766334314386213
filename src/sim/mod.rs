//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by obstacle ID)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod event;
pub mod obstacle;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;

pub use actor::{Actor, ImpulseResponse};
pub use collision::{Aabb, Collidable, circle_aabb_collision};
pub use event::{EventBus, EventKind, GameEvent, ListenerId};
pub use obstacle::{ObstaclePair, ObstacleStatus};
pub use session::{GamePhase, GameSession};
pub use spawner::ObstacleSpawner;
pub use state::{ObstacleSnapshot, Scene, SceneSnapshot};
pub use tick::{TickInput, TickReport, restart, tick};
pub use timer::{DeferredTask, Scheduler, TimerId};
