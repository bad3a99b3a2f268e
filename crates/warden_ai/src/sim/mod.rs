//! Headless мир для прогонов без движка: WorldQuery, PathfindingAgent,
//! scripted цели. Не navigation service - минимальная замена для тестов и demo.

pub mod nav_agent;
pub mod scripted;
pub mod systems;
pub mod world;

pub use nav_agent::{NavArea, SimNavAgent};
pub use scripted::{emit_footstep_noise, move_scripted_targets, NoiseEmitter, Perceivable, ScriptedMover};
pub use systems::{step_nav_agents, sync_sim_world};
pub use world::{Obstacle, SimTarget, SimWorld};
