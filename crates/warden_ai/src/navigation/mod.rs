//! Navigation: директивы, геометрия и исполнитель поверх navmesh агента.

pub mod agent;
pub mod directive;
pub mod geometry;
pub mod navigator;


pub use agent::PathfindingAgent;
pub use directive::NavDirective;
pub use geometry::{OrbitShape, SpiralPlan};
pub use navigator::{EnemyNavigator, NavMode};
