//! World services - read-only запросы к миру (overlap, line test, target accessor).
//!
//! Ядро AI не знает про физику: движок (или `sim::SimWorld` в headless) реализует
//! `WorldQuery`, агент получает его на каждый тик через `AgentContext`.

use bevy::prelude::*;

pub mod layers;

pub use layers::*;

/// Живое состояние отслеживаемой entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetState {
    pub position: Vec3,
    /// `None` - у entity нет rigidbody/скорости (трактуем как ноль)
    pub velocity: Option<Vec3>,
}

impl TargetState {
    pub fn velocity_or_zero(&self) -> Vec3 {
        self.velocity.unwrap_or(Vec3::ZERO)
    }
}

pub trait WorldQuery {
    /// Все entity на слоях `mask` в радиусе от `center`
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<Entity>;

    /// `true` если отрезок `from → to` пересекает что-то на слоях `mask`
    fn line_blocked(&self, from: Vec3, to: Vec3, mask: u32) -> bool;

    /// `None` если entity уничтожена (lookup не должен паниковать)
    fn target(&self, entity: Entity) -> Option<TargetState>;
}
