//! NavDirective: навигационная цель, выбранная планировщиком на этот тик.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavDirective {
    Idle,
    /// Выглянуть в сторону точки (ring sampling вокруг себя)
    Peek(Vec3),
    Investigate(Vec3),
    SearchSpiral(Vec3),
    Intercept {
        target_position: Vec3,
        target_velocity: Vec3,
    },
    KeepDistance {
        target: Entity,
        min: f32,
        max: f32,
        orbit: bool,
    },
}

impl NavDirective {
    pub fn name(&self) -> &'static str {
        match self {
            NavDirective::Idle => "Idle",
            NavDirective::Peek(_) => "Peek",
            NavDirective::Investigate(_) => "Investigate",
            NavDirective::SearchSpiral(_) => "SearchSpiral",
            NavDirective::Intercept { .. } => "Intercept",
            NavDirective::KeepDistance { .. } => "KeepDistance",
        }
    }
}

impl Default for NavDirective {
    fn default() -> Self {
        Self::Idle
    }
}
