//! Proximity sensor - 360° "чувство тела", независимо от FOV.
//!
//! Обрабатываем только первый подходящий hit за тик (одного достаточно).

use bevy::prelude::*;

use super::signal::clamp01;
use crate::world::WorldQuery;

/// Высота глаз наблюдателя / груди цели для occlusion line test
const EYE_HEIGHT: f32 = 1.6;
const CHEST_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityHit {
    pub entity: Entity,
    pub position: Vec3,
    /// 1 - distance/radius
    pub strength: f32,
}

#[derive(Debug, Clone)]
pub struct ProximitySensor {
    pub radius: f32,
    pub target_mask: u32,
    /// 0 - occlusion игнорируется
    pub obstruction_mask: u32,
}

impl ProximitySensor {
    pub fn sense(&self, origin: Vec3, owner: Option<Entity>, world: &dyn WorldQuery) -> Option<ProximityHit> {
        if self.radius <= 0.0 {
            return None;
        }

        for entity in world.overlap_sphere(origin, self.radius, self.target_mask) {
            if Some(entity) == owner {
                continue;
            }
            let Some(target) = world.target(entity) else {
                continue;
            };

            if self.obstruction_mask != 0
                && world.line_blocked(
                    origin + Vec3::Y * EYE_HEIGHT,
                    target.position + Vec3::Y * CHEST_HEIGHT,
                    self.obstruction_mask,
                )
            {
                continue;
            }

            let distance = origin.distance(target.position);
            return Some(ProximityHit {
                entity,
                position: target.position,
                strength: 1.0 - clamp01(distance / self.radius),
            });
        }

        None
    }
}
