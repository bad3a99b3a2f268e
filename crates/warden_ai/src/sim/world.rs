//! SimWorld: headless WorldQuery: perceivable targets + AABB препятствия.
//!
//! Порядок targets = порядок регистрации (детерминированный overlap).

use bevy::prelude::*;

use crate::world::layers::layer_name;
use crate::world::{TargetState, WorldQuery};

/// Axis-aligned box на заданном layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub min: Vec3,
    pub max: Vec3,
    pub layer: u32,
}

impl Obstacle {
    pub fn new(center: Vec3, half_extents: Vec3, layer: u32) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
            layer,
        }
    }

    /// Проекция на плоскость XZ (высота игнорируется)
    pub fn contains_flat(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Slab test: пересекает ли отрезок `from → to` коробку
    pub fn intersects_segment(&self, from: Vec3, to: Vec3) -> bool {
        let delta = to - from;
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for axis in 0..3 {
            let origin = from[axis];
            let d = delta[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() < 1e-6 {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }

            let inv = 1.0 / d;
            let (t1, t2) = {
                let a = (lo - origin) * inv;
                let b = (hi - origin) * inv;
                if a <= b { (a, b) } else { (b, a) }
            };
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTarget {
    pub entity: Entity,
    pub position: Vec3,
    pub velocity: Option<Vec3>,
    pub layer: u32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct SimWorld {
    targets: Vec<SimTarget>,
    obstacles: Vec<Obstacle>,
}

impl SimWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn targets(&self) -> &[SimTarget] {
        &self.targets
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        crate::log(&format!(
            "🧱 Obstacle {:?}..{:?} on layer {}",
            obstacle.min,
            obstacle.max,
            layer_name(obstacle.layer)
        ));
        self.obstacles.push(obstacle);
    }

    /// Вставить или обновить (позиция в списке сохраняется)
    pub fn upsert_target(&mut self, entity: Entity, position: Vec3, velocity: Option<Vec3>, layer: u32) {
        let target = SimTarget {
            entity,
            position,
            velocity,
            layer,
        };
        match self.targets.iter_mut().find(|t| t.entity == entity) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn remove_target(&mut self, entity: Entity) -> bool {
        let before = self.targets.len();
        self.targets.retain(|t| t.entity != entity);
        self.targets.len() != before
    }

    /// Оставить только живые entity (despawn → пропадает из мира)
    pub fn retain_targets(&mut self, mut alive: impl FnMut(Entity) -> bool) {
        self.targets.retain(|t| alive(t.entity));
    }
}

impl WorldQuery for SimWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: u32) -> Vec<Entity> {
        self.targets
            .iter()
            .filter(|t| t.layer & mask != 0 && t.position.distance(center) <= radius)
            .map(|t| t.entity)
            .collect()
    }

    fn line_blocked(&self, from: Vec3, to: Vec3, mask: u32) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.layer & mask != 0 && o.intersects_segment(from, to))
    }

    fn target(&self, entity: Entity) -> Option<TargetState> {
        self.targets
            .iter()
            .find(|t| t.entity == entity)
            .map(|t| TargetState {
                position: t.position,
                velocity: t.velocity,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::layers::{LAYER_ACTORS, LAYER_ENVIRONMENT, LAYER_PROPS, MASK_VISION_OCCLUSION};

    fn wall() -> Obstacle {
        // Стена поперёк оси X на x = 5
        Obstacle::new(Vec3::new(5.0, 1.5, 0.0), Vec3::new(0.25, 1.5, 4.0), LAYER_ENVIRONMENT)
    }

    #[test]
    fn test_segment_through_wall_is_blocked() {
        let mut world = SimWorld::new();
        world.add_obstacle(wall());

        assert!(world.line_blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(10.0, 1.0, 0.0), MASK_VISION_OCCLUSION));
        // Над стеной
        assert!(!world.line_blocked(Vec3::new(0.0, 4.0, 0.0), Vec3::new(10.0, 4.0, 0.0), MASK_VISION_OCCLUSION));
        // В обход
        assert!(!world.line_blocked(Vec3::new(0.0, 1.0, 6.0), Vec3::new(10.0, 1.0, 6.0), MASK_VISION_OCCLUSION));
        // Не доходит до стены
        assert!(!world.line_blocked(Vec3::new(0.0, 1.0, 0.0), Vec3::new(4.0, 1.0, 0.0), MASK_VISION_OCCLUSION));
    }

    #[test]
    fn test_mask_filters_obstacles() {
        let mut world = SimWorld::new();
        world.add_obstacle(Obstacle::new(Vec3::new(5.0, 1.0, 0.0), Vec3::splat(1.0), LAYER_PROPS));

        let from = Vec3::new(0.0, 1.0, 0.0);
        let to = Vec3::new(10.0, 1.0, 0.0);
        assert!(world.line_blocked(from, to, LAYER_PROPS));
        assert!(!world.line_blocked(from, to, LAYER_ENVIRONMENT));
    }

    #[test]
    fn test_overlap_respects_radius_layer_and_order() {
        let mut world = SimWorld::new();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let prop = Entity::from_raw(3);
        world.upsert_target(a, Vec3::new(3.0, 0.0, 0.0), None, LAYER_ACTORS);
        world.upsert_target(b, Vec3::new(0.0, 0.0, 2.0), Some(Vec3::X), LAYER_ACTORS);
        world.upsert_target(prop, Vec3::ZERO, None, LAYER_PROPS);

        assert_eq!(world.overlap_sphere(Vec3::ZERO, 5.0, LAYER_ACTORS), vec![a, b]);
        assert_eq!(world.overlap_sphere(Vec3::ZERO, 2.5, LAYER_ACTORS), vec![b]);

        // Update не меняет порядок
        world.upsert_target(a, Vec3::new(1.0, 0.0, 0.0), None, LAYER_ACTORS);
        assert_eq!(world.overlap_sphere(Vec3::ZERO, 5.0, LAYER_ACTORS), vec![a, b]);
        assert_eq!(world.target(b).map(|t| t.velocity_or_zero()), Some(Vec3::X));
    }

    #[test]
    fn test_removed_target_is_gone() {
        let mut world = SimWorld::new();
        let a = Entity::from_raw(1);
        world.upsert_target(a, Vec3::ZERO, None, LAYER_ACTORS);

        assert!(world.remove_target(a));
        assert!(world.target(a).is_none());
        assert!(!world.remove_target(a));
    }
}
