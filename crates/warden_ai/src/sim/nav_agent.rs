//! SimNavAgent: минимальный PathfindingAgent для headless прогонов.
//!
//! Прямая линия к цели внутри прямоугольной NavArea, заблокированные
//! коробки непроходимы. Путь строится мгновенно (`path_pending` = false).
//! Упёрлись в препятствие - стоим до следующей директивы.

use bevy::prelude::*;

use super::world::Obstacle;
use crate::navigation::PathfindingAgent;

/// Отступ от края препятствия при snap
const SNAP_MARGIN: f32 = 0.05;

/// Проходимая область в плоскости XZ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl NavArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn square(half_size: f32) -> Self {
        Self::new(Vec2::splat(-half_size), Vec2::splat(half_size))
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }

    pub fn clamp(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y,
            point.z.clamp(self.min.y, self.max.y),
        )
    }
}

#[derive(Component, Debug, Clone)]
pub struct SimNavAgent {
    area: NavArea,
    blocked: Vec<Obstacle>,
    position: Vec3,
    destination: Option<Vec3>,
    velocity: Vec3,
    max_speed: f32,
    stopping_distance: f32,
    update_rotation: bool,
}

impl SimNavAgent {
    pub fn new(area: NavArea, max_speed: f32) -> Self {
        Self {
            area,
            blocked: Vec::new(),
            position: Vec3::ZERO,
            destination: None,
            velocity: Vec3::ZERO,
            max_speed: max_speed.max(0.0),
            stopping_distance: 0.0,
            update_rotation: true,
        }
    }

    pub fn with_blocked(mut self, blocked: Vec<Obstacle>) -> Self {
        self.blocked = blocked;
        self
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn update_rotation(&self) -> bool {
        self.update_rotation
    }

    /// Позиция агента берётся из Transform перед тиком AI
    pub fn sync_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn walkable(&self, point: Vec3) -> bool {
        self.area.contains(point) && !self.blocked.iter().any(|b| b.contains_flat(point))
    }

    /// Сдвиг вдоль пути; Transform обновляется здесь же
    pub fn step(&mut self, dt: f32, transform: &mut Transform) {
        self.position = transform.translation;
        self.velocity = Vec3::ZERO;

        let Some(destination) = self.destination else {
            return;
        };

        let to = Vec3::new(destination.x - self.position.x, 0.0, destination.z - self.position.z);
        let distance = to.length();
        if distance <= self.stopping_distance || distance < 1e-4 {
            return;
        }

        let travel = (self.max_speed * dt.max(0.0)).min(distance - self.stopping_distance.min(distance));
        let direction = to / distance;
        let next = self.position + direction * travel;
        if !self.walkable(next) {
            return;
        }

        if dt > 0.0 {
            self.velocity = direction * (travel / dt);
        }
        self.position = next;
        transform.translation = next;

        if self.update_rotation {
            transform.rotation = Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z));
        }
    }
}

impl PathfindingAgent for SimNavAgent {
    fn set_destination(&mut self, point: Vec3) -> bool {
        if !self.walkable(point) {
            return false;
        }
        self.destination = Some(point);
        true
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.velocity = Vec3::ZERO;
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        false
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| Vec2::new(d.x - self.position.x, d.z - self.position.z).length())
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn speed(&self) -> f32 {
        self.max_speed
    }

    fn is_on_nav_mesh(&self) -> bool {
        self.area.contains(self.position)
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let mut snapped = self.area.clamp(point);

        // Выталкиваем из препятствия через ближайшую грань
        if let Some(block) = self.blocked.iter().find(|b| b.contains_flat(snapped)) {
            let exits = [
                (snapped.x - block.min.x, Vec3::new(block.min.x - SNAP_MARGIN, snapped.y, snapped.z)),
                (block.max.x - snapped.x, Vec3::new(block.max.x + SNAP_MARGIN, snapped.y, snapped.z)),
                (snapped.z - block.min.z, Vec3::new(snapped.x, snapped.y, block.min.z - SNAP_MARGIN)),
                (block.max.z - snapped.z, Vec3::new(snapped.x, snapped.y, block.max.z + SNAP_MARGIN)),
            ];
            snapped = exits
                .iter()
                .filter(|(_, exit)| self.walkable(*exit))
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, exit)| *exit)?;
        }

        let offset = Vec2::new(snapped.x - point.x, snapped.z - point.z).length();
        (offset <= max_distance && self.walkable(snapped)).then_some(snapped)
    }

    fn set_update_rotation(&mut self, enabled: bool) {
        self.update_rotation = enabled;
    }
}
