//! Vision sensor - polling конуса обзора.
//!
//! Каждые `check_interval` секунд: overlap по target layer → угол → occlusion ray.
//! Все подходящие кандидаты эмитят сигнал независимо (выбор цели - дело blackboard'а).

use bevy::prelude::*;

use super::signal::{clamp01, Signal};
use crate::config::VisionConfig;
use crate::world::WorldQuery;

#[derive(Debug, Clone)]
pub struct VisionSensor {
    config: VisionConfig,
    timer: f32,
    /// До этого момента FOV расширен на `sticky_fov_boost_deg`
    sticky_until: Option<f32>,
}

impl VisionSensor {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            timer: 0.0,
            sticky_until: None,
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Текущий half-angle (с учётом sticky boost), градусы
    pub fn effective_view_angle(&self, now: f32) -> f32 {
        let boosted = matches!(self.sticky_until, Some(until) if now < until);
        let angle = if boosted {
            self.config.view_angle_deg + self.config.sticky_fov_boost_deg
        } else {
            self.config.view_angle_deg
        };
        angle.clamp(0.0, 180.0)
    }

    /// Накапливает `dt`, сканирует когда истёк интервал
    pub fn poll(
        &mut self,
        dt: f32,
        now: f32,
        eye: &Transform,
        observer: Option<Entity>,
        world: &dyn WorldQuery,
    ) -> Vec<Signal> {
        self.timer += dt;
        if self.timer < self.config.check_interval {
            return Vec::new();
        }
        self.timer = 0.0;
        self.scan(now, eye, observer, world)
    }

    pub fn scan(
        &mut self,
        now: f32,
        eye: &Transform,
        observer: Option<Entity>,
        world: &dyn WorldQuery,
    ) -> Vec<Signal> {
        let origin = eye.translation;
        let forward = eye.rotation * Vec3::NEG_Z;
        let effective_angle = self.effective_view_angle(now);

        let candidates = world.overlap_sphere(origin, self.config.view_radius, self.config.target_mask);
        let mut signals = Vec::new();

        for candidate in candidates {
            if Some(candidate) == observer {
                continue;
            }
            let Some(target) = world.target(candidate) else {
                continue;
            };

            let to_target = target.position - origin;
            let distance = to_target.length();
            if distance <= 0.001 {
                continue;
            }

            let direction = to_target / distance;
            let angle = forward.angle_between(direction).to_degrees();
            if angle > effective_angle {
                continue;
            }

            // Line-of-sight
            if self.config.obstruction_mask != 0
                && world.line_blocked(origin, target.position, self.config.obstruction_mask)
            {
                continue;
            }

            let strength = vision_strength(
                distance,
                self.config.view_radius,
                angle,
                effective_angle,
                self.config.edge_falloff,
            );

            signals.push(Signal::vision(
                candidate,
                target.position,
                target.velocity_or_zero(),
                strength,
                now,
            ));
            self.sticky_until = Some(now + self.config.sticky_fov_time);
        }

        signals
    }
}

/// Ближе + центральнее = сильнее
pub fn vision_strength(
    distance: f32,
    view_radius: f32,
    angle_deg: f32,
    effective_angle_deg: f32,
    edge_falloff: f32,
) -> f32 {
    let distance_factor = if view_radius > 0.0 {
        1.0 - clamp01(distance / view_radius)
    } else {
        0.0
    };
    // 0 центр .. 1 край
    let angle_norm = if effective_angle_deg > 0.0 {
        clamp01(angle_deg / effective_angle_deg)
    } else {
        1.0
    };
    let angle_factor = 1.0 - edge_falloff * angle_norm;

    clamp01(distance_factor * angle_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TargetState;

    struct OneTarget {
        entity: Entity,
        state: TargetState,
        blocked: bool,
    }

    impl WorldQuery for OneTarget {
        fn overlap_sphere(&self, center: Vec3, radius: f32, _mask: u32) -> Vec<Entity> {
            if center.distance(self.state.position) <= radius {
                vec![self.entity]
            } else {
                Vec::new()
            }
        }

        fn line_blocked(&self, _from: Vec3, _to: Vec3, _mask: u32) -> bool {
            self.blocked
        }

        fn target(&self, entity: Entity) -> Option<TargetState> {
            (entity == self.entity).then_some(self.state)
        }
    }

    fn world_with_target_at(position: Vec3) -> OneTarget {
        OneTarget {
            entity: Entity::from_raw(1),
            state: TargetState {
                position,
                velocity: Some(Vec3::X),
            },
            blocked: false,
        }
    }

    #[test]
    fn test_target_straight_ahead_is_seen() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let world = world_with_target_at(Vec3::new(0.0, 0.0, -10.0));

        let signals = sensor.scan(1.0, &Transform::IDENTITY, None, &world);

        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].source, Some(world.entity));
        assert_eq!(signals[0].velocity, Vec3::X);
        // 1 - 10/25 = 0.6, центр конуса → без штрафа
        assert!((signals[0].strength - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_target_behind_is_ignored() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let world = world_with_target_at(Vec3::new(0.0, 0.0, 10.0));

        assert!(sensor.scan(1.0, &Transform::IDENTITY, None, &world).is_empty());
    }

    #[test]
    fn test_occluded_target_is_ignored() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let mut world = world_with_target_at(Vec3::new(0.0, 0.0, -5.0));
        world.blocked = true;

        assert!(sensor.scan(1.0, &Transform::IDENTITY, None, &world).is_empty());
    }

    #[test]
    fn test_sticky_fov_widens_after_sighting() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let ahead = world_with_target_at(Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(sensor.effective_view_angle(0.0), 75.0);

        sensor.scan(0.0, &Transform::IDENTITY, None, &ahead);
        assert_eq!(sensor.effective_view_angle(0.5), 95.0);

        // 85° от forward: вне базового конуса, внутри расширенного
        let angle = 85f32.to_radians();
        let side = world_with_target_at(Vec3::new(angle.sin() * 5.0, 0.0, -angle.cos() * 5.0));
        assert_eq!(sensor.scan(0.5, &Transform::IDENTITY, None, &side).len(), 1);

        assert_eq!(sensor.effective_view_angle(10.0), 75.0);
    }

    #[test]
    fn test_poll_respects_interval() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let world = world_with_target_at(Vec3::new(0.0, 0.0, -5.0));

        assert!(sensor.poll(0.05, 0.05, &Transform::IDENTITY, None, &world).is_empty());
        assert_eq!(sensor.poll(0.05, 0.1, &Transform::IDENTITY, None, &world).len(), 1);
        assert!(sensor.poll(0.05, 0.15, &Transform::IDENTITY, None, &world).is_empty());
    }

    #[test]
    fn test_observer_skips_itself() {
        let mut sensor = VisionSensor::new(VisionConfig::default());
        let world = world_with_target_at(Vec3::new(0.0, 0.0, -5.0));

        let signals = sensor.scan(0.0, &Transform::IDENTITY, Some(world.entity), &world);
        assert!(signals.is_empty());
    }

    #[test]
    fn test_edge_falloff_penalises_periphery() {
        let center = vision_strength(5.0, 25.0, 0.0, 75.0, 0.4);
        let edge = vision_strength(5.0, 25.0, 75.0, 75.0, 0.4);
        assert!((center - 0.8).abs() < 1e-5);
        assert!((edge - 0.8 * 0.6).abs() < 1e-5);
    }
}
