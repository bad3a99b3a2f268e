//! FacingController: ручной поворот к цели вблизи или в Hunt.
//!
//! Вдали поворотом управляет steering navmesh агента.

use bevy::prelude::*;

use super::components::AIState;
use crate::config::FacingConfig;

/// Кто управляет поворотом после этого тика
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOwner {
    /// Нечего отслеживать - ничего не меняем
    Unchanged,
    Manual,
    Navigation,
}

#[derive(Debug, Clone)]
pub struct FacingController {
    config: FacingConfig,
}

impl FacingController {
    pub fn new(config: FacingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FacingConfig {
        &self.config
    }

    /// Повернуть `transform` к `look_at` (yaw only) не быстрее `turn_speed_deg`
    pub fn update(&self, transform: &mut Transform, look_at: Option<Vec3>, state: AIState, dt: f32) -> RotationOwner {
        if !self.config.manual_turn_when_near {
            return RotationOwner::Unchanged;
        }
        let Some(look_at) = look_at else {
            return RotationOwner::Unchanged;
        };

        let to = look_at - transform.translation;
        let distance = to.length();
        let flat = Vec3::new(to.x, 0.0, to.z);
        if flat.length_squared() < 1e-4 {
            return RotationOwner::Unchanged;
        }

        if distance > self.config.face_when_within && state != AIState::Hunt {
            return RotationOwner::Navigation;
        }

        let desired = yaw_towards(flat);
        transform.rotation = rotate_towards(transform.rotation, desired, self.config.turn_speed_deg.to_radians() * dt);
        RotationOwner::Manual
    }
}

/// Forward = -Z
pub fn yaw_towards(direction: Vec3) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z))
}

pub fn rotate_towards(from: Quat, to: Quat, max_radians: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= max_radians.max(0.0) || angle < 1e-6 {
        return to;
    }
    from.slerp(to, max_radians.max(0.0) / angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward(transform: &Transform) -> Vec3 {
        transform.rotation * Vec3::NEG_Z
    }

    #[test]
    fn test_yaw_towards_points_forward_at_direction() {
        for direction in [Vec3::X, Vec3::NEG_X, Vec3::Z, Vec3::new(1.0, 0.0, -1.0).normalize()] {
            let facing = yaw_towards(direction) * Vec3::NEG_Z;
            assert!((facing - direction).length() < 1e-4, "{direction:?} → {facing:?}");
        }
    }

    #[test]
    fn test_turn_rate_is_limited() {
        let controller = FacingController::new(FacingConfig::default());
        let mut transform = Transform::IDENTITY;

        let owner = controller.update(&mut transform, Some(Vec3::new(5.0, 0.0, 0.0)), AIState::Investigate, 0.1);

        assert_eq!(owner, RotationOwner::Manual);
        // 540°/s * 0.1 s = 54°
        let turned = Quat::IDENTITY.angle_between(transform.rotation).to_degrees();
        assert!((turned - 54.0).abs() < 0.1, "turned {turned}");
    }

    #[test]
    fn test_turn_completes_and_stays_level() {
        let controller = FacingController::new(FacingConfig::default());
        let mut transform = Transform::IDENTITY;

        for _ in 0..10 {
            controller.update(&mut transform, Some(Vec3::new(5.0, 3.0, 0.0)), AIState::Investigate, 0.1);
        }

        assert!((forward(&transform) - Vec3::X).length() < 1e-3);
    }

    #[test]
    fn test_far_target_hands_rotation_to_navigation() {
        let controller = FacingController::new(FacingConfig::default());
        let mut transform = Transform::IDENTITY;

        let owner = controller.update(&mut transform, Some(Vec3::new(50.0, 0.0, 0.0)), AIState::Investigate, 0.1);

        assert_eq!(owner, RotationOwner::Navigation);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_hunt_faces_at_any_range() {
        let controller = FacingController::new(FacingConfig::default());
        let mut transform = Transform::IDENTITY;

        let owner = controller.update(&mut transform, Some(Vec3::new(50.0, 0.0, 0.0)), AIState::Hunt, 0.1);

        assert_eq!(owner, RotationOwner::Manual);
        assert_ne!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_disabled_or_no_target_changes_nothing() {
        let disabled = FacingController::new(FacingConfig {
            manual_turn_when_near: false,
            ..Default::default()
        });
        let mut transform = Transform::IDENTITY;

        assert_eq!(
            disabled.update(&mut transform, Some(Vec3::X), AIState::Hunt, 0.1),
            RotationOwner::Unchanged
        );
        let enabled = FacingController::new(FacingConfig::default());
        assert_eq!(enabled.update(&mut transform, None, AIState::Hunt, 0.1), RotationOwner::Unchanged);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }
}
