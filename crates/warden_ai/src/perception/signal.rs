//! Perception signal - единый формат для зрения и слуха.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SignalKind {
    Vision,
    Hearing,
}

/// Timestamped perception event (производится сенсором, потребляется blackboard'ом один раз)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub kind: SignalKind,
    /// Кто произвёл сигнал (`None` - анонимный шум)
    pub source: Option<Entity>,
    pub position: Vec3,
    /// Для слуха всегда ноль
    pub velocity: Vec3,
    /// 0..1
    pub strength: f32,
    pub timestamp: f32,
}

impl Signal {
    pub fn new(
        kind: SignalKind,
        source: Option<Entity>,
        position: Vec3,
        velocity: Vec3,
        strength: f32,
        timestamp: f32,
    ) -> Self {
        Self {
            kind,
            source,
            position,
            velocity,
            strength: clamp01(strength),
            timestamp,
        }
    }

    pub fn vision(source: Entity, position: Vec3, velocity: Vec3, strength: f32, timestamp: f32) -> Self {
        Self::new(SignalKind::Vision, Some(source), position, velocity, strength, timestamp)
    }

    pub fn hearing(source: Option<Entity>, position: Vec3, strength: f32, timestamp: f32) -> Self {
        Self::new(SignalKind::Hearing, source, position, Vec3::ZERO, strength, timestamp)
    }
}

/// NaN → 0
pub(crate) fn clamp01(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_is_clamped() {
        let entity = Entity::from_raw(7);
        assert_eq!(Signal::vision(entity, Vec3::ZERO, Vec3::ZERO, 1.7, 0.0).strength, 1.0);
        assert_eq!(Signal::hearing(None, Vec3::ZERO, -0.3, 0.0).strength, 0.0);
        assert_eq!(Signal::hearing(None, Vec3::ZERO, f32::NAN, 0.0).strength, 0.0);
    }

    #[test]
    fn test_hearing_has_zero_velocity() {
        let signal = Signal::hearing(None, Vec3::new(1.0, 0.0, 2.0), 0.5, 3.0);
        assert_eq!(signal.kind, SignalKind::Hearing);
        assert_eq!(signal.velocity, Vec3::ZERO);
        assert_eq!(signal.timestamp, 3.0);
    }
}
