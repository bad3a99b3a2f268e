//! Scripted actors для headless сценариев: движение по waypoints и шаги (шум).

use bevy::prelude::*;

use crate::perception::NoiseEvent;

/// Entity видна AI (попадает в SimWorld на своём layer)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Perceivable {
    pub layer: u32,
}

/// Движение по ломаной с постоянной скоростью
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ScriptedMover {
    pub waypoints: Vec<Vec3>,
    pub speed: f32,
    pub looping: bool,
    cursor: usize,
    velocity: Vec3,
}

impl ScriptedMover {
    pub fn new(waypoints: Vec<Vec3>, speed: f32) -> Self {
        Self {
            waypoints,
            speed: speed.max(0.0),
            looping: false,
            cursor: 0,
            velocity: Vec3::ZERO,
        }
    }

    /// Стоит на месте (видимая неподвижная цель)
    pub fn stationary() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }

    /// Сдвинуть `position` на `speed * dt` вдоль waypoints
    pub fn advance(&mut self, dt: f32, position: Vec3) -> Vec3 {
        let start = position;
        let mut position = position;
        let mut budget = self.speed * dt.max(0.0);

        while budget > 1e-6 {
            let Some(&waypoint) = self.waypoints.get(self.cursor) else {
                break;
            };
            let to = waypoint - position;
            let distance = to.length();

            if distance <= budget {
                position = waypoint;
                budget -= distance;
                self.cursor += 1;
                if self.looping && self.cursor >= self.waypoints.len() {
                    self.cursor = 0;
                    // Петля из одной точки - дальше двигаться некуда
                    if self.waypoints.len() == 1 {
                        break;
                    }
                }
            } else {
                position += to / distance * budget;
                budget = 0.0;
            }
        }

        self.velocity = if dt > 0.0 { (position - start) / dt } else { Vec3::ZERO };
        position
    }
}

/// Периодический шум шагов (только пока entity движется)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct NoiseEmitter {
    pub loudness: f32,
    pub interval: f32,
    timer: f32,
}

impl NoiseEmitter {
    pub fn new(loudness: f32, interval: f32) -> Self {
        Self {
            loudness,
            interval: interval.max(0.01),
            timer: 0.0,
        }
    }

    /// `true` когда пора "шагнуть"
    pub fn tick(&mut self, dt: f32) -> bool {
        self.timer += dt;
        if self.timer < self.interval {
            return false;
        }
        self.timer -= self.interval;
        true
    }
}

/// Система: движение scripted actors
pub fn move_scripted_targets(time: Res<Time>, mut movers: Query<(&mut Transform, &mut ScriptedMover)>) {
    let dt = time.delta_secs();
    for (mut transform, mut mover) in movers.iter_mut() {
        if mover.is_finished() && !mover.looping {
            mover.velocity = Vec3::ZERO;
            continue;
        }
        transform.translation = mover.advance(dt, transform.translation);
    }
}

/// Система: шаги → NoiseBus
pub fn emit_footstep_noise(
    time: Res<Time>,
    mut noise: EventWriter<NoiseEvent>,
    mut emitters: Query<(Entity, &Transform, &mut NoiseEmitter, Option<&ScriptedMover>)>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (entity, transform, mut emitter, mover) in emitters.iter_mut() {
        let moving = mover.is_some_and(|m| m.velocity().length_squared() > 1e-6);
        if !moving {
            continue;
        }
        if emitter.tick(dt) {
            noise.write(NoiseEvent::new(transform.translation, emitter.loudness, Some(entity), now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mover_follows_waypoints() {
        let mut mover = ScriptedMover::new(vec![Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 2.0)], 1.0);

        let p = mover.advance(1.0, Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((mover.velocity() - Vec3::X).length() < 1e-5);

        // Поворот за угол внутри одного шага
        let p = mover.advance(1.5, p);
        assert!((p - Vec3::new(2.0, 0.0, 0.5)).length() < 1e-5);

        let p = mover.advance(5.0, p);
        assert_eq!(p, Vec3::new(2.0, 0.0, 2.0));
        assert!(mover.is_finished());
        assert_eq!(mover.advance(1.0, p), p);
        assert_eq!(mover.velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_looping_mover_wraps() {
        let mut mover = ScriptedMover::new(vec![Vec3::new(1.0, 0.0, 0.0), Vec3::ZERO], 1.0).looping();

        let p = mover.advance(2.5, Vec3::ZERO);

        assert!((p - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
        assert!(!mover.is_finished());
    }

    #[test]
    fn test_emitter_interval() {
        let mut emitter = NoiseEmitter::new(0.6, 0.5);

        let fired: Vec<bool> = (0..6).map(|_| emitter.tick(0.25)).collect();

        assert_eq!(fired, vec![false, true, false, true, false, true]);
    }
}
