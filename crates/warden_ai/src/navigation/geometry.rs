//! Геометрия навигационных behaviors (чистые функции, без состояния агента).
//!
//! Проходимость проверяется через `sample`: `(point, max_distance) -> Option<point>`
//! (обычно `PathfindingAgent::sample_position`).

use bevy::prelude::*;
use std::f32::consts::TAU;

/// Golden angle - равномерное покрытие площади спиралью
pub const GOLDEN_ANGLE_DEG: f32 = 137.5;

/// Минимальная скорость для lead prediction (деление на ноль)
pub const INTERCEPT_MIN_SPEED: f32 = 0.01;

/// На сколько секунд вперёд смещается orbit точка
pub const ORBIT_LOOKAHEAD: f32 = 1.0;

fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Ring sampling вокруг `origin`, первый sample смотрит на target.
/// Выбирает проходимый sample с максимальным dot(dir, to_target).
pub fn peek_point(
    origin: Vec3,
    target: Vec3,
    radius: f32,
    samples: u32,
    tolerance: f32,
    sample: impl Fn(Vec3, f32) -> Option<Vec3>,
) -> Option<Vec3> {
    let to_target = flat(target - origin);
    let to_target_dir = to_target.normalize_or_zero();
    let base_angle = f32::atan2(to_target.x, to_target.z);

    let mut best: Option<(f32, Vec3)> = None;

    for i in 0..samples {
        let angle = base_angle + (i as f32 / samples as f32) * TAU;
        let dir = Vec3::new(angle.sin(), 0.0, angle.cos());

        let Some(hit) = sample(origin + dir * radius, tolerance) else {
            continue;
        };

        let score = dir.dot(to_target_dir);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, hit));
        }
    }

    best.map(|(_, point)| point)
}

/// Предрасчитанные waypoints спирали + курсор
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiralPlan {
    pub center: Vec3,
    waypoints: Vec<Vec3>,
    cursor: usize,
}

impl SpiralPlan {
    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Сдвинуть курсор, вернуть следующий waypoint (`None` - спираль пройдена)
    pub fn advance(&mut self) -> Option<Vec3> {
        if self.cursor < self.waypoints.len() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.waypoints.len()
    }
}

/// Golden-angle спираль: `angle += 137.5°`, `radius = step * (i + 1)`,
/// каждая точка snap'ается на navmesh, непроходимые пропускаются.
pub fn build_spiral(
    center: Vec3,
    step: f32,
    max_steps: u32,
    tolerance: f32,
    sample: impl Fn(Vec3, f32) -> Option<Vec3>,
) -> SpiralPlan {
    let golden = GOLDEN_ANGLE_DEG.to_radians();
    let mut angle = 0.0_f32;
    let mut waypoints = Vec::with_capacity(max_steps as usize);

    for i in 0..max_steps {
        let radius = (i + 1) as f32 * step;
        angle += golden;
        let offset = Vec3::new(angle.cos(), 0.0, angle.sin()) * radius;

        if let Some(hit) = sample(center + offset, tolerance) {
            waypoints.push(hit);
        }
    }

    SpiralPlan {
        center,
        waypoints,
        cursor: 0,
    }
}

/// Простой lead: `t = distance / speed`, цель движется с постоянной скоростью
pub fn intercept_point(self_position: Vec3, self_speed: f32, target_position: Vec3, target_velocity: Vec3) -> Vec3 {
    let time_to_reach = self_position.distance(target_position) / self_speed.max(INTERCEPT_MIN_SPEED);
    target_position + target_velocity * time_to_reach
}

/// Решение KeepDistance для текущей дистанции
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BandStep {
    /// Слишком близко - точка на дальнем кольце `min`
    Retreat(Vec3),
    /// Слишком далеко - точка чуть внутри `min` с нашей стороны
    Approach(Vec3),
    InBand,
}

/// Горизонтальная дистанция до цели vs band `[min, max]` (± epsilon).
/// `min > max` приводится к валидному порядку.
pub fn band_step(self_position: Vec3, target_position: Vec3, min: f32, max: f32, epsilon: f32) -> BandStep {
    let (min, max) = ordered_band(min, max);
    let offset = flat(self_position - target_position);
    let distance = offset.length();
    // Стоим ровно на цели - отходим по +X
    let away = offset.try_normalize().unwrap_or(Vec3::X);

    if distance < min - epsilon {
        BandStep::Retreat(target_position + away * min)
    } else if distance > max + epsilon {
        BandStep::Approach(target_position + away * (min - epsilon).max(0.0))
    } else {
        BandStep::InBand
    }
}

pub fn ordered_band(min: f32, max: f32) -> (f32, f32) {
    let min = min.max(0.0);
    let max = max.max(0.0);
    if min <= max {
        (min, max)
    } else {
        (max, min)
    }
}

/// Параметры орбиты вокруг цели
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitShape {
    /// Базовый радиус (середина band'а)
    pub radius: f32,
    pub angular_speed_deg: f32,
    pub jitter: f32,
    pub jitter_hz: f32,
    /// Разводит агентов между собой
    pub phase: f32,
}

/// Медленно вращающаяся точка вокруг цели: постоянная угловая скорость
/// + синусоидальный jitter радиуса.
pub fn orbit_point(self_position: Vec3, target_position: Vec3, shape: &OrbitShape, now: f32) -> Vec3 {
    let offset = flat(self_position - target_position);
    let bearing = f32::atan2(offset.z, offset.x);
    let angle = bearing + shape.angular_speed_deg.to_radians() * ORBIT_LOOKAHEAD;
    let wobble = shape.jitter * (TAU * shape.jitter_hz * now + shape.phase).sin();
    let radius = (shape.radius + wobble).max(0.0);

    target_position + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius
}
