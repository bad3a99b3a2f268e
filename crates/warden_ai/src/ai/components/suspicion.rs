//! Suspicion: единый скаляр тревоги агента.

use bevy::prelude::*;

pub const SUSPICION_MAX: f32 = 100.0;

/// Всегда в `[0, 100]`
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Reflect)]
pub struct Suspicion(f32);

impl Suspicion {
    pub fn new(value: f32) -> Self {
        Self(sanitize(value))
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Прирост от сигнала (`strength * gain`), насыщается в 100.
    /// NaN и отрицательные приросты игнорируются.
    pub fn add(&mut self, amount: f32) {
        if amount > 0.0 {
            self.0 = sanitize(self.0 + amount);
        }
    }

    /// Непрерывное остывание
    pub fn decay(&mut self, per_second: f32, dt: f32) {
        let amount = per_second * dt;
        if amount.is_finite() && amount > 0.0 {
            self.0 = sanitize(self.0 - amount);
        }
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, SUSPICION_MAX)
    }
}
