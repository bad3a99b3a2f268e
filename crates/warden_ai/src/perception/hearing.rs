//! Hearing sensor - подписчик NoiseBus.
//!
//! Подписка = свой cursor по `NoiseBus`; события разбираются один раз за тик агента.
//! Occlusion (стена) влияет только на порог слышимости (loudness * 0.5),
//! но НЕ на силу сигнала - так задумано, см. DESIGN.md.

use bevy::prelude::*;

use super::noise::{NoiseBus, NoiseEvent, NoiseSubscription};
use super::signal::{clamp01, Signal};
use crate::config::HearingConfig;
use crate::world::WorldQuery;

#[derive(Debug)]
pub struct HearingSensor {
    config: HearingConfig,
    subscription: Option<NoiseSubscription>,
    last_heard: Option<(Vec3, f32)>,
}

impl HearingSensor {
    pub fn new(config: HearingConfig) -> Self {
        Self {
            config,
            subscription: None,
            last_heard: None,
        }
    }

    pub fn config(&self) -> &HearingConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Шумы, отправленные до подписки, не слышны
    pub fn attach(&mut self, bus: &NoiseBus) {
        if self.subscription.is_none() {
            self.subscription = Some(NoiseSubscription::new(bus));
        }
    }

    pub fn detach(&mut self) {
        self.subscription = None;
    }

    /// Последний принятый шум (debug overlay)
    pub fn last_heard(&self) -> Option<(Vec3, f32)> {
        self.last_heard
    }

    /// Разобрать inbox. `world = None` → occlusion не проверяется.
    pub fn drain(
        &mut self,
        bus: &NoiseBus,
        listener: Vec3,
        owner: Option<Entity>,
        world: Option<&dyn WorldQuery>,
    ) -> Vec<Signal> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Vec::new();
        };

        let events = subscription.drain(bus);
        events
            .into_iter()
            .filter(|event| event.source.is_none() || event.source != owner)
            .filter_map(|event| self.hear(&event, listener, world))
            .collect()
    }

    /// Accept/reject одного шума + strength
    pub fn hear(
        &mut self,
        event: &NoiseEvent,
        listener: Vec3,
        world: Option<&dyn WorldQuery>,
    ) -> Option<Signal> {
        let loudness = clamp01(event.loudness);
        let radius = self.config.max_hear_radius.max(0.0) * loudness;
        if radius < 0.001 || loudness < self.config.min_loudness_to_hear {
            return None;
        }

        let distance = listener.distance(event.position);
        if distance > radius {
            return None;
        }

        // Стена "съедает" половину громкости - но только для порога
        if self.config.obstruction_mask != 0 {
            if let Some(world) = world {
                if world.line_blocked(event.position, listener, self.config.obstruction_mask)
                    && loudness * 0.5 < self.config.min_loudness_to_hear
                {
                    return None;
                }
            }
        }

        let strength = clamp01(1.0 - distance / radius);
        self.last_heard = Some((event.position, event.timestamp));

        Some(Signal::hearing(event.source, event.position, strength, event.timestamp))
    }
}
