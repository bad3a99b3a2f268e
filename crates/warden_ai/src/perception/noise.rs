//! Noise bus - broadcast topic для шумов (шаги, выстрелы, двери).
//!
//! Шина = Bevy `Events<NoiseEvent>` (double-buffered, `app.add_event`).
//! Gameplay пишет через `EventWriter<NoiseEvent>`. Каждый hearing sensor
//! держит свой `EventCursor` (`NoiseSubscription`): нет cursor'а = не подписан.
//! Drop подписки = отписка, реестра подписчиков нет.

use bevy::ecs::event::EventCursor;
use bevy::prelude::*;

use super::signal::clamp01;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct NoiseEvent {
    pub position: Vec3,
    /// 0..1
    pub loudness: f32,
    pub source: Option<Entity>,
    pub timestamp: f32,
}

impl NoiseEvent {
    pub fn new(position: Vec3, loudness: f32, source: Option<Entity>, timestamp: f32) -> Self {
        Self {
            position,
            loudness: clamp01(loudness),
            source,
            timestamp,
        }
    }
}

/// Broadcast канал шумов (регистрируется `WardenPlugin` через `add_event`)
pub type NoiseBus = Events<NoiseEvent>;

/// Cursor одного слушателя. Видит только события, отправленные после подписки.
#[derive(Debug)]
pub struct NoiseSubscription {
    cursor: EventCursor<NoiseEvent>,
}

impl NoiseSubscription {
    pub fn new(bus: &NoiseBus) -> Self {
        Self {
            cursor: bus.get_cursor_current(),
        }
    }

    /// Забрать все новые события (в порядке публикации)
    pub fn drain(&mut self, bus: &NoiseBus) -> Vec<NoiseEvent> {
        self.cursor.read(bus).copied().collect()
    }
}

/// Шорткат для кода без `EventWriter` (тесты, демо)
pub fn emit_noise(bus: &mut NoiseBus, position: Vec3, loudness: f32, source: Option<Entity>, now: f32) {
    bus.send(NoiseEvent::new(position, loudness, source, now));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_reads_each_event_once() {
        let mut bus = NoiseBus::default();
        let mut a = NoiseSubscription::new(&bus);
        let mut b = NoiseSubscription::new(&bus);

        emit_noise(&mut bus, Vec3::X, 0.8, None, 1.0);

        assert_eq!(a.drain(&bus).len(), 1);
        assert_eq!(b.drain(&bus).len(), 1);
        assert!(a.drain(&bus).is_empty());
    }

    #[test]
    fn test_late_subscriber_skips_backlog() {
        let mut bus = NoiseBus::default();
        emit_noise(&mut bus, Vec3::ZERO, 1.0, None, 0.0);

        let mut late = NoiseSubscription::new(&bus);
        emit_noise(&mut bus, Vec3::ZERO, 1.0, None, 0.1);

        let heard = late.drain(&bus);
        assert_eq!(heard.len(), 1);
        assert_eq!(heard[0].timestamp, 0.1);
    }

    #[test]
    fn test_events_survive_one_buffer_swap() {
        let mut bus = NoiseBus::default();
        let mut listener = NoiseSubscription::new(&bus);

        emit_noise(&mut bus, Vec3::ZERO, 0.5, None, 0.0);
        bus.update();

        assert_eq!(listener.drain(&bus).len(), 1);
    }

    #[test]
    fn test_loudness_clamped() {
        let event = NoiseEvent::new(Vec3::ZERO, 3.0, None, 0.0);
        assert_eq!(event.loudness, 1.0);
    }
}
