//! Perception: сенсоры превращают события мира в `Signal`.
//!
//! - vision: polling конуса обзора (интервал + sticky FOV)
//! - hearing: подписчик `NoiseBus`
//! - proximity: 360° ping вплотную
//! - noise: broadcast topic для шумов

pub mod hearing;
pub mod noise;
pub mod proximity;
pub mod signal;
pub mod vision;

pub use hearing::HearingSensor;
pub use noise::{emit_noise, NoiseBus, NoiseEvent, NoiseSubscription};
pub use proximity::{ProximityHit, ProximitySensor};
pub use signal::{Signal, SignalKind};
pub use vision::{vision_strength, VisionSensor};
