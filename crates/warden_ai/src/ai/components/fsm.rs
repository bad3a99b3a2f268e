//! AI FSM: Idle → Investigate → Hunt, управляется только suspicion.

use bevy::prelude::*;

use crate::config::SuspicionConfig;

/// AI состояния (чистая функция suspicion vs два порога, без hysteresis)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum AIState {
    /// Ничего подозрительного
    #[default]
    Idle,

    /// Что-то видели/слышали - идём проверять
    Investigate,

    /// Уверены в цели - преследуем / держим дистанцию
    Hunt,
}

impl AIState {
    /// `Hunt` если `suspicion >= hunt`, иначе `Investigate` если `>= investigate`, иначе `Idle`
    pub fn from_suspicion(suspicion: f32, thresholds: &SuspicionConfig) -> Self {
        if suspicion >= thresholds.hunt_threshold {
            AIState::Hunt
        } else if suspicion >= thresholds.investigate_threshold {
            AIState::Investigate
        } else {
            AIState::Idle
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AIState::Idle => "Idle",
            AIState::Investigate => "Investigate",
            AIState::Hunt => "Hunt",
        }
    }
}
