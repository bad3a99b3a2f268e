//! Fault taxonomy агента.
//!
//! Ни один fault не выходит за пределы `EnemyAgent::update` - агент логирует
//! и деградирует до `Idle`, чтобы один сломанный NPC не останавливал остальных.

use bevy::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentFault {
    /// Не подключён PathfindingAgent / WorldQuery
    #[error("missing dependency: {0}")]
    MissingDependency(&'static str),

    /// `sample_position` не нашёл проходимую точку рядом с запрошенной
    #[error("unreachable point {point:?} (directive {directive})")]
    UnreachablePoint { point: Vec3, directive: &'static str },

    /// Entity из памяти больше не существует
    #[error("stale target {0:?}")]
    StaleTarget(Entity),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
