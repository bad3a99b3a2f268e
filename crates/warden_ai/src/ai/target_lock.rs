//! Target lock: "sticky vision" в течение `target_lock_grace` после контакта.
//!
//! Пока lock держится, last known берётся из живой позиции цели (даже без LOS),
//! suspicion получает небольшой trickle, predicted пересчитывается по скорости.

use super::components::{Blackboard, Suspicion, PREDICTION_LEAD};
use crate::config::{MemoryConfig, SuspicionConfig};
use crate::error::AgentFault;
use crate::world::WorldQuery;

/// `Ok(true)` - lock активен и память обновлена.
/// `Err(StaleTarget)` - entity пропала; трактуется как отсутствие сигнала.
pub fn maintain_target_lock(
    blackboard: &mut Blackboard,
    suspicion: &mut Suspicion,
    now: f32,
    dt: f32,
    memory: &MemoryConfig,
    gains: &SuspicionConfig,
    world: &dyn WorldQuery,
) -> Result<bool, AgentFault> {
    let Some(target) = blackboard.current_target else {
        return Ok(false);
    };

    let locked = blackboard
        .seen_age(now)
        .is_some_and(|age| age <= memory.target_lock_grace);
    if !locked {
        return Ok(false);
    }

    let state = world.target(target).ok_or(AgentFault::StaleTarget(target))?;

    blackboard.last_known_position = Some(state.position);
    suspicion.add(dt * gains.lock_trickle_per_sec);

    if let Some(velocity) = state.velocity {
        blackboard.predicted_position = Some(state.position + velocity * PREDICTION_LEAD);
    }

    Ok(true)
}
