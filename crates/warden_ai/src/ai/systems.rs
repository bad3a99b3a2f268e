//! ECS системы AI: подписка на шум и тик агентов.

use bevy::prelude::*;

use super::agent::{AgentContext, EnemyAgent};
use crate::navigation::PathfindingAgent;
use crate::perception::NoiseBus;
use crate::sim::{SimNavAgent, SimWorld};
use crate::world::WorldQuery;

/// Система: enabled агенты без подписки → подписать на NoiseBus
pub fn attach_hearing_sensors(bus: Res<NoiseBus>, mut agents: Query<&mut EnemyAgent>) {
    for mut agent in agents.iter_mut() {
        if agent.is_enabled() && !agent.is_listening() {
            agent.enable(&bus);
        }
    }
}

/// Система: один `update` на агента за fixed tick
pub fn tick_enemy_agents(
    time: Res<Time>,
    world: Res<SimWorld>,
    noise: Res<NoiseBus>,
    mut agents: Query<(&mut Transform, &mut EnemyAgent, Option<&mut SimNavAgent>)>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();
    let world: &dyn WorldQuery = &*world;

    for (mut transform, mut agent, mut nav) in agents.iter_mut() {
        if let Some(nav) = nav.as_deref_mut() {
            nav.sync_position(transform.translation);
        }

        let mut ctx = AgentContext {
            now,
            transform: &mut *transform,
            nav: nav.as_deref_mut().map(|n| n as &mut dyn PathfindingAgent),
            world: Some(world),
            noise: Some(&*noise),
        };
        agent.update(dt, &mut ctx);
    }
}
