//! ECS системы headless мира: синхронизация SimWorld и шаг nav агентов.

use bevy::prelude::*;

use super::nav_agent::SimNavAgent;
use super::scripted::{Perceivable, ScriptedMover};
use super::world::SimWorld;

/// Система: Perceivable entities → SimWorld (позиция + скорость).
/// Despawn'нутые entity удаляются из мира.
pub fn sync_sim_world(
    mut world: ResMut<SimWorld>,
    perceivables: Query<(Entity, &Transform, &Perceivable, Option<&ScriptedMover>)>,
) {
    world.retain_targets(|entity| perceivables.contains(entity));

    for (entity, transform, perceivable, mover) in perceivables.iter() {
        world.upsert_target(
            entity,
            transform.translation,
            mover.map(|m| m.velocity()),
            perceivable.layer,
        );
    }
}

/// Система: движение nav агентов к их destination
pub fn step_nav_agents(time: Res<Time>, mut agents: Query<(&mut Transform, &mut SimNavAgent)>) {
    let dt = time.delta_secs();
    for (mut transform, mut nav) in agents.iter_mut() {
        nav.step(dt, &mut transform);
    }
}
