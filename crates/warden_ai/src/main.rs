//! Headless демо Warden AI
//!
//! Игрок идёт мимо двух врагов (ближний бой + стрелок), за стеной шумит шагами.
//! Состояние агентов печатается раз в секунду.

use bevy::prelude::*;
use warden_ai::sim::{NavArea, NoiseEmitter, Obstacle, Perceivable, ScriptedMover, SimNavAgent, SimWorld};
use warden_ai::world::layers::{LAYER_ACTORS, LAYER_ENVIRONMENT};
use warden_ai::{
    create_headless_app, log_info, set_log_level, spawn_enemy, ArchetypeConfig, EnemyAgent, LogLevel, SIM_HZ,
};

const SEED: u64 = 42;
const SECONDS: u32 = 20;

fn main() {
    let mut app = create_headless_app(SEED);
    set_log_level(LogLevel::Info);
    log_info(&format!("Starting Warden AI headless demo (seed: {})", SEED));
    let world = app.world_mut();

    let wall = Obstacle::new(Vec3::new(0.0, 1.5, -6.0), Vec3::new(4.0, 1.5, 0.25), LAYER_ENVIRONMENT);
    if let Some(mut sim) = world.get_resource_mut::<SimWorld>() {
        sim.add_obstacle(wall);
    }

    // Игрок: вдоль стены, потом выходит на открытое место
    world.spawn((
        Transform::from_xyz(-12.0, 0.0, -10.0),
        Perceivable { layer: LAYER_ACTORS },
        ScriptedMover::new(
            vec![
                Vec3::new(0.0, 0.0, -10.0),
                Vec3::new(8.0, 0.0, -4.0),
                Vec3::new(8.0, 0.0, 6.0),
            ],
            2.5,
        ),
        NoiseEmitter::new(0.6, 0.45),
    ));

    let area = NavArea::square(30.0);
    let grunt = spawn_enemy(
        world,
        ArchetypeConfig::melee_grunt(),
        SimNavAgent::new(area, 3.5).with_blocked(vec![wall]),
        Transform::from_xyz(-2.0, 0.0, 0.0),
    );
    let marksman = spawn_enemy(
        world,
        ArchetypeConfig::ranged_marksman(),
        SimNavAgent::new(area, 3.0).with_blocked(vec![wall]),
        Transform::from_xyz(4.0, 0.0, 8.0).looking_at(Vec3::new(4.0, 0.0, -10.0), Vec3::Y),
    );

    let ticks_per_second = SIM_HZ as u32;
    for tick in 0..SECONDS * ticks_per_second {
        app.update();

        if tick % ticks_per_second == 0 {
            let second = tick / ticks_per_second;
            for (name, entity) in [("grunt", grunt), ("marksman", marksman)] {
                let world = app.world();
                let (Some(agent), Some(transform)) = (world.get::<EnemyAgent>(entity), world.get::<Transform>(entity))
                else {
                    continue;
                };
                log_info(&format!(
                    "t={:>2}s {:<8} {:<11} suspicion {:>5.1} directive {:<12} at ({:.1}, {:.1})",
                    second,
                    name,
                    agent.state().as_str(),
                    agent.suspicion(),
                    agent.directive().name(),
                    transform.translation.x,
                    transform.translation.z,
                ));
            }
        }
    }

    log_info("Simulation complete!");
}
