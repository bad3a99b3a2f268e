//! Warden AI core
//!
//! Perception → memory → decision → navigation для вражеских NPC на Bevy 0.16.
//!
//! - `perception` - vision / hearing / proximity сенсоры, NoiseBus
//! - `ai` - blackboard, suspicion FSM, planner, target lock, facing, EnemyAgent
//! - `navigation` - NavDirective + EnemyNavigator поверх PathfindingAgent
//! - `world` - WorldQuery (engine-agnostic запросы к миру)
//! - `sim` - headless реализации мира и nav агента
//!
//! Ядро не зависит от движка: физика и pathfinding приходят через трейты.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub mod ai;
pub mod config;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod perception;
pub mod sim;
pub mod world;

// Re-export базовых типов для удобства
pub use ai::{AIState, AgentContext, AgentDebugSnapshot, EnemyAgent};
pub use config::ArchetypeConfig;
pub use error::AgentFault;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, ConsoleLogger, LogLevel, LogPrinter,
};
pub use navigation::{EnemyNavigator, NavDirective, PathfindingAgent};
pub use perception::{NoiseBus, NoiseEvent, Signal, SignalKind};
pub use world::{TargetState, WorldQuery};

/// Главный plugin: ресурсы + FixedUpdate pipeline
///
/// Порядок выполнения (`.chain()` для детерминизма):
/// 1. move_scripted_targets - scripted цели двигаются
/// 2. emit_footstep_noise - шаги → NoiseBus
/// 3. sync_sim_world - Perceivable → SimWorld
/// 4. attach_hearing_sensors - новые агенты подписываются на шум
/// 5. tick_enemy_agents - `EnemyAgent::update`
/// 6. step_nav_agents - nav агенты идут к destination
pub struct WardenPlugin;

impl Plugin for WardenPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<NoiseEvent>()
            .init_resource::<sim::SimWorld>()
            .add_systems(
                FixedUpdate,
                (
                    sim::move_scripted_targets,
                    sim::emit_footstep_noise,
                    sim::sync_sim_world,
                    ai::attach_hearing_sensors,
                    ai::tick_enemy_agents,
                    sim::step_nav_agents,
                )
                    .chain(),
            );

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Фаза орбиты [0, 2π) - разводит агентов вокруг одной цели
    pub fn orbit_phase(&mut self) -> f32 {
        self.rng.gen_range(0.0..std::f32::consts::TAU)
    }
}

/// Tick rate headless симуляции
pub const SIM_HZ: f64 = 60.0;

/// Создаёт minimal Bevy App для headless симуляции (WardenPlugin уже подключён).
/// Время ручное: один `app.update()` = ровно один fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIM_HZ)) // 60Hz FixedUpdate
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / SIM_HZ)))
        .add_plugins(WardenPlugin);

    app
}

/// Спавн врага: agent + nav агент, фаза орбиты из DeterministicRng
pub fn spawn_enemy(world: &mut World, archetype: ArchetypeConfig, nav: sim::SimNavAgent, at: Transform) -> Entity {
    let phase = world
        .get_resource_mut::<DeterministicRng>()
        .map(|mut rng| rng.orbit_phase())
        .unwrap_or(0.0);
    let entity = world.spawn((at, nav)).id();
    let agent = EnemyAgent::new(archetype).with_owner(entity).with_orbit_phase(phase);
    world.entity_mut(entity).insert(agent);
    entity
}

/// Snapshot агентов для сравнения детерминизма
/// (сортировка по Entity, сериализация через Debug)
pub fn agent_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &Transform, &EnemyAgent)>();
    let mut agents: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    agents.sort_by_key(|(entity, _, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, transform, agent) in agents {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}{:?}", transform.translation, agent.debug_snapshot()).as_bytes());
    }

    snapshot
}
