//! EnemyAgent: сборка sensors + blackboard + FSM + planner + navigator.
//!
//! Один вход `update(dt, ctx)` на тик. Порядок внутри тика фиксирован:
//! sensors → decay → forget → state → plan (cadence) → navigator tick →
//! breadcrumbs → target lock → proximity → facing.
//!
//! Ни один fault не выходит наружу: логируем, деградируем до Idle.

use bevy::prelude::*;

use super::components::{AIState, Blackboard, Suspicion};
use super::facing::{FacingController, RotationOwner};
use super::planner::{plan, PlannerInput};
use super::target_lock::maintain_target_lock;
use crate::config::ArchetypeConfig;
use crate::error::AgentFault;
use crate::navigation::{EnemyNavigator, NavDirective, PathfindingAgent};
use crate::perception::{HearingSensor, NoiseBus, ProximitySensor, Signal, VisionSensor};
use crate::world::WorldQuery;

/// Breadcrumbs только пока агент реально идёт (м/с)
pub const BREADCRUMB_MIN_SPEED: f32 = 0.2;

/// Внешние сервисы на один тик
pub struct AgentContext<'a> {
    pub now: f32,
    pub transform: &'a mut Transform,
    pub nav: Option<&'a mut dyn PathfindingAgent>,
    pub world: Option<&'a dyn WorldQuery>,
    /// `None` - слух молчит в этом тике (подписка не теряется)
    pub noise: Option<&'a NoiseBus>,
}

/// Снимок для debug overlay
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDebugSnapshot {
    pub state: AIState,
    pub suspicion: f32,
    pub directive: NavDirective,
    pub nav_mode: &'static str,
    pub current_target: Option<Entity>,
    pub last_known_position: Option<Vec3>,
    pub last_heard_position: Option<Vec3>,
    /// Последний принятый сенсором шум (позиция, timestamp)
    pub last_noise: Option<(Vec3, f32)>,
    pub predicted_position: Option<Vec3>,
    pub breadcrumbs: Vec<Vec3>,
}

#[derive(Component, Debug)]
pub struct EnemyAgent {
    config: ArchetypeConfig,
    owner: Option<Entity>,

    vision: VisionSensor,
    hearing: HearingSensor,
    proximity: ProximitySensor,
    navigator: EnemyNavigator,
    facing: FacingController,

    blackboard: Blackboard,
    suspicion: Suspicion,
    state: AIState,
    directive: NavDirective,

    enabled: bool,
    /// Время последнего `update` (для внешних `handle_signal`)
    clock: f32,
    next_plan_time: f32,
    missing_dependency_reported: bool,
}

impl EnemyAgent {
    pub fn new(config: ArchetypeConfig) -> Self {
        let config = config.sanitized();

        let proximity = ProximitySensor {
            radius: config.memory.proximity_radius,
            target_mask: config.vision.target_mask,
            obstruction_mask: config.memory.proximity_obstruction_mask,
        };

        Self {
            vision: VisionSensor::new(config.vision.clone()),
            hearing: HearingSensor::new(config.hearing.clone()),
            proximity,
            navigator: EnemyNavigator::new(config.navigator.clone()),
            facing: FacingController::new(config.facing.clone()),
            config,
            owner: None,
            blackboard: Blackboard::default(),
            suspicion: Suspicion::default(),
            state: AIState::Idle,
            directive: NavDirective::Idle,
            enabled: true,
            clock: 0.0,
            next_plan_time: 0.0,
            missing_dependency_reported: false,
        }
    }

    /// Entity самого агента (свои шумы и себя в overlap игнорируем)
    pub fn with_owner(mut self, owner: Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Разводит орбиты агентов одной цели
    pub fn with_orbit_phase(mut self, phase: f32) -> Self {
        self.navigator = self.navigator.with_orbit_phase(phase);
        self
    }

    /// Подписка на NoiseBus живёт пока агент enabled
    pub fn enable(&mut self, bus: &NoiseBus) {
        self.hearing.attach(bus);
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.hearing.detach();
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_listening(&self) -> bool {
        self.hearing.is_attached()
    }

    /// Signal hook: fusion в blackboard + suspicion
    pub fn handle_signal(&mut self, signal: &Signal) {
        self.blackboard.handle_signal(
            signal,
            self.clock,
            &mut self.suspicion,
            &self.config.suspicion,
            &self.config.memory,
        );
    }

    pub fn update(&mut self, dt: f32, ctx: &mut AgentContext) {
        if !self.enabled {
            return;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let now = ctx.now;
        self.clock = now;
        let position = ctx.transform.translation;

        if ctx.nav.is_none() || ctx.world.is_none() {
            let missing = if ctx.world.is_none() { "WorldQuery" } else { "PathfindingAgent" };
            self.degrade(AgentFault::MissingDependency(missing), ctx.noise);
            if let Some(nav) = ctx.nav.as_deref_mut() {
                self.navigator.idle(nav);
            }
            return;
        }
        let (Some(nav), Some(world)) = (ctx.nav.as_deref_mut(), ctx.world) else {
            return;
        };

        // 1. Sensors
        let mut signals = self.vision.poll(dt, now, &*ctx.transform, self.owner, world);
        if let Some(bus) = ctx.noise {
            signals.extend(self.hearing.drain(bus, position, self.owner, Some(world)));
        }
        for signal in &signals {
            self.handle_signal(signal);
        }

        // 2. Decay + forget
        self.suspicion.decay(self.config.suspicion.decay_per_second, dt);
        if self.blackboard.forget_stale(now, &self.config.memory) {
            crate::log(&format!("👻 {:?} forgot target (no sight > {:.1}s)", self.owner, self.config.memory.forget_seen_after));
        }

        // 3. State
        let next_state = AIState::from_suspicion(self.suspicion.value(), &self.config.suspicion);
        if next_state != self.state {
            crate::log_info(&format!(
                "🧠 {:?} {} → {} (suspicion {:.1})",
                self.owner,
                self.state.as_str(),
                next_state.as_str(),
                self.suspicion.value()
            ));
            self.state = next_state;
            self.next_plan_time = now;
        }

        // 4. Plan (cadence, state change → сразу)
        if now >= self.next_plan_time {
            self.next_plan_time = now + self.config.engagement.plan_interval;
            self.replan(now, position, nav, world);
        }

        // 5. Navigator per-frame
        self.navigator.tick(nav);

        // 6. Breadcrumbs
        if nav.velocity().length() > BREADCRUMB_MIN_SPEED {
            self.blackboard.push_breadcrumb(position, now, self.config.memory.breadcrumbs_max);
        }

        // 7. Target lock
        if let Err(fault) = maintain_target_lock(
            &mut self.blackboard,
            &mut self.suspicion,
            now,
            dt,
            &self.config.memory,
            &self.config.suspicion,
            world,
        ) {
            self.report(&fault);
        }

        // 8. Proximity
        if let Some(hit) = self.proximity.sense(position, self.owner, world) {
            self.blackboard.handle_proximity(&hit, now, &mut self.suspicion, &self.config.suspicion);
        }

        // 9. Facing
        let look_at = self.look_at(now, world);
        match self.facing.update(ctx.transform, look_at, self.state, dt) {
            RotationOwner::Manual => nav.set_update_rotation(false),
            RotationOwner::Navigation => nav.set_update_rotation(true),
            RotationOwner::Unchanged => {}
        }
    }

    fn replan(&mut self, now: f32, position: Vec3, nav: &mut dyn PathfindingAgent, world: &dyn WorldQuery) {
        let input = PlannerInput {
            now,
            self_position: position,
            memory: &self.config.memory,
            engagement: &self.config.engagement,
        };
        let directive = plan(self.state, &self.blackboard, &input);

        if directive.name() != self.directive.name() {
            crate::log(&format!("🧭 {:?} directive {} → {}", self.owner, self.directive.name(), directive.name()));
        }
        self.directive = directive;

        if let Err(fault) = self.navigator.execute(&directive, position, now, nav, world) {
            self.report(&fault);
        }
    }

    /// Точка для facing: живая цель пока lock, иначе last known
    fn look_at(&self, now: f32, world: &dyn WorldQuery) -> Option<Vec3> {
        let target = self.blackboard.current_target?;

        let locked = self
            .blackboard
            .seen_age(now)
            .is_some_and(|age| age <= self.config.memory.target_lock_grace);
        if locked {
            if let Some(state) = world.target(target) {
                return Some(state.position);
            }
        }
        self.blackboard.last_known_position
    }

    fn degrade(&mut self, fault: AgentFault, noise: Option<&NoiseBus>) {
        self.report(&fault);

        // Cursor двигаем и без мира: старые шумы не должны всплыть после восстановления
        if let Some(bus) = noise {
            let _ = self.hearing.drain(bus, Vec3::ZERO, self.owner, None);
        }

        self.state = AIState::Idle;
        self.directive = NavDirective::Idle;
    }

    fn report(&mut self, fault: &AgentFault) {
        match fault {
            AgentFault::MissingDependency(_) => {
                if !self.missing_dependency_reported {
                    self.missing_dependency_reported = true;
                    crate::log_error(&format!("❌ {:?} {} → Idle-only", self.owner, fault));
                }
            }
            AgentFault::UnreachablePoint { .. } => {
                crate::log(&format!("🚧 {:?} {} (dropped until next plan)", self.owner, fault));
            }
            AgentFault::StaleTarget(_) => {
                crate::log(&format!("👻 {:?} {}", self.owner, fault));
            }
            AgentFault::InvalidConfiguration(_) => {
                crate::log_warning(&format!("⚠️ {:?} {}", self.owner, fault));
            }
        }
    }

    // Debug / introspection

    pub fn config(&self) -> &ArchetypeConfig {
        &self.config
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn suspicion(&self) -> f32 {
        self.suspicion.value()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn directive(&self) -> NavDirective {
        self.directive
    }

    pub fn navigator(&self) -> &EnemyNavigator {
        &self.navigator
    }

    pub fn vision(&self) -> &VisionSensor {
        &self.vision
    }

    pub fn hearing(&self) -> &HearingSensor {
        &self.hearing
    }

    pub fn breadcrumbs(&self) -> Vec<Vec3> {
        self.blackboard.breadcrumbs().iter().copied().collect()
    }

    pub fn missing_dependency_reported(&self) -> bool {
        self.missing_dependency_reported
    }

    pub fn debug_snapshot(&self) -> AgentDebugSnapshot {
        AgentDebugSnapshot {
            state: self.state,
            suspicion: self.suspicion.value(),
            directive: self.directive,
            nav_mode: self.navigator.mode().name(),
            current_target: self.blackboard.current_target,
            last_known_position: self.blackboard.last_known_position,
            last_heard_position: self.blackboard.last_heard_position,
            last_noise: self.hearing.last_heard(),
            predicted_position: self.blackboard.predicted_position,
            breadcrumbs: self.breadcrumbs(),
        }
    }
}
