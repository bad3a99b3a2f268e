//! EnemyNavigator: исполняет NavDirective поверх PathfindingAgent.
//!
//! `execute` вызывается на plan tick (новая директива вытесняет предыдущую),
//! `tick`: каждый кадр (продвижение спирали, авто-Idle после peek).

use bevy::prelude::*;

use super::agent::PathfindingAgent;
use super::directive::NavDirective;
use super::geometry::{
    band_step, build_spiral, intercept_point, orbit_point, ordered_band, peek_point, BandStep,
    OrbitShape, SpiralPlan,
};
use crate::config::NavigatorConfig;
use crate::error::AgentFault;
use crate::world::WorldQuery;

/// Повторный SearchSpiral с тем же центром продолжает текущую спираль
const SPIRAL_SAME_CENTER_EPSILON: f32 = 0.01;

/// Допуск "дошли" поверх stopping distance (float погрешность агента)
const ARRIVAL_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub enum NavMode {
    Idle,
    Peek,
    Investigate { anchor: Vec3 },
    SearchSpiral(SpiralPlan),
    Intercept { aim: Vec3 },
    KeepDistance { target: Entity, min: f32, max: f32, orbit: bool },
}

impl NavMode {
    pub fn name(&self) -> &'static str {
        match self {
            NavMode::Idle => "Idle",
            NavMode::Peek => "Peek",
            NavMode::Investigate { .. } => "Investigate",
            NavMode::SearchSpiral(_) => "SearchSpiral",
            NavMode::Intercept { .. } => "Intercept",
            NavMode::KeepDistance { .. } => "KeepDistance",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnemyNavigator {
    config: NavigatorConfig,
    mode: NavMode,
    orbit_phase: f32,
    /// Дошли до точки band'а: (цель, её позиция в момент прибытия)
    band_hold: Option<(Entity, Vec3)>,
}

impl EnemyNavigator {
    pub fn new(config: NavigatorConfig) -> Self {
        Self {
            config,
            mode: NavMode::Idle,
            orbit_phase: 0.0,
            band_hold: None,
        }
    }

    pub fn with_orbit_phase(mut self, phase: f32) -> Self {
        self.orbit_phase = phase;
        self
    }

    pub fn mode(&self) -> &NavMode {
        &self.mode
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Waypoints активной спирали (debug overlay)
    pub fn spiral_plan(&self) -> Option<&SpiralPlan> {
        match &self.mode {
            NavMode::SearchSpiral(plan) => Some(plan),
            _ => None,
        }
    }

    pub fn idle(&mut self, agent: &mut dyn PathfindingAgent) {
        self.mode = NavMode::Idle;
        self.band_hold = None;
        agent.reset_path();
    }

    /// Цель, у которой агент стоит в band'е (debug overlay)
    pub fn band_hold(&self) -> Option<(Entity, Vec3)> {
        self.band_hold
    }

    /// Исполнить директиву. `Err` - директива отброшена на этот тик
    /// (planner повторит на следующем cadence).
    pub fn execute(
        &mut self,
        directive: &NavDirective,
        self_position: Vec3,
        now: f32,
        agent: &mut dyn PathfindingAgent,
        world: &dyn WorldQuery,
    ) -> Result<(), AgentFault> {
        if !matches!(directive, NavDirective::KeepDistance { .. }) {
            self.band_hold = None;
        }

        match *directive {
            NavDirective::Idle => {
                self.idle(agent);
                Ok(())
            }
            NavDirective::Peek(target) => self.peek_around(target, self_position, agent),
            NavDirective::Investigate(point) => self.investigate(point, agent),
            NavDirective::SearchSpiral(center) => self.start_search_spiral(center, agent),
            NavDirective::Intercept {
                target_position,
                target_velocity,
            } => self.intercept(target_position, target_velocity, self_position, agent),
            NavDirective::KeepDistance {
                target,
                min,
                max,
                orbit,
            } => self.keep_distance(target, min, max, orbit, self_position, now, agent, world),
        }
    }

    fn peek_around(
        &mut self,
        target: Vec3,
        self_position: Vec3,
        agent: &mut dyn PathfindingAgent,
    ) -> Result<(), AgentFault> {
        self.mode = NavMode::Peek;
        agent.set_stopping_distance(self.config.default_stopping_distance);

        let best = peek_point(
            self_position,
            target,
            self.config.peek_radius,
            self.config.peek_samples,
            self.config.peek_sample_tolerance,
            |point, max| agent.sample_position(point, max),
        );

        match best {
            Some(point) => request(agent, point, "Peek"),
            None => {
                self.mode = NavMode::Idle;
                Err(AgentFault::UnreachablePoint {
                    point: target,
                    directive: "Peek",
                })
            }
        }
    }

    fn investigate(&mut self, point: Vec3, agent: &mut dyn PathfindingAgent) -> Result<(), AgentFault> {
        self.mode = NavMode::Investigate { anchor: point };
        agent.set_stopping_distance(self.config.default_stopping_distance);
        request(agent, point, "Investigate")
    }

    fn start_search_spiral(&mut self, center: Vec3, agent: &mut dyn PathfindingAgent) -> Result<(), AgentFault> {
        if let NavMode::SearchSpiral(plan) = &self.mode {
            if plan.center.distance(center) < SPIRAL_SAME_CENTER_EPSILON && !plan.is_finished() {
                return Ok(());
            }
        }

        let plan = build_spiral(
            center,
            self.config.spiral_step,
            self.config.spiral_max_steps,
            self.config.spiral_snap_tolerance,
            |point, max| agent.sample_position(point, max),
        );

        let Some(first) = plan.current() else {
            self.idle(agent);
            return Err(AgentFault::UnreachablePoint {
                point: center,
                directive: "SearchSpiral",
            });
        };

        agent.set_stopping_distance(self.config.default_stopping_distance);
        self.mode = NavMode::SearchSpiral(plan);
        request(agent, first, "SearchSpiral")
    }

    fn intercept(
        &mut self,
        target_position: Vec3,
        target_velocity: Vec3,
        self_position: Vec3,
        agent: &mut dyn PathfindingAgent,
    ) -> Result<(), AgentFault> {
        // Пересчитывается каждый plan tick, без сглаживания
        let aim = intercept_point(self_position, agent.speed(), target_position, target_velocity);
        self.mode = NavMode::Intercept { aim };
        agent.set_stopping_distance(self.config.default_stopping_distance);
        request(agent, aim, "Intercept")
    }

    #[allow(clippy::too_many_arguments)]
    fn keep_distance(
        &mut self,
        target: Entity,
        min: f32,
        max: f32,
        orbit: bool,
        self_position: Vec3,
        now: f32,
        agent: &mut dyn PathfindingAgent,
        world: &dyn WorldQuery,
    ) -> Result<(), AgentFault> {
        let (min, max) = ordered_band(min, max);
        self.mode = NavMode::KeepDistance { target, min, max, orbit };

        let Some(target_state) = world.target(target) else {
            return Err(AgentFault::StaleTarget(target));
        };
        let target_position = target_state.position;

        // Не `min`: retreat/approach/orbit точки уже лежат на кольце band'а
        // (см. geometry::band_step), stopping > 0 оставил бы агента вне band'а.
        agent.set_stopping_distance(0.0);
        let tolerance = self.config.peek_sample_tolerance;

        match band_step(self_position, target_position, min, max, self.config.band_epsilon) {
            BandStep::Retreat(point) | BandStep::Approach(point) => {
                let Some(navigable) = agent.sample_position(point, tolerance) else {
                    return Err(AgentFault::UnreachablePoint {
                        point,
                        directive: "KeepDistance",
                    });
                };
                self.band_hold = None;
                request(agent, navigable, "KeepDistance")
            }
            BandStep::InBand => {
                let arrived = agent.has_path()
                    && !agent.path_pending()
                    && agent.remaining_distance() <= agent.stopping_distance() + self.config.arrive_slack;
                let in_progress = agent.path_pending() || (agent.has_path() && !arrived);

                if in_progress {
                    return Ok(());
                }
                if arrived {
                    // Дошли: стоим, пока цель на месте. Путь не сбрасываем,
                    // иначе следующий plan tick увидит "нет пути" и поедет снова.
                    match self.band_hold {
                        Some((held, anchor))
                            if held == target && anchor.distance(target_position) > self.config.band_epsilon => {}
                        Some((held, _)) if held == target => return Ok(()),
                        _ => {
                            self.band_hold = Some((target, target_position));
                            return Ok(());
                        }
                    }
                }
                if !orbit {
                    return Ok(());
                }

                let shape = OrbitShape {
                    radius: (min + max) * 0.5,
                    angular_speed_deg: self.config.orbit_angular_speed_deg,
                    jitter: self.config.orbit_jitter,
                    jitter_hz: self.config.orbit_jitter_hz,
                    phase: self.orbit_phase,
                };
                let point = orbit_point(self_position, target_position, &shape, now);
                let Some(navigable) = agent.sample_position(point, tolerance) else {
                    return Err(AgentFault::UnreachablePoint {
                        point,
                        directive: "KeepDistance",
                    });
                };
                self.band_hold = None;
                request(agent, navigable, "KeepDistance")
            }
        }
    }

    /// Per-frame обслуживание активного режима
    pub fn tick(&mut self, agent: &mut dyn PathfindingAgent) {
        if !agent.is_on_nav_mesh() {
            return;
        }

        let reached =
            !agent.path_pending() && agent.remaining_distance() <= agent.stopping_distance() + ARRIVAL_EPSILON;

        match &mut self.mode {
            NavMode::SearchSpiral(plan) => {
                if !reached {
                    return;
                }
                // Непроходимый waypoint пропускаем, берём следующий
                while let Some(next) = plan.advance() {
                    if agent.set_destination(next) {
                        return;
                    }
                }
                crate::log("🌀 Navigator: search spiral exhausted → Idle");
                self.idle(agent);
            }
            NavMode::Peek => {
                // Дошли до peek точки - Idle, planner переиздаст если нужно
                if reached {
                    self.idle(agent);
                }
            }
            _ => {}
        }
    }
}

fn request(agent: &mut dyn PathfindingAgent, point: Vec3, directive: &'static str) -> Result<(), AgentFault> {
    if agent.set_destination(point) {
        Ok(())
    } else {
        Err(AgentFault::UnreachablePoint { point, directive })
    }
}
