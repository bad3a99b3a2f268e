//! AI decision-making module
//!
//! Suspicion-driven FSM (Idle → Investigate → Hunt) поверх blackboard памяти.
//! Planner: чистая функция, навигацию исполняет EnemyNavigator.
//!
//! Порядок тика агента: см. `agent.rs`.

pub mod agent;
pub mod components;
pub mod facing;
pub mod planner;
pub mod systems;
pub mod target_lock;


pub use agent::{AgentContext, AgentDebugSnapshot, EnemyAgent, BREADCRUMB_MIN_SPEED};
pub use components::{AIState, Blackboard, Suspicion, SUSPICION_MAX};
pub use facing::{FacingController, RotationOwner};
pub use planner::{plan, PlannerInput};
pub use systems::{attach_hearing_sensors, tick_enemy_agents};
pub use target_lock::maintain_target_lock;
