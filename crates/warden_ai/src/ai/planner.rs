//! Planner: чистое отображение `(AIState, Blackboard) → NavDirective`.
//!
//! Никаких side effects: вызывается на plan tick, результат исполняет
//! EnemyNavigator. Одинаковый вход → одинаковая директива.

use bevy::prelude::*;

use super::components::{AIState, Blackboard};
use crate::config::{EngagementConfig, EngagementProfile, MemoryConfig};
use crate::navigation::NavDirective;

/// Hunt вступает в бой только если цель видели не позже чем N секунд назад
pub const HUNT_FRESH_SIGHT_SEC: f32 = 1.0;

/// Ширина melee band'а сверх `max_reach`
pub const MELEE_BAND_SLACK: f32 = 0.25;

/// Контекст планирования на текущий тик
#[derive(Debug, Clone, Copy)]
pub struct PlannerInput<'a> {
    pub now: f32,
    pub self_position: Vec3,
    pub memory: &'a MemoryConfig,
    pub engagement: &'a EngagementConfig,
}

pub fn plan(state: AIState, blackboard: &Blackboard, input: &PlannerInput) -> NavDirective {
    match state {
        AIState::Idle => NavDirective::Idle,
        AIState::Investigate => plan_investigate(blackboard, input),
        AIState::Hunt => plan_hunt(blackboard, input),
    }
}

fn plan_investigate(blackboard: &Blackboard, input: &PlannerInput) -> NavDirective {
    let seen_recently = blackboard
        .seen_age(input.now)
        .is_some_and(|age| age <= input.memory.forget_seen_after);
    let heard_recently = blackboard
        .heard_age(input.now)
        .is_some_and(|age| age <= input.memory.forget_heard_after);

    if let (true, Some(point)) = (seen_recently, blackboard.last_known_position) {
        return NavDirective::Peek(point);
    }
    if let (true, Some(point)) = (heard_recently, blackboard.last_heard_position) {
        return NavDirective::Investigate(point);
    }

    // Потеряли и зрение и слух - прочёсываем последнюю известную точку
    match blackboard.last_known_position {
        Some(anchor) => NavDirective::SearchSpiral(anchor),
        None => NavDirective::Idle,
    }
}

fn plan_hunt(blackboard: &Blackboard, input: &PlannerInput) -> NavDirective {
    let fresh = blackboard
        .seen_age(input.now)
        .is_some_and(|age| age < HUNT_FRESH_SIGHT_SEC);

    if let (Some(target), true) = (blackboard.current_target, fresh) {
        return engage(target, blackboard, input);
    }

    if let Some(point) = blackboard.last_known_position {
        NavDirective::Investigate(point)
    } else if let Some(point) = blackboard.last_heard_position {
        NavDirective::Investigate(point)
    } else {
        NavDirective::SearchSpiral(input.self_position)
    }
}

fn engage(target: Entity, blackboard: &Blackboard, input: &PlannerInput) -> NavDirective {
    let orbit = input.engagement.orbit_in_band;

    match input.engagement.profile {
        EngagementProfile::Melee { max_reach } => NavDirective::KeepDistance {
            target,
            min: max_reach,
            max: max_reach + MELEE_BAND_SLACK,
            orbit,
        },
        EngagementProfile::Ranged {
            min_distance,
            max_distance,
        } => NavDirective::KeepDistance {
            target,
            min: min_distance,
            max: max_distance,
            orbit,
        },
        EngagementProfile::Pursuit => NavDirective::Intercept {
            target_position: blackboard.last_known_position.unwrap_or(input.self_position),
            target_velocity: blackboard.last_seen_velocity,
        },
    }
}
