//! Blackboard: рабочая память одного агента.
//!
//! Принадлежит агенту эксклюзивно, снаружи доступна только на чтение
//! (planner, debug overlay). `None` = "никогда не было".

use bevy::prelude::*;
use std::collections::VecDeque;

use super::suspicion::Suspicion;
use crate::config::{MemoryConfig, SuspicionConfig};
use crate::perception::{ProximityHit, Signal, SignalKind};

/// Минимальный интервал между breadcrumbs (секунды)
pub const BREADCRUMB_MIN_SPACING: f32 = 0.01;

/// Lead для predicted position (секунды вперёд)
pub const PREDICTION_LEAD: f32 = 0.5;

#[derive(Debug, Clone, Default)]
pub struct Blackboard {
    pub current_target: Option<Entity>,
    pub last_known_position: Option<Vec3>,
    pub last_seen_time: Option<f32>,
    pub last_seen_velocity: Vec3,
    pub last_heard_position: Option<Vec3>,
    pub last_heard_time: Option<f32>,
    pub predicted_position: Option<Vec3>,
    pub(crate) breadcrumbs: VecDeque<Vec3>,
    pub(crate) last_crumb_time: Option<f32>,
}

impl Blackboard {
    /// Сколько секунд назад видели (`None` - никогда)
    pub fn seen_age(&self, now: f32) -> Option<f32> {
        self.last_seen_time.map(|t| now - t)
    }

    pub fn heard_age(&self, now: f32) -> Option<f32> {
        self.last_heard_time.map(|t| now - t)
    }

    pub fn breadcrumbs(&self) -> &VecDeque<Vec3> {
        &self.breadcrumbs
    }

    /// Fusion сигнала в память + прирост suspicion.
    ///
    /// Vision всегда перезаписывает цель; hearing - только если цели нет
    /// или зрение устарело больше чем на `prefer_recent_seen_sec`.
    pub fn handle_signal(
        &mut self,
        signal: &Signal,
        now: f32,
        suspicion: &mut Suspicion,
        gains: &SuspicionConfig,
        memory: &MemoryConfig,
    ) {
        match signal.kind {
            SignalKind::Vision => {
                suspicion.add(signal.strength * gains.vision_gain);
                self.current_target = signal.source;
                self.last_known_position = Some(signal.position);
                self.predicted_position = Some(signal.position + signal.velocity * PREDICTION_LEAD);
                self.last_seen_velocity = signal.velocity;
                self.last_seen_time = Some(signal.timestamp);
            }
            SignalKind::Hearing => {
                suspicion.add(signal.strength * gains.hearing_gain);

                let vision_stale = self
                    .seen_age(now)
                    .map_or(true, |age| age > memory.prefer_recent_seen_sec);
                if self.current_target.is_none() || vision_stale {
                    // Может быть None (анонимный шум)
                    self.current_target = signal.source;
                }

                self.last_heard_position = Some(signal.position);
                self.last_heard_time = Some(signal.timestamp);

                // Зрение ещё ни разу не срабатывало - seed last known из слуха
                if self.last_seen_time.is_none() {
                    self.last_known_position = Some(signal.position);
                }
            }
        }
    }

    /// Proximity ping = сильный vision-like сигнал без скорости
    pub fn handle_proximity(
        &mut self,
        hit: &ProximityHit,
        now: f32,
        suspicion: &mut Suspicion,
        gains: &SuspicionConfig,
    ) {
        self.current_target = Some(hit.entity);
        self.last_known_position = Some(hit.position);
        self.last_seen_time = Some(now);
        suspicion.add(hit.strength * gains.proximity_gain);
    }

    /// Забываем цель после `forget_seen_after` (позиция остаётся как waypoint hint).
    /// Heard memory активно не чистится - она просто перестаёт быть "свежей".
    /// Возвращает `true` если цель была сброшена в этом вызове.
    pub fn forget_stale(&mut self, now: f32, memory: &MemoryConfig) -> bool {
        let stale = self
            .seen_age(now)
            .map_or(true, |age| age > memory.forget_seen_after);
        if !stale {
            return false;
        }

        let had_target = self.current_target.is_some();
        self.current_target = None;
        self.last_seen_velocity = Vec3::ZERO;
        had_target
    }

    /// Bounded FIFO: не чаще `BREADCRUMB_MIN_SPACING`, старые вытесняются
    pub fn push_breadcrumb(&mut self, position: Vec3, now: f32, max: usize) {
        if let Some(last) = self.last_crumb_time {
            if now - last < BREADCRUMB_MIN_SPACING {
                return;
            }
        }

        self.breadcrumbs.push_back(position);
        while self.breadcrumbs.len() > max {
            self.breadcrumbs.pop_front();
        }
        self.last_crumb_time = Some(now);
    }
}
