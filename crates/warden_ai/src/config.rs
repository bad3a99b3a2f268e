//! Archetype config - immutable набор tunables для одного типа врага.
//!
//! Создаётся один раз на archetype (пресеты ниже или serde из data-файла),
//! прогоняется через `sanitized()` и дальше только читается.

use serde::{Deserialize, Serialize};

use crate::error::AgentFault;
use crate::world::{MASK_SOUND_OCCLUSION, MASK_TARGETS, MASK_VISION_OCCLUSION};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    pub view_radius: f32,
    /// Half-angle конуса (градусы от forward)
    pub view_angle_deg: f32,
    /// Штраф силы сигнала на краю FOV (0 - без штрафа, 1 - жёсткий)
    pub edge_falloff: f32,
    pub check_interval: f32,
    /// Расширение FOV после успешного обнаружения ("не теряем то, что только что видели")
    pub sticky_fov_boost_deg: f32,
    pub sticky_fov_time: f32,
    pub target_mask: u32,
    pub obstruction_mask: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            view_radius: 25.0,
            view_angle_deg: 75.0,
            edge_falloff: 0.4,
            check_interval: 0.1,
            sticky_fov_boost_deg: 20.0,
            sticky_fov_time: 1.0,
            target_mask: MASK_TARGETS,
            obstruction_mask: MASK_VISION_OCCLUSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HearingConfig {
    /// Радиус при loudness = 1
    pub max_hear_radius: f32,
    pub min_loudness_to_hear: f32,
    /// 0 - occlusion test отключён
    pub obstruction_mask: u32,
}

impl Default for HearingConfig {
    fn default() -> Self {
        Self {
            max_hear_radius: 20.0,
            min_loudness_to_hear: 0.05,
            obstruction_mask: MASK_SOUND_OCCLUSION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub forget_seen_after: f32,
    pub forget_heard_after: f32,
    pub breadcrumbs_max: usize,
    /// Свежее зрение важнее слуха в этом окне (секунды)
    pub prefer_recent_seen_sec: f32,
    pub target_lock_grace: f32,
    /// 360° "чувство тела", 0 - отключено
    pub proximity_radius: f32,
    pub proximity_obstruction_mask: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            forget_seen_after: 4.0,
            forget_heard_after: 6.0,
            breadcrumbs_max: 12,
            prefer_recent_seen_sec: 2.0,
            target_lock_grace: 1.25,
            proximity_radius: 2.5,
            proximity_obstruction_mask: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspicionConfig {
    pub decay_per_second: f32,
    /// suspicion += strength * gain
    pub vision_gain: f32,
    pub hearing_gain: f32,
    pub proximity_gain: f32,
    /// Прирост в секунду пока держим target lock
    pub lock_trickle_per_sec: f32,
    pub investigate_threshold: f32,
    pub hunt_threshold: f32,
}

impl Default for SuspicionConfig {
    fn default() -> Self {
        Self {
            decay_per_second: 6.0,
            vision_gain: 45.0,
            hearing_gain: 25.0,
            proximity_gain: 30.0,
            lock_trickle_per_sec: 5.0,
            investigate_threshold: 15.0,
            hunt_threshold: 55.0,
        }
    }
}

/// Профиль боевой дистанции в Hunt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngagementProfile {
    /// Band `[max_reach, max_reach + 0.25]`
    Melee { max_reach: f32 },
    Ranged { min_distance: f32, max_distance: f32 },
    /// Чистый lead-intercept без band'а
    Pursuit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    pub profile: EngagementProfile,
    /// Strafe/orbit пока в "хорошей" дистанции
    pub orbit_in_band: bool,
    /// Cadence планировщика (секунды)
    pub plan_interval: f32,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            profile: EngagementProfile::Melee { max_reach: 1.5 },
            orbit_in_band: true,
            plan_interval: 0.15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    pub peek_radius: f32,
    pub peek_samples: u32,
    pub peek_sample_tolerance: f32,
    pub spiral_step: f32,
    pub spiral_max_steps: u32,
    pub spiral_snap_tolerance: f32,
    pub default_stopping_distance: f32,
    pub orbit_angular_speed_deg: f32,
    pub orbit_jitter: f32,
    pub orbit_jitter_hz: f32,
    /// ε для границ KeepDistance band
    pub band_epsilon: f32,
    /// "Дошли" = remaining <= stopping + slack
    pub arrive_slack: f32,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            peek_radius: 2.5,
            peek_samples: 8,
            peek_sample_tolerance: 1.5,
            spiral_step: 2.0,
            spiral_max_steps: 12,
            spiral_snap_tolerance: 2.0,
            default_stopping_distance: 0.2,
            orbit_angular_speed_deg: 25.0,
            orbit_jitter: 0.35,
            orbit_jitter_hz: 0.5,
            band_epsilon: 0.1,
            arrive_slack: 0.25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacingConfig {
    pub manual_turn_when_near: bool,
    pub turn_speed_deg: f32,
    pub face_when_within: f32,
}

impl Default for FacingConfig {
    fn default() -> Self {
        Self {
            manual_turn_when_near: true,
            turn_speed_deg: 540.0,
            face_when_within: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeConfig {
    pub vision: VisionConfig,
    pub hearing: HearingConfig,
    pub memory: MemoryConfig,
    pub suspicion: SuspicionConfig,
    pub engagement: EngagementConfig,
    pub navigator: NavigatorConfig,
    pub facing: FacingConfig,
}

impl ArchetypeConfig {
    /// Ближний бой: подходит вплотную, orbit вокруг цели
    pub fn melee_grunt() -> Self {
        Self::default()
    }

    /// Стрелок: держит 6–12м, шире обзор, чуть медленнее остывает
    pub fn ranged_marksman() -> Self {
        Self {
            vision: VisionConfig {
                view_radius: 35.0,
                view_angle_deg: 60.0,
                ..Default::default()
            },
            suspicion: SuspicionConfig {
                decay_per_second: 4.0,
                ..Default::default()
            },
            engagement: EngagementConfig {
                profile: EngagementProfile::Ranged {
                    min_distance: 6.0,
                    max_distance: 12.0,
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Clamp невалидных значений вместо отказа (каждая правка логируется)
    pub fn sanitized(mut self) -> Self {
        let mut faults = Vec::new();

        let mut non_negative = |value: &mut f32, name: &str| {
            if !value.is_finite() || *value < 0.0 {
                faults.push(AgentFault::InvalidConfiguration(format!(
                    "{} = {} clamped to 0",
                    name, value
                )));
                *value = 0.0;
            }
        };

        non_negative(&mut self.vision.view_radius, "vision.view_radius");
        non_negative(&mut self.vision.check_interval, "vision.check_interval");
        non_negative(&mut self.vision.sticky_fov_time, "vision.sticky_fov_time");
        non_negative(&mut self.hearing.max_hear_radius, "hearing.max_hear_radius");
        non_negative(&mut self.memory.forget_seen_after, "memory.forget_seen_after");
        non_negative(&mut self.memory.forget_heard_after, "memory.forget_heard_after");
        non_negative(&mut self.memory.target_lock_grace, "memory.target_lock_grace");
        non_negative(&mut self.memory.proximity_radius, "memory.proximity_radius");
        non_negative(&mut self.suspicion.decay_per_second, "suspicion.decay_per_second");
        non_negative(&mut self.engagement.plan_interval, "engagement.plan_interval");
        non_negative(&mut self.navigator.peek_radius, "navigator.peek_radius");
        non_negative(&mut self.navigator.spiral_step, "navigator.spiral_step");
        non_negative(&mut self.facing.turn_speed_deg, "facing.turn_speed_deg");

        let angle = self.vision.view_angle_deg.clamp(0.0, 180.0);
        if angle != self.vision.view_angle_deg {
            faults.push(AgentFault::InvalidConfiguration(format!(
                "vision.view_angle_deg = {} clamped to {}",
                self.vision.view_angle_deg, angle
            )));
            self.vision.view_angle_deg = angle;
        }
        self.vision.edge_falloff = self.vision.edge_falloff.clamp(0.0, 1.0);

        let suspicion = &mut self.suspicion;
        suspicion.investigate_threshold = suspicion.investigate_threshold.clamp(0.0, 100.0);
        suspicion.hunt_threshold = suspicion.hunt_threshold.clamp(0.0, 100.0);
        if suspicion.investigate_threshold > suspicion.hunt_threshold {
            faults.push(AgentFault::InvalidConfiguration(format!(
                "investigate_threshold {} > hunt_threshold {}, swapped",
                suspicion.investigate_threshold, suspicion.hunt_threshold
            )));
            std::mem::swap(
                &mut suspicion.investigate_threshold,
                &mut suspicion.hunt_threshold,
            );
        }

        if let EngagementProfile::Ranged {
            min_distance,
            max_distance,
        } = &mut self.engagement.profile
        {
            if *min_distance > *max_distance {
                faults.push(AgentFault::InvalidConfiguration(format!(
                    "ranged band min {} > max {}, swapped",
                    min_distance, max_distance
                )));
                std::mem::swap(min_distance, max_distance);
            }
        }

        for fault in &faults {
            crate::log_warning(&format!("⚠️ {}", fault));
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let config = ArchetypeConfig::default();
        assert_eq!(config.suspicion.investigate_threshold, 15.0);
        assert_eq!(config.suspicion.hunt_threshold, 55.0);
        assert_eq!(config.suspicion.vision_gain, 45.0);
        assert_eq!(config.engagement.plan_interval, 0.15);
    }

    #[test]
    fn test_sanitized_swaps_inverted_ranged_band() {
        let mut config = ArchetypeConfig::ranged_marksman();
        config.engagement.profile = EngagementProfile::Ranged {
            min_distance: 12.0,
            max_distance: 6.0,
        };

        let config = config.sanitized();

        assert_eq!(
            config.engagement.profile,
            EngagementProfile::Ranged {
                min_distance: 6.0,
                max_distance: 12.0
            }
        );
    }

    #[test]
    fn test_sanitized_orders_thresholds_and_clamps_radii() {
        let mut config = ArchetypeConfig::default();
        config.suspicion.investigate_threshold = 80.0;
        config.suspicion.hunt_threshold = 30.0;
        config.vision.view_radius = -3.0;
        config.vision.view_angle_deg = 270.0;

        let config = config.sanitized();

        assert_eq!(config.suspicion.investigate_threshold, 30.0);
        assert_eq!(config.suspicion.hunt_threshold, 80.0);
        assert_eq!(config.vision.view_radius, 0.0);
        assert_eq!(config.vision.view_angle_deg, 180.0);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let json = r#"{ "engagement": { "profile": { "Ranged": { "min_distance": 4.0, "max_distance": 9.0 } } } }"#;
        let config: ArchetypeConfig = serde_json::from_str(json).expect("valid archetype json");

        assert_eq!(
            config.engagement.profile,
            EngagementProfile::Ranged {
                min_distance: 4.0,
                max_distance: 9.0
            }
        );
        assert!(config.engagement.orbit_in_band);
        assert_eq!(config.vision, VisionConfig::default());
    }
}
