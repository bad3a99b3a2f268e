//! Tests for blackboard fusion, forgetting and breadcrumbs.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::blackboard::Blackboard;
    use super::super::suspicion::Suspicion;
    use crate::config::{MemoryConfig, SuspicionConfig};
    use crate::perception::{ProximityHit, Signal};

    fn fuse(bb: &mut Blackboard, suspicion: &mut Suspicion, signal: Signal, now: f32) {
        bb.handle_signal(
            &signal,
            now,
            suspicion,
            &SuspicionConfig::default(),
            &MemoryConfig::default(),
        );
    }

    #[test]
    fn test_vision_overwrites_target_and_time() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let player = Entity::from_raw(10);
        let velocity = Vec3::new(2.0, 0.0, 0.0);

        fuse(
            &mut bb,
            &mut suspicion,
            Signal::vision(player, Vec3::new(5.0, 0.0, 5.0), velocity, 1.0, 3.0),
            3.0,
        );

        assert_eq!(bb.current_target, Some(player));
        assert_eq!(bb.last_seen_time, Some(3.0));
        assert_eq!(bb.last_seen_velocity, velocity);
        assert_eq!(bb.predicted_position, Some(Vec3::new(6.0, 0.0, 5.0)));
        assert_eq!(suspicion.value(), 45.0);
    }

    #[test]
    fn test_fresh_vision_beats_hearing() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let seen = Entity::from_raw(1);
        let heard = Entity::from_raw(2);

        fuse(&mut bb, &mut suspicion, Signal::vision(seen, Vec3::ZERO, Vec3::ZERO, 0.5, 1.0), 1.0);
        fuse(&mut bb, &mut suspicion, Signal::hearing(Some(heard), Vec3::X, 0.5, 2.5), 2.5);

        assert_eq!(bb.current_target, Some(seen));
        assert_eq!(bb.last_heard_position, Some(Vec3::X));
        // Позиция из зрения не трогается слухом
        assert_eq!(bb.last_known_position, Some(Vec3::ZERO));
    }

    #[test]
    fn test_stale_vision_yields_to_hearing() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let seen = Entity::from_raw(1);
        let heard = Entity::from_raw(2);

        fuse(&mut bb, &mut suspicion, Signal::vision(seen, Vec3::ZERO, Vec3::ZERO, 0.5, 1.0), 1.0);
        fuse(&mut bb, &mut suspicion, Signal::hearing(Some(heard), Vec3::X, 0.5, 3.5), 3.5);

        assert_eq!(bb.current_target, Some(heard));
    }

    #[test]
    fn test_hearing_seeds_last_known_when_never_seen() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let spot = Vec3::new(-4.0, 0.0, 9.0);

        fuse(&mut bb, &mut suspicion, Signal::hearing(None, spot, 1.0, 0.5), 0.5);

        assert_eq!(bb.last_known_position, Some(spot));
        assert_eq!(bb.last_heard_time, Some(0.5));
        assert_eq!(bb.current_target, None);
        assert_eq!(suspicion.value(), 25.0);
    }

    #[test]
    fn test_forget_after_timeout_keeps_position() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let memory = MemoryConfig::default();
        let player = Entity::from_raw(5);

        fuse(&mut bb, &mut suspicion, Signal::vision(player, Vec3::Z, Vec3::X, 1.0, 10.0), 10.0);

        assert!(!bb.forget_stale(14.0, &memory));
        assert_eq!(bb.current_target, Some(player));

        assert!(bb.forget_stale(14.01, &memory));
        assert_eq!(bb.current_target, None);
        assert_eq!(bb.last_seen_velocity, Vec3::ZERO);
        assert_eq!(bb.last_known_position, Some(Vec3::Z));
    }

    #[test]
    fn test_heard_memory_survives_forget() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();

        fuse(&mut bb, &mut suspicion, Signal::hearing(None, Vec3::X, 1.0, 0.0), 0.0);
        bb.forget_stale(100.0, &MemoryConfig::default());

        assert_eq!(bb.last_heard_position, Some(Vec3::X));
        assert_eq!(bb.heard_age(100.0), Some(100.0));
    }

    #[test]
    fn test_proximity_acts_like_vision() {
        let mut bb = Blackboard::default();
        let mut suspicion = Suspicion::default();
        let hit = ProximityHit {
            entity: Entity::from_raw(9),
            position: Vec3::new(1.0, 0.0, 0.0),
            strength: 0.5,
        };

        bb.handle_proximity(&hit, 7.0, &mut suspicion, &SuspicionConfig::default());

        assert_eq!(bb.current_target, Some(hit.entity));
        assert_eq!(bb.last_seen_time, Some(7.0));
        assert_eq!(suspicion.value(), 15.0);
    }

    #[test]
    fn test_breadcrumbs_bounded_and_spaced() {
        let mut bb = Blackboard::default();

        for i in 0..20 {
            bb.push_breadcrumb(Vec3::new(i as f32, 0.0, 0.0), i as f32 * 0.1, 12);
        }
        assert_eq!(bb.breadcrumbs().len(), 12);
        assert_eq!(bb.breadcrumbs().front(), Some(&Vec3::new(8.0, 0.0, 0.0)));

        // Слишком быстро - игнорируется
        bb.push_breadcrumb(Vec3::splat(99.0), 1.905, 12);
        assert_eq!(bb.breadcrumbs().back(), Some(&Vec3::new(19.0, 0.0, 0.0)));
    }
}
