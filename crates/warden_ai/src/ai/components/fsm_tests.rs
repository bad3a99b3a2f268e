//! Tests for FSM AI components.

#[cfg(test)]
mod tests {
    use super::super::fsm::AIState;
    use super::super::suspicion::Suspicion;
    use crate::config::SuspicionConfig;

    #[test]
    fn test_ai_state_default() {
        let state = AIState::default();
        assert!(matches!(state, AIState::Idle));
    }

    #[test]
    fn test_state_from_thresholds() {
        let thresholds = SuspicionConfig::default();
        assert_eq!(AIState::from_suspicion(0.0, &thresholds), AIState::Idle);
        assert_eq!(AIState::from_suspicion(14.99, &thresholds), AIState::Idle);
        assert_eq!(AIState::from_suspicion(15.0, &thresholds), AIState::Investigate);
        assert_eq!(AIState::from_suspicion(54.9, &thresholds), AIState::Investigate);
        assert_eq!(AIState::from_suspicion(55.0, &thresholds), AIState::Hunt);
        assert_eq!(AIState::from_suspicion(100.0, &thresholds), AIState::Hunt);
    }

    #[test]
    fn test_same_suspicion_same_state() {
        let thresholds = SuspicionConfig::default();
        for step in 0..=200 {
            let value = step as f32 * 0.5;
            assert_eq!(
                AIState::from_suspicion(value, &thresholds),
                AIState::from_suspicion(value, &thresholds)
            );
        }
    }

    #[test]
    fn test_suspicion_stays_in_range() {
        let mut suspicion = Suspicion::default();
        // Детерминированный "шум": большие приросты, большие dt, мусорные значения
        let gains = [45.0, 0.0, 250.0, -30.0, f32::NAN, 12.5, f32::INFINITY];
        let deltas = [0.016, 3.0, 0.0, 100.0, -1.0, f32::NAN];

        for i in 0..500 {
            suspicion.add(gains[i % gains.len()]);
            assert!((0.0..=100.0).contains(&suspicion.value()));

            suspicion.decay(6.0, deltas[i % deltas.len()]);
            assert!((0.0..=100.0).contains(&suspicion.value()));
        }
    }

    #[test]
    fn test_decay_never_increases() {
        let mut suspicion = Suspicion::new(80.0);
        let mut previous = suspicion.value();
        for _ in 0..100 {
            suspicion.decay(6.0, 0.1);
            assert!(suspicion.value() <= previous);
            previous = suspicion.value();
        }
        assert!((suspicion.value() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_infinite_gain_saturates() {
        let mut suspicion = Suspicion::new(10.0);
        suspicion.add(f32::INFINITY);
        assert_eq!(suspicion.value(), 100.0);

        let mut untouched = Suspicion::new(10.0);
        untouched.add(f32::NAN);
        untouched.add(f32::NEG_INFINITY);
        assert_eq!(untouched.value(), 10.0);
    }
}
