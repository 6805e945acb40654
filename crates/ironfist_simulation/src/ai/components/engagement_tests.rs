//! Tests for AI engagement components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::ai::{evaluate_engagement, AiConfig, AiEngagement, AiState, EngagementInput, MovementOrder};

    fn target() -> Entity {
        Entity::from_raw(7)
    }

    fn input(distance: f32, running: bool) -> EngagementInput {
        EngagementInput {
            target: Some((target(), distance)),
            running,
            attack_in_progress: false,
            cooldown_ready: true,
        }
    }

    #[test]
    fn test_ai_config_default() {
        let config = AiConfig::default();
        assert_eq!(config.attack_range, 150.0);
        assert_eq!(config.engage_margin, 50.0);
        assert_eq!(config.run_distance, 300.0);
        assert_eq!(config.stop_run_distance, 200.0);
        assert_eq!(config.attack_cooldown, 1.5);
    }

    #[test]
    fn test_no_target_stops_and_walks() {
        let decision = evaluate_engagement(
            EngagementInput {
                target: None,
                running: true,
                attack_in_progress: false,
                cooldown_ready: true,
            },
            &AiConfig::default(),
        );

        assert_eq!(decision.state, AiState::NoTarget);
        assert_eq!(decision.movement, MovementOrder::Stop);
        assert!(!decision.running);
        assert!(!decision.attack);
    }

    #[test]
    fn test_far_target_pursuing_running() {
        let decision = evaluate_engagement(input(800.0, false), &AiConfig::default());
        assert_eq!(decision.state, AiState::Pursuing { target: target() });
        assert_eq!(decision.movement, MovementOrder::MoveTowardTarget);
        assert!(decision.running);
    }

    #[test]
    fn test_engage_band_walks_toward_target() {
        let decision = evaluate_engagement(input(180.0, true), &AiConfig::default());
        assert_eq!(decision.state, AiState::Engaging { target: target() });
        assert_eq!(decision.movement, MovementOrder::MoveTowardTarget);
        assert!(!decision.running);
        assert!(!decision.attack);
    }

    #[test]
    fn test_gait_hysteresis_keeps_current_between_thresholds() {
        let config = AiConfig::default();
        assert!(evaluate_engagement(input(250.0, true), &config).running);
        assert!(!evaluate_engagement(input(250.0, false), &config).running);
        assert!(evaluate_engagement(input(301.0, false), &config).running);
        assert!(!evaluate_engagement(input(199.0, true), &config).running);
    }

    #[test]
    fn test_in_range_attacks_when_cooldown_ready() {
        let decision = evaluate_engagement(input(140.0, false), &AiConfig::default());
        assert_eq!(decision.state, AiState::Attacking { target: target() });
        assert_eq!(decision.movement, MovementOrder::Stop);
        assert!(decision.attack);
    }

    #[test]
    fn test_in_range_waits_on_cooldown() {
        let mut on_cooldown = input(140.0, false);
        on_cooldown.cooldown_ready = false;
        let decision = evaluate_engagement(on_cooldown, &AiConfig::default());
        assert_eq!(decision.state, AiState::Engaging { target: target() });
        assert_eq!(decision.movement, MovementOrder::Stop);
        assert!(!decision.attack);
    }

    #[test]
    fn test_in_range_attack_in_progress_no_new_request() {
        let mut attacking = input(100.0, false);
        attacking.attack_in_progress = true;
        let decision = evaluate_engagement(attacking, &AiConfig::default());
        assert_eq!(decision.state, AiState::Attacking { target: target() });
        assert!(!decision.attack);
    }

    #[test]
    fn test_attack_cooldown() {
        let mut engagement = AiEngagement::default();
        assert!(engagement.can_attack(0.0, 1.5));

        engagement.execute_attack(2.0);
        assert!(!engagement.can_attack(3.0, 1.5));
        assert!(engagement.can_attack(3.5, 1.5));
        assert_eq!(engagement.last_attack_time(), Some(2.0));
    }

    #[test]
    fn test_clear_if_current_only_clears_matching_target() {
        let mut engagement = AiEngagement::default();
        assert!(engagement.set_target(target()));
        assert!(!engagement.set_target(target()));

        assert!(!engagement.clear_if_current(Entity::from_raw(99)));
        assert_eq!(engagement.target(), Some(target()));

        assert!(engagement.clear_if_current(target()));
        assert_eq!(engagement.target(), None);
    }

    #[test]
    fn test_state_target() {
        assert_eq!(AiState::NoTarget.target(), None);
        assert_eq!(AiState::Engaging { target: target() }.target(), Some(target()));
    }
}
