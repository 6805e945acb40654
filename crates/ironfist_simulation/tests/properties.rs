//! Property-based tests (proptest)
//!
//! Инварианты для любых входов:
//! - Health: 0 ≤ current ≤ max, Killed ровно один раз
//! - ComboSession: счётчик комбо никогда не превышает max_combo_length
//! - Follow-up окно истекло → следующая атака стартер с счётчиком 1
//!   (в том числе если input буферизован уже после таймаута)

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use ironfist_simulation::combat::{
    AttackCatalog, AttackDecision, AttackEndReason, ComboPhase, ComboSession, ComboTuning,
};
use ironfist_simulation::{DamageOutcome, Health};

// ============================================================
// Health
// ============================================================

fn damage_amount() -> impl Strategy<Value = f32> {
    prop_oneof![
        8 => -50.0f32..200.0,
        1 => Just(0.0f32),
        1 => Just(f32::NAN),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_health_stays_clamped_and_dies_once(
        max in 1.0f32..1000.0,
        amounts in prop::collection::vec(damage_amount(), 0..40),
    ) {
        let mut health = Health::new(max);
        let mut deaths = 0;

        for amount in amounts {
            let before = health.current();
            match health.apply_damage(amount) {
                DamageOutcome::Killed { old } => {
                    deaths += 1;
                    prop_assert_eq!(old, before);
                    prop_assert_eq!(health.current(), 0.0);
                }
                DamageOutcome::Damaged { old, new } => {
                    prop_assert_eq!(old, before);
                    prop_assert!(new < old);
                    prop_assert!(new > 0.0);
                }
                DamageOutcome::Ignored => {
                    prop_assert_eq!(health.current(), before);
                }
            }
            prop_assert!(health.current() >= 0.0 && health.current() <= health.max());
        }

        prop_assert!(deaths <= 1, "Killed reported {deaths} times");
        prop_assert_eq!(deaths == 1, !health.is_alive());
    }
}

// ============================================================
// ComboSession
// ============================================================

#[derive(Debug, Clone, Copy)]
enum ComboOp {
    Request { heavy: bool },
    BlendOut,
    Complete,
    Interrupt,
    Tick(f32),
}

fn combo_op() -> impl Strategy<Value = ComboOp> {
    prop_oneof![
        4 => any::<bool>().prop_map(|heavy| ComboOp::Request { heavy }),
        2 => Just(ComboOp::BlendOut),
        2 => Just(ComboOp::Complete),
        1 => Just(ComboOp::Interrupt),
        3 => (0.0f32..0.5).prop_map(ComboOp::Tick),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_combo_counter_never_exceeds_max(
        seed in any::<u64>(),
        ops in prop::collection::vec(combo_op(), 1..80),
    ) {
        let catalog = AttackCatalog::default();
        let tuning = ComboTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = ComboSession::default();
        let mut now = 0.0f32;

        for op in ops {
            match op {
                ComboOp::Request { heavy } => {
                    if let AttackDecision::Started(plan) =
                        session.request_attack(now, heavy, false, &tuning, &catalog, &mut rng)
                    {
                        prop_assert!(plan.combo >= 1);
                        prop_assert!(plan.combo <= catalog.max_combo_length());
                        prop_assert!(plan.damage.is_finite() && plan.damage > 0.0);
                        prop_assert!(catalog.get(&plan.attack).is_some());
                    }
                }
                ComboOp::BlendOut => {
                    session.on_blend_out(session.serial(), &catalog);
                }
                ComboOp::Complete => {
                    session.end_attack(session.serial(), AttackEndReason::Completed, &catalog);
                }
                ComboOp::Interrupt => {
                    let plain_attack = session.is_attacking() && !session.has_buffered();
                    session.end_attack(session.serial(), AttackEndReason::Interrupted, &catalog);
                    if plain_attack {
                        prop_assert_eq!(session.phase(), ComboPhase::Idle);
                    }
                }
                ComboOp::Tick(delta) => {
                    now += delta;
                    session.tick(delta);
                }
            }

            prop_assert!(session.hit_count() <= catalog.max_combo_length());
            if session.phase() == ComboPhase::Idle {
                prop_assert!(!session.has_buffered());
            }
        }
    }

    #[test]
    fn prop_lapsed_window_restarts_from_starter(
        seed in any::<u64>(),
        chain in 1usize..4,
        steps in prop::collection::vec(0.005f32..0.1, 1..10),
    ) {
        let catalog = AttackCatalog::default();
        let tuning = ComboTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = ComboSession::default();
        let mut now = 0.0f32;

        // Цепочка из `chain` атак, каждая доиграна до конца
        for _ in 0..chain {
            let decision = session.request_attack(now, false, false, &tuning, &catalog, &mut rng);
            prop_assert!(matches!(decision, AttackDecision::Started(_)));
            now += 0.6;
            session.on_blend_out(session.serial(), &catalog);
            now += 0.2;
            session.end_attack(session.serial(), AttackEndReason::Completed, &catalog);
        }

        // Окно (≤ 0.6s) истекает при любых шагах тика
        let mut waited = 0.0f32;
        while waited <= 1.0 {
            for &delta in &steps {
                session.tick(delta);
                waited += delta;
                now += delta;
            }
        }
        prop_assert_eq!(session.phase(), ComboPhase::Idle);
        prop_assert_eq!(session.hit_count(), 0);

        match session.request_attack(now, false, false, &tuning, &catalog, &mut rng) {
            AttackDecision::Started(plan) => {
                prop_assert_eq!(plan.combo, 1);
                prop_assert!(catalog.starters().contains(&plan.attack));
            }
            other => prop_assert!(false, "expected a starter, got {:?}", other),
        }
    }

    #[test]
    fn prop_late_buffer_after_lapse_restarts_from_starter(
        seed in any::<u64>(),
        chain in 1usize..4,
        lapse in 0.61f32..2.0,
        late in 0.16f32..0.5,
    ) {
        let catalog = AttackCatalog::default();
        let tuning = ComboTuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = ComboSession::default();
        let mut now = 0.0f32;

        // `chain` атак с буфером, последняя только blend-out'ится
        let mut serial = 0;
        for i in 0..chain {
            let decision = session.request_attack(now, false, false, &tuning, &catalog, &mut rng);
            prop_assert!(matches!(decision, AttackDecision::Started(_)));
            serial = session.serial();
            now += 0.6;
            session.on_blend_out(serial, &catalog);
            if i + 1 < chain {
                now += 0.2;
                session.end_attack(serial, AttackEndReason::Completed, &catalog);
            }
        }

        // Окно (≤ 0.6s) истекает до конца анимации, input приходит позже
        session.tick(lapse);
        now += lapse + late;
        prop_assert_eq!(
            session.request_attack(now, false, false, &tuning, &catalog, &mut rng),
            AttackDecision::Buffered
        );
        session.end_attack(serial, AttackEndReason::Completed, &catalog);

        match session.request_attack(now + 0.02, false, false, &tuning, &catalog, &mut rng) {
            AttackDecision::Started(plan) => {
                prop_assert_eq!(plan.combo, 1);
                prop_assert!(catalog.starters().contains(&plan.attack));
            }
            other => prop_assert!(false, "expected a starter, got {:?}", other),
        }
    }
}
