//! Combat integration tests
//!
//! Проверяем полный тик (input → combo → trace → damage → death):
//! - один удар = один урон за окно
//! - буферизованная атака продолжает комбо (counter 2, damage × 1.15)
//! - смерть отменяет окно, буфер и анимацию в том же тике
//! - EntityDied ровно один раз
//! - hit reaction перебивает атаку

mod common;

use bevy::prelude::*;
use common::*;
use ironfist_simulation::combat::ScriptedAnimator;
use ironfist_simulation::*;

fn base_damage(app: &App, attack: &AttackStarted) -> f32 {
    app.world()
        .resource::<AttackCatalog>()
        .get(&attack.attack)
        .map_or(f32::NAN, |def| def.damage)
}

#[test]
fn test_attack_hits_once_then_buffered_follow_up_continues_combo() {
    let mut app = combat_app(42);
    record::<AttackStarted>(&mut app);
    record::<DamageDealt>(&mut app);

    let attacker = spawn_player(&mut app, Vec3::ZERO, 1);
    let victim = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -120.0), 2);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);

    let started = recorded::<AttackStarted>(&app);
    assert_eq!(started.len(), 1);
    let first = started[0].clone();
    let first_base = base_damage(&app, &first);
    assert_eq!(first.combo, 1);
    assert_eq!(first.damage, first_base);
    assert!(component::<MeleeTrace>(&app, attacker).is_active());
    assert!(component::<Capabilities>(&app, attacker).attacking);

    // Окно открыто 0.5s, жертва всё время внутри sweep'ов
    step(&mut app, 29);
    let hits = recorded::<DamageDealt>(&app);
    assert_eq!(hits.len(), 1, "victim must be damaged exactly once per window");
    assert_eq!(hits[0].target, victim);
    assert_eq!(hits[0].damage, first_base);
    assert_eq!(health(&app, victim), 100.0 - first_base);

    // Второй запрос через 0.5s: атака ещё идёт → буфер
    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);
    let session = component::<ComboSession>(&app, attacker);
    assert!(session.has_buffered());
    assert_eq!(recorded::<AttackStarted>(&app).len(), 1);

    // Blend-out на 0.6s → буфер стартует на следующем тике
    step(&mut app, 10);
    let started = recorded::<AttackStarted>(&app);
    assert_eq!(started.len(), 2);
    let second = started[1].clone();
    assert_eq!(second.combo, 2);
    let second_base = base_damage(&app, &second);
    assert!((second.damage - second_base * 1.15).abs() < 1e-4, "damage = {}", second.damage);

    let first_def_follow_ups = app
        .world()
        .resource::<AttackCatalog>()
        .get(&first.attack)
        .map(|def| def.follow_ups.clone())
        .unwrap_or_default();
    assert!(first_def_follow_ups.contains(&second.attack));

    // Новое окно: реестр очищен, та же жертва получает урон снова (один раз)
    step(&mut app, 20);
    let hits = recorded::<DamageDealt>(&app);
    assert_eq!(hits.len(), 2);
    assert!((hits[1].damage - second.damage).abs() < 1e-4);
    assert!((health(&app, victim) - (100.0 - first_base - second.damage)).abs() < 1e-3);
}

#[test]
fn test_debounced_double_request_starts_one_attack() {
    let mut app = combat_app(7);
    record::<AttackStarted>(&mut app);
    let attacker = spawn_player(&mut app, Vec3::ZERO, 1);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);
    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);

    assert_eq!(recorded::<AttackStarted>(&app).len(), 1);
    assert!(!component::<ComboSession>(&app, attacker).has_buffered());
}

#[test]
fn test_combo_resets_after_window_timeout() {
    let mut app = combat_app(11);
    record::<AttackStarted>(&mut app);
    let attacker = spawn_player(&mut app, Vec3::ZERO, 1);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    // 0.8s атака + окно follow-up ≤ 0.6s + запас
    step(&mut app, 120);
    assert_eq!(component::<ComboSession>(&app, attacker).phase(), ComboPhase::Idle);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);

    let started = recorded::<AttackStarted>(&app);
    assert_eq!(started.len(), 2);
    assert_eq!(started[1].combo, 1);
    let starters = app.world().resource::<AttackCatalog>().starters().to_vec();
    assert!(starters.contains(&started[1].attack));
}

#[test]
fn test_death_cancels_window_and_buffer_in_same_tick() {
    let mut app = combat_app(42);
    record::<AttackStarted>(&mut app);
    record::<DamageDealt>(&mut app);

    let attacker = spawn_player(&mut app, Vec3::ZERO, 1);
    let victim = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -120.0), 2);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 30);
    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);
    assert!(component::<ComboSession>(&app, attacker).has_buffered());

    send(&mut app, DamageRequest { target: attacker, source: Some(victim), amount: 1000.0 });
    step(&mut app, 1);

    let caps = component::<Capabilities>(&app, attacker);
    assert!(caps.dead);
    assert!(!caps.attacking);
    let session = component::<ComboSession>(&app, attacker);
    assert_eq!(session.phase(), ComboPhase::Idle);
    assert!(!session.has_buffered());
    assert!(!component::<MeleeTrace>(&app, attacker).is_active());
    assert!(!component::<ScriptedAnimator>(&app, attacker).is_playing());
    assert!(app.world().resource::<combat::NextTickQueue>().is_empty());
    assert!(!component::<TargetLock>(&app, attacker).is_target_locked());

    // Ничего не "догоняет" после смерти
    let hp_after_death = health(&app, victim);
    step(&mut app, 60);
    assert_eq!(recorded::<AttackStarted>(&app).len(), 1);
    assert_eq!(recorded::<DamageDealt>(&app).len(), 1);
    assert_eq!(health(&app, victim), hp_after_death);

    // Запросы мёртвого отклоняются
    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 1);
    assert_eq!(recorded::<AttackStarted>(&app).len(), 1);
}

#[test]
fn test_entity_died_fires_exactly_once() {
    let mut app = combat_app(3);
    record::<EntityDied>(&mut app);
    record::<HealthChanged>(&mut app);
    let target = spawn_dummy(&mut app, Vec3::ZERO, 2);

    send(&mut app, DamageRequest { target, source: None, amount: 60.0 });
    send(&mut app, DamageRequest { target, source: None, amount: 60.0 });
    step(&mut app, 1);
    send(&mut app, DamageRequest { target, source: None, amount: 60.0 });
    step(&mut app, 3);

    let died = recorded::<EntityDied>(&app);
    assert_eq!(died.len(), 1);
    assert_eq!(died[0].entity, target);
    assert_eq!(health(&app, target), 0.0);

    let changes = recorded::<HealthChanged>(&app);
    assert_eq!(changes.len(), 2);
    assert_eq!((changes[0].old, changes[0].new), (100.0, 40.0));
    assert_eq!((changes[1].old, changes[1].new), (40.0, 0.0));
    assert!(component::<Capabilities>(&app, target).dead);
}

#[test]
fn test_hit_reaction_cancels_run_and_stops_movement() {
    let mut app = combat_app(5);
    let runner = spawn_player(&mut app, Vec3::ZERO, 1);

    send(&mut app, CombatInput::RunStarted { entity: runner });
    send(&mut app, CombatInput::Move { entity: runner, intent: Vec2::Y });
    step(&mut app, 2);
    assert!(component::<Capabilities>(&app, runner).running);
    let moved = position(&app, runner);
    assert!(moved.z < 0.0, "runner should move forward, got {moved:?}");

    send(&mut app, DamageRequest { target: runner, source: None, amount: 10.0 });
    step(&mut app, 1);
    let caps = component::<Capabilities>(&app, runner);
    assert!(caps.hit_reacting);
    assert!(!caps.running);

    // Бег отклоняется во время реакции
    send(&mut app, CombatInput::RunStarted { entity: runner });
    step(&mut app, 1);
    assert!(!component::<Capabilities>(&app, runner).running);
    assert_eq!(component::<Velocity>(&app, runner).0, Vec3::ZERO);

    // 0.4s → реакция закончилась
    step(&mut app, 30);
    assert!(!component::<Capabilities>(&app, runner).hit_reacting);
}

#[test]
fn test_hit_reaction_interrupts_attack_in_flight() {
    let mut app = combat_app(6);
    record::<AttackStarted>(&mut app);
    let attacker = spawn_player(&mut app, Vec3::ZERO, 1);

    send(&mut app, CombatInput::AttackRequested { entity: attacker, heavy: false });
    step(&mut app, 5);
    assert!(component::<MeleeTrace>(&app, attacker).is_active());
    assert_eq!(component::<ComboSession>(&app, attacker).phase(), ComboPhase::Attacking);

    send(&mut app, DamageRequest { target: attacker, source: None, amount: 10.0 });
    step(&mut app, 1);
    assert!(component::<Capabilities>(&app, attacker).hit_reacting);
    assert!(!component::<ScriptedAnimator>(&app, attacker).is_playing());

    // Interrupted обрабатывается до следующего sweep'а
    step(&mut app, 1);
    let session = component::<ComboSession>(&app, attacker);
    assert_eq!(session.phase(), ComboPhase::Idle);
    assert_eq!(session.hit_count(), 0);
    assert!(!component::<MeleeTrace>(&app, attacker).is_active());
    assert!(!component::<Capabilities>(&app, attacker).attacking);

    // Прерванная атака не доигрывается и не порождает новых
    step(&mut app, 60);
    assert_eq!(recorded::<AttackStarted>(&app).len(), 1);
    assert_eq!(component::<ComboSession>(&app, attacker).phase(), ComboPhase::Idle);
}

#[test]
fn test_reset_command_restores_combatant() {
    let mut app = combat_app(9);
    let target = spawn_dummy(&mut app, Vec3::ZERO, 2);

    send(&mut app, DamageRequest { target, source: None, amount: 500.0 });
    step(&mut app, 1);
    assert!(component::<Capabilities>(&app, target).dead);

    send(&mut app, CombatCommand::Reset { entity: target });
    step(&mut app, 1);
    assert_eq!(health(&app, target), 100.0);
    assert_eq!(component::<Capabilities>(&app, target), Capabilities::default());
}
