//! AI engagement integration tests
//!
//! Бот получает цель через PerceptionEvent, дальше всё по дистанции:
//! Pursuing (бег) → Engaging (шаг) → Attacking → cooldown.

mod common;

use bevy::prelude::*;
use common::*;
use ironfist_simulation::*;

/// Бот в начале координат смотрит на -Z, цель впереди на `distance`
fn bot_and_target(app: &mut App, distance: f32) -> (Entity, Entity) {
    let target = spawn_dummy(app, Vec3::new(0.0, 0.0, -distance), 1);
    let bot = spawn_bot(app, Vec3::ZERO, 2, Vec3::new(0.0, 0.0, -distance));
    send(app, PerceptionEvent::TargetDetected { observer: bot, target });
    (bot, target)
}

fn bot_attacks(app: &App, bot: Entity) -> usize {
    recorded::<AttackStarted>(app)
        .iter()
        .filter(|started| started.entity == bot)
        .count()
}

#[test]
fn test_bot_closes_distance_and_attacks_with_cooldown() {
    let mut app = combat_app(42);
    record::<AttackStarted>(&mut app);
    let (bot, target) = bot_and_target(&mut app, 800.0);

    // Далеко: бег к цели
    step(&mut app, 1);
    assert_eq!(component::<AiState>(&app, bot), AiState::Pursuing { target });
    assert!(component::<Capabilities>(&app, bot).running);
    assert!(component::<MovementIntent>(&app, bot).is_moving());
    let after_first_tick = position(&app, bot);
    assert!(after_first_tick.z < 0.0, "bot should advance toward target: {after_first_tick:?}");
    assert_eq!(component::<TargetLock>(&app, bot).locked_target(), Some(target));

    // 180: подход шагом
    let bot_position = position(&app, bot);
    set_position(&mut app, target, bot_position + Vec3::new(0.0, 0.0, -180.0));
    step(&mut app, 1);
    assert_eq!(component::<AiState>(&app, bot), AiState::Engaging { target });
    assert!(!component::<Capabilities>(&app, bot).running);
    assert!(component::<MovementIntent>(&app, bot).is_moving());
    assert_eq!(bot_attacks(&app, bot), 0);

    // 140: в радиусе удара → атака в этом же тике
    let bot_position = position(&app, bot);
    set_position(&mut app, target, bot_position + Vec3::new(0.0, 0.0, -140.0));
    step(&mut app, 1);
    assert_eq!(component::<AiState>(&app, bot), AiState::Attacking { target });
    assert!(!component::<MovementIntent>(&app, bot).is_moving());
    assert_eq!(bot_attacks(&app, bot), 1);
    let first_attack = component::<AiEngagement>(&app, bot).last_attack_time();
    assert!(first_attack.is_some());

    // Cooldown 1.5s: следующие 80 тиков второй атаки нет
    step(&mut app, 80);
    assert_eq!(bot_attacks(&app, bot), 1);
    assert_eq!(component::<AiEngagement>(&app, bot).last_attack_time(), first_attack);

    // После cooldown'а бот бьёт снова
    step(&mut app, 20);
    assert_eq!(bot_attacks(&app, bot), 2);
    assert!(health(&app, target) < 100.0);
}

#[test]
fn test_dead_target_returns_bot_to_no_target() {
    let mut app = combat_app(1);
    let (bot, target) = bot_and_target(&mut app, 400.0);

    step(&mut app, 1);
    assert_eq!(component::<AiState>(&app, bot), AiState::Pursuing { target });

    send(&mut app, DamageRequest { target, source: None, amount: 1000.0 });
    step(&mut app, 2);

    assert_eq!(component::<AiState>(&app, bot), AiState::NoTarget);
    assert_eq!(component::<AiEngagement>(&app, bot).target(), None);
    assert!(!component::<MovementIntent>(&app, bot).is_moving());
    assert!(!component::<Capabilities>(&app, bot).running);
    assert!(!component::<TargetLock>(&app, bot).is_target_locked());

    // Бот стоит на месте
    let parked = position(&app, bot);
    step(&mut app, 10);
    assert_eq!(position(&app, bot), parked);
}

#[test]
fn test_target_lost_clears_only_current_target() {
    let mut app = combat_app(2);
    let (bot, target) = bot_and_target(&mut app, 500.0);
    let stranger = spawn_dummy(&mut app, Vec3::new(300.0, 0.0, 0.0), 1);
    step(&mut app, 1);

    // Потеря чужой цели ничего не меняет
    send(&mut app, PerceptionEvent::TargetLost { observer: bot, target: stranger });
    step(&mut app, 1);
    assert_eq!(component::<AiEngagement>(&app, bot).target(), Some(target));

    send(&mut app, PerceptionEvent::TargetLost { observer: bot, target });
    step(&mut app, 1);
    assert_eq!(component::<AiState>(&app, bot), AiState::NoTarget);
    assert_eq!(component::<TargetLock>(&app, bot).target(), None);
    assert!(!component::<MovementIntent>(&app, bot).is_moving());
}

#[test]
fn test_allies_and_self_are_not_targets() {
    let mut app = combat_app(3);
    let ally = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -300.0), 2);
    let bot = spawn_bot(&mut app, Vec3::ZERO, 2, Vec3::new(0.0, 0.0, -300.0));

    send(&mut app, PerceptionEvent::TargetDetected { observer: bot, target: ally });
    send(&mut app, PerceptionEvent::TargetDetected { observer: bot, target: bot });
    step(&mut app, 1);

    assert_eq!(component::<AiState>(&app, bot), AiState::NoTarget);
    assert_eq!(component::<AiEngagement>(&app, bot).target(), None);
    assert_eq!(position(&app, bot), Vec3::ZERO);
}

#[test]
fn test_dead_bot_ignores_perception() {
    let mut app = combat_app(4);
    let target = spawn_dummy(&mut app, Vec3::new(0.0, 0.0, -300.0), 1);
    let bot = spawn_bot(&mut app, Vec3::ZERO, 2, Vec3::new(0.0, 0.0, -300.0));

    send(&mut app, DamageRequest { target: bot, source: None, amount: 500.0 });
    step(&mut app, 1);
    send(&mut app, PerceptionEvent::TargetDetected { observer: bot, target });
    step(&mut app, 5);

    assert!(component::<Capabilities>(&app, bot).dead);
    assert_eq!(component::<AiState>(&app, bot), AiState::NoTarget);
    assert_eq!(position(&app, bot), Vec3::ZERO);
}
