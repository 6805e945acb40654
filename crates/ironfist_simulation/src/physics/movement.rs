//! Locomotion: headless интеграция движения и ротация бойца по походке.
//!
//! Выполняется ПОСЛЕ TargetLock в том же тике (CombatSet::Locomotion):
//! ротация по направлению бега всегда имеет последнее слово над lock assist.

use bevy::prelude::*;

use crate::components::{
    rotate_yaw_towards, yaw_from_direction, yaw_of, Capabilities, DesiredFacing, Gait,
    LocomotionConfig, MovementIntent, Velocity, ViewDirection,
};
use crate::targeting::TargetLock;

/// Система: velocity = intent × speed(gait), translation += velocity × dt
///
/// Мёртвые и hit-reacting не двигаются.
pub fn integrate_movement(
    mut query: Query<(
        &mut Transform,
        &mut Velocity,
        &MovementIntent,
        &Capabilities,
        &LocomotionConfig,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut velocity, intent, caps, config) in query.iter_mut() {
        if caps.dead || caps.hit_reacting || !intent.is_moving() {
            velocity.0 = Vec3::ZERO;
            continue;
        }

        let direction = intent.direction.normalize_or_zero();
        velocity.0 = direction * config.speed(caps.gait());
        transform.translation += velocity.0 * delta;
    }
}

/// Система: ротация бойца
///
/// Приоритеты:
/// 1. DesiredFacing (one-shot snap, например AI face target перед атакой)
/// 2. Running: поворот к направлению скорости (run rotation rate)
/// 3. Walking без lock'а: к yaw камеры (игрок) или к направлению движения (бот)
///
/// Walking + lock: ротацией управляет TargetLock (rotation assist), здесь ничего.
pub fn apply_locomotion_rotation(
    mut query: Query<(
        &mut Transform,
        &mut DesiredFacing,
        &Velocity,
        &MovementIntent,
        &Capabilities,
        &LocomotionConfig,
        Option<&ViewDirection>,
        Option<&TargetLock>,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut facing, velocity, intent, caps, config, view, lock) in query.iter_mut() {
        if caps.dead {
            facing.yaw = None;
            continue;
        }

        if let Some(yaw) = facing.yaw.take() {
            transform.rotation = Quat::from_rotation_y(yaw);
            continue;
        }

        let gait = caps.gait();
        let target_yaw = match gait {
            Gait::Running => yaw_from_direction(velocity.0),
            Gait::Walking => {
                let locked = lock.is_some_and(|l| l.is_target_locked());
                if locked || !intent.is_moving() {
                    None
                } else if let Some(view) = view {
                    Some(view.yaw)
                } else {
                    yaw_from_direction(intent.direction)
                }
            }
        };

        let Some(target_yaw) = target_yaw else {
            continue;
        };

        let max_step = config.rotation_rate(gait).to_radians() * delta;
        let yaw = rotate_yaw_towards(yaw_of(&transform), target_yaw, max_step);
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}
