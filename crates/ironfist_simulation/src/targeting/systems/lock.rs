//! Target lock systems: запросы игрока, валидация/auto-lock, rotation assist.

use bevy::prelude::*;

use crate::components::{
    forward_from_yaw, right_from_yaw, rotate_yaw_towards, yaw_from_direction, yaw_of, Capabilities, Combatant,
    Health, ViewDirection,
};
use crate::physics::{layers, SceneQuery};
use crate::targeting::{LockCandidate, LockRequest, LockRequestKind, TargetLock, TargetLockConfig};

/// Кандидаты вокруг `owner`: radius query по слою бойцов + фракция + жив ли.
///
/// Точная фильтрация (дистанция до позиции, конус) в `find_available_targets`.
pub fn gather_candidates(
    scene: &SceneQuery,
    combatants: &Query<(&Combatant, &Health)>,
    owner: Entity,
    owner_combatant: &Combatant,
    origin: Vec3,
    radius: f32,
) -> Vec<LockCandidate> {
    scene
        .query_nearby(origin, radius, layers::COMBATANT)
        .into_iter()
        .filter(|nearby| nearby.entity != owner)
        .filter_map(|nearby| {
            let (combatant, health) = combatants.get(nearby.entity).ok()?;
            Some(LockCandidate {
                entity: nearby.entity,
                position: nearby.position,
                alive: health.is_alive(),
                hostile: owner_combatant.is_hostile_to(combatant),
            })
        })
        .collect()
}

/// Система: LockToggleRequested / SwitchTargetRequested
///
/// Мёртвый владелец: запрос молча отбрасывается.
pub fn process_lock_requests(
    mut requests: EventReader<LockRequest>,
    mut owners: Query<(
        &Transform,
        &Combatant,
        &Capabilities,
        &TargetLockConfig,
        &mut TargetLock,
        Option<&ViewDirection>,
    )>,
    combatants: Query<(&Combatant, &Health)>,
    scene: SceneQuery,
) {
    for request in requests.read() {
        let Ok((transform, combatant, caps, config, mut lock, view)) = owners.get_mut(request.entity) else {
            continue;
        };
        if caps.dead {
            tracing::debug!(entity = ?request.entity, "Lock request rejected (dead)");
            continue;
        }

        let position = transform.translation;
        let yaw = yaw_of(transform);
        let forward = forward_from_yaw(yaw);

        match request.kind {
            LockRequestKind::Disable => {
                if lock.disable_manually() {
                    tracing::info!(entity = ?request.entity, "🔓 Target lock disabled");
                }
            }
            LockRequestKind::Toggle | LockRequestKind::Enable => {
                if request.kind == LockRequestKind::Enable && lock.is_target_locked() {
                    continue;
                }
                let candidates =
                    gather_candidates(&scene, &combatants, request.entity, combatant, position, config.max_lock_distance);

                let locked = if request.kind == LockRequestKind::Toggle {
                    lock.toggle(position, forward, &candidates, config)
                } else {
                    lock.enable(position, forward, &candidates, config)
                };

                if locked {
                    tracing::info!(entity = ?request.entity, target = ?lock.target(), "🔒 Target locked");
                } else {
                    tracing::info!(entity = ?request.entity, "🔓 Target lock off");
                }
            }
            LockRequestKind::Switch(direction) => {
                let view_right = view.map(|v| v.right()).unwrap_or_else(|| right_from_yaw(yaw));
                let candidates =
                    gather_candidates(&scene, &combatants, request.entity, combatant, position, config.max_lock_distance);

                if lock.switch_target(position, forward, view_right, &candidates, direction, config) {
                    tracing::info!(entity = ?request.entity, ?direction, target = ?lock.target(), "🎯 Target switched");
                }
            }
        }
    }
}

/// Система: валидация lock'а каждый тик + периодический auto-lock
///
/// Выполняется после обработки смертей: цель, умершая в этом тике,
/// теряется в этом же тике.
pub fn update_target_locks(
    mut owners: Query<(
        Entity,
        &Transform,
        &Combatant,
        &Capabilities,
        &TargetLockConfig,
        &mut TargetLock,
    )>,
    combatants: Query<(&Combatant, &Health)>,
    scene: SceneQuery,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (owner, transform, combatant, caps, config, mut lock) in owners.iter_mut() {
        if caps.dead {
            if lock.disable() {
                tracing::debug!(?owner, "🔓 Lock dropped: owner dead");
            }
            continue;
        }

        let position = transform.translation;

        if lock.is_target_locked() {
            let target_state = lock.target().and_then(|target| {
                let target_position = scene.position_of(target)?;
                let alive = combatants.get(target).map(|(_, h)| h.is_alive()).unwrap_or(false);
                Some((target_position, alive))
            });

            let lost_target = lock.target();
            if !lock.validate(position, target_state, config) {
                tracing::info!(?owner, target = ?lost_target, "🔓 Target lock lost");
            }
            continue;
        }

        if !lock.auto_check_due(now, config) {
            continue;
        }

        let forward = forward_from_yaw(yaw_of(transform));
        let candidates = gather_candidates(&scene, &combatants, owner, combatant, position, config.auto_lock_distance);
        if lock.try_auto_lock(now, position, forward, &candidates, config) {
            tracing::info!(?owner, target = ?lock.target(), "🔒 Auto-lock engaged");
        }
    }
}

/// Система: rotation assist (lock + не бег)
///
/// При беге ротацией управляет locomotion (направление движения).
pub fn apply_lock_rotation(
    mut owners: Query<(&mut Transform, &Capabilities, &TargetLockConfig, &TargetLock)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, caps, config, lock) in owners.iter_mut() {
        if caps.dead || caps.running {
            continue;
        }
        let Some(focus) = lock.focus_point(config) else {
            continue;
        };
        let Some(target_yaw) = yaw_from_direction(focus - transform.translation) else {
            continue;
        };

        let max_step = config.rotation_speed.to_radians() * delta;
        let yaw = rotate_yaw_towards(yaw_of(&transform), target_yaw, max_step);
        transform.rotation = Quat::from_rotation_y(yaw);
    }
}
