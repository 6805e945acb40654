//! Combo systems: RequestAttack, animation lifecycle, follow-up окна.

use bevy::prelude::*;

use crate::combat::{
    AnimationEvent, AnimationPhase, AttackCatalog, AttackDecision, AttackEnd, AttackEndReason,
    AttackRequest, AttackStarted, ComboSession, ComboTuning, DeferredAction, MeleeTrace,
    NextTickQueue, ScriptedAnimator,
};
use crate::components::Capabilities;
use crate::DeterministicRng;

/// Система: обработка AttackRequest (input, AI, deferred)
///
/// Started → флаг attacking, StartWindow на MeleeTrace, AttackStarted для анимации.
pub fn process_attack_requests(
    mut requests: EventReader<AttackRequest>,
    mut combatants: Query<(&mut ComboSession, &mut Capabilities, &mut MeleeTrace, &Transform)>,
    catalog: Res<AttackCatalog>,
    tuning: Res<ComboTuning>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut started: EventWriter<AttackStarted>,
) {
    let now = time.elapsed_secs();

    for request in requests.read() {
        let Ok((mut session, mut caps, mut trace, transform)) = combatants.get_mut(request.entity) else {
            tracing::debug!(entity = ?request.entity, "AttackRequest for missing combatant");
            continue;
        };

        let decision = session.request_attack(now, request.heavy, caps.dead, &tuning, &catalog, &mut rng.rng);

        match decision {
            AttackDecision::Started(plan) => {
                caps.attacking = true;
                if trace.start_window(plan.damage, transform) {
                    tracing::warn!(entity = ?request.entity, "Hit window was still open, restarted");
                }

                tracing::info!(
                    entity = ?request.entity,
                    attack = %plan.attack,
                    combo = plan.combo,
                    damage = plan.damage,
                    "⚔️ Attack started"
                );

                started.write(AttackStarted {
                    entity: request.entity,
                    attack: plan.attack,
                    serial: plan.serial,
                    combo: plan.combo,
                    damage: plan.damage,
                });
            }
            AttackDecision::Buffered => {
                tracing::debug!(entity = ?request.entity, "📥 Attack buffered");
            }
            AttackDecision::Debounced => {
                tracing::trace!(entity = ?request.entity, "Attack request debounced");
            }
            AttackDecision::Rejected => {
                tracing::debug!(entity = ?request.entity, "Attack request rejected (dead)");
            }
        }
    }
}

/// Система: headless анимация (ScriptedAnimator → AnimationEvent)
pub fn drive_scripted_animations(
    mut started: EventReader<AttackStarted>,
    mut animators: Query<(Entity, &mut ScriptedAnimator)>,
    catalog: Res<AttackCatalog>,
    time: Res<Time<Fixed>>,
    mut events: EventWriter<AnimationEvent>,
) {
    for attack in started.read() {
        let Ok((_, mut animator)) = animators.get_mut(attack.entity) else {
            continue;
        };
        let Some(definition) = catalog.get(&attack.attack) else {
            continue;
        };

        animator.play(attack.serial, definition);
        events.write(AnimationEvent {
            entity: attack.entity,
            serial: attack.serial,
            phase: AnimationPhase::Started,
        });
    }

    let delta = time.delta_secs();
    for (entity, mut animator) in animators.iter_mut() {
        for (serial, phase) in animator.advance(delta) {
            events.write(AnimationEvent { entity, serial, phase });
        }
    }
}

/// Система: lifecycle события анимации
///
/// - BlendingOut → on_blend_out; с буфером атака заканчивается сразу
/// - Completed / Interrupted → end_attack, StopWindow, буфер в NextTickQueue
///
/// Устаревшие события (атака уже закончилась) игнорируются,
/// но окно всё равно закрывается, если атаки нет.
pub fn handle_animation_events(
    mut events: EventReader<AnimationEvent>,
    mut combatants: Query<(&mut ComboSession, &mut Capabilities, &mut MeleeTrace)>,
    catalog: Res<AttackCatalog>,
    mut queue: ResMut<NextTickQueue>,
) {
    for event in events.read() {
        let Ok((mut session, mut caps, mut trace)) = combatants.get_mut(event.entity) else {
            continue;
        };

        let reason = match event.phase {
            AnimationPhase::Started => continue,
            AnimationPhase::BlendingOut => {
                if !session.on_blend_out(event.serial, &catalog) {
                    continue;
                }
                tracing::trace!(entity = ?event.entity, "Attack blending out");
                // Буфер обслуживается на blend-out: атака заканчивается сейчас
                if !session.has_buffered() {
                    continue;
                }
                AttackEndReason::Completed
            }
            AnimationPhase::Completed => AttackEndReason::Completed,
            AnimationPhase::Interrupted => AttackEndReason::Interrupted,
        };

        match session.end_attack(event.serial, reason, &catalog) {
            AttackEnd::Stale => {
                tracing::trace!(entity = ?event.entity, serial = event.serial, "Stale animation event ignored");
                if !session.is_attacking() {
                    trace.stop_window();
                    caps.attacking = false;
                }
            }
            AttackEnd::Ended => {
                trace.stop_window();
                caps.attacking = false;
            }
            AttackEnd::EndedWithBuffered(buffered) => {
                trace.stop_window();
                caps.attacking = false;
                queue.push(DeferredAction::RequestAttack {
                    entity: event.entity,
                    heavy: buffered.heavy,
                });
                tracing::debug!(entity = ?event.entity, "⏭️ Buffered attack deferred to next tick");
            }
        }
    }
}

/// Система: follow-up окна (таймаут → сброс комбо)
pub fn tick_combo_windows(mut sessions: Query<(Entity, &mut ComboSession)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (entity, mut session) in sessions.iter_mut() {
        if session.tick(delta) {
            tracing::debug!(?entity, "Combo window lapsed, combo reset");
        }
    }
}
