//! Death + restart hooks.
//!
//! Смерть отменяет всё in-flight состояние бойца в том же тике, где
//! пришёл EntityDied: буфер комбо, follow-up окно, hit window, анимацию,
//! отложенные атаки, lock и AI цель.

use bevy::prelude::*;

use crate::ai::{AiEngagement, AiState};
use crate::combat::{
    CombatCommand, ComboSession, EntityDied, HitReaction, MeleeTrace, NextTickQueue, ScriptedAnimator,
};
use crate::components::{Capabilities, Health, MovementIntent, Velocity};
use crate::targeting::TargetLock;

/// Система: EntityDied → cancel всего (идемпотентно)
pub fn handle_deaths(
    mut deaths: EventReader<EntityDied>,
    mut combatants: Query<(
        &mut Capabilities,
        &mut ComboSession,
        &mut MeleeTrace,
        &mut HitReaction,
        &mut MovementIntent,
        Option<&mut ScriptedAnimator>,
        Option<&mut TargetLock>,
        Option<&mut AiEngagement>,
        Option<&mut AiState>,
    )>,
    mut queue: ResMut<NextTickQueue>,
) {
    for death in deaths.read() {
        let Ok((mut caps, mut session, mut trace, mut reaction, mut intent, animator, lock, engagement, state)) =
            combatants.get_mut(death.entity)
        else {
            continue;
        };

        if caps.dead {
            tracing::trace!(entity = ?death.entity, "Death already handled");
            continue;
        }

        caps.dead = true;
        caps.attacking = false;
        caps.running = false;
        caps.hit_reacting = false;

        let combo_cancelled = session.on_death();
        let window_closed = trace.stop_window();
        let deferred_cancelled = queue.cancel_for(death.entity);
        reaction.cancel();
        intent.stop();

        if let Some(mut animator) = animator {
            animator.stop();
        }
        if let Some(mut lock) = lock {
            lock.disable();
        }
        if let Some(mut engagement) = engagement {
            engagement.clear_target();
        }
        if let Some(mut state) = state {
            *state = AiState::NoTarget;
        }

        tracing::debug!(
            entity = ?death.entity,
            combo_cancelled,
            window_closed,
            deferred_cancelled,
            "☠️ Combat state cancelled on death"
        );
    }
}

/// Система: restart hooks от спавнера / game mode
pub fn process_combat_commands(
    mut commands: EventReader<CombatCommand>,
    mut combatants: Query<(
        &mut Health,
        &mut Capabilities,
        &mut ComboSession,
        &mut MeleeTrace,
        &mut HitReaction,
        &mut MovementIntent,
        &mut Velocity,
        Option<&mut ScriptedAnimator>,
        Option<&mut TargetLock>,
        Option<&mut AiEngagement>,
        Option<&mut AiState>,
    )>,
    mut queue: ResMut<NextTickQueue>,
) {
    for command in commands.read() {
        match *command {
            CombatCommand::Reset { entity } => {
                let Ok((
                    mut health,
                    mut caps,
                    mut session,
                    mut trace,
                    mut reaction,
                    mut intent,
                    mut velocity,
                    animator,
                    lock,
                    engagement,
                    state,
                )) = combatants.get_mut(entity)
                else {
                    continue;
                };

                health.restore();
                *caps = Capabilities::default();
                session.reset();
                trace.stop_window();
                reaction.cancel();
                intent.stop();
                velocity.0 = Vec3::ZERO;
                queue.cancel_for(entity);

                if let Some(mut animator) = animator {
                    animator.stop();
                }
                if let Some(mut lock) = lock {
                    lock.reset();
                }
                if let Some(mut engagement) = engagement {
                    engagement.reset();
                }
                if let Some(mut state) = state {
                    *state = AiState::NoTarget;
                }

                tracing::info!(?entity, hp = health.current(), "🔄 Combatant reset");
            }
            CombatCommand::ClearTarget { entity } => {
                let Ok((_, _, _, _, _, _, _, _, lock, engagement, state)) = combatants.get_mut(entity) else {
                    continue;
                };

                if let Some(mut lock) = lock {
                    lock.clear_target();
                }
                if let Some(mut engagement) = engagement {
                    engagement.clear_target();
                }
                if let Some(mut state) = state {
                    *state = AiState::NoTarget;
                }

                tracing::debug!(?entity, "Target cleared");
            }
        }
    }
}
