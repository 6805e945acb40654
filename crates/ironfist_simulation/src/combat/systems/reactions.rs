//! Hit reaction systems.

use bevy::prelude::*;

use crate::combat::{
    AnimationEvent, AnimationPhase, ComboSession, HealthChanged, HitReaction, HitReactionConfig, ScriptedAnimator,
};
use crate::components::Capabilities;

/// Система: тик реакций (до старта новых, чтобы свежая реакция не теряла тик)
pub fn tick_hit_reactions(mut query: Query<(&mut HitReaction, &mut Capabilities)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (mut reaction, mut caps) in query.iter_mut() {
        if reaction.tick(delta) {
            caps.hit_reacting = false;
        }
    }
}

/// Система: нелетальный урон → hit reaction (отменяет бег)
///
/// Реакция перебивает текущую атаку: Interrupted уходит в обычный lifecycle
/// (end_attack, StopWindow) до следующего sweep'а.
pub fn start_hit_reactions(
    mut changes: EventReader<HealthChanged>,
    mut query: Query<(
        &mut HitReaction,
        &mut Capabilities,
        Option<&ComboSession>,
        Option<&mut ScriptedAnimator>,
    )>,
    config: Res<HitReactionConfig>,
    mut animation: EventWriter<AnimationEvent>,
) {
    for change in changes.read() {
        if change.new <= 0.0 || change.new >= change.old {
            continue;
        }

        let Ok((mut reaction, mut caps, session, animator)) = query.get_mut(change.entity) else {
            continue;
        };
        if caps.dead {
            continue;
        }

        reaction.start(config.duration);
        caps.hit_reacting = true;
        caps.running = false;
        tracing::debug!(entity = ?change.entity, "😵 Hit reaction");

        if let Some(session) = session.filter(|session| session.is_attacking()) {
            if let Some(mut animator) = animator {
                animator.stop();
            }
            animation.write(AnimationEvent {
                entity: change.entity,
                serial: session.serial(),
                phase: AnimationPhase::Interrupted,
            });
            tracing::debug!(entity = ?change.entity, serial = session.serial(), "💥 Attack interrupted by hit");
        }
    }
}
