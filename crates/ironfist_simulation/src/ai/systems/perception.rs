//! Perception → AI target (+ зеркало в TargetLock).

use bevy::prelude::*;

use crate::ai::{AiEngagement, AiState, PerceptionEvent};
use crate::components::{Capabilities, Combatant, Health};
use crate::targeting::TargetLock;

/// Система: TargetDetected / TargetLost
///
/// Фильтрация:
/// - мёртвый наблюдатель игнорирует всё
/// - союзники (тот же faction_id) и мёртвые цели игнорируются
/// - TargetLost сбрасывает цель только если это текущая цель
pub fn handle_perception_events(
    mut events: EventReader<PerceptionEvent>,
    mut observers: Query<(
        &Combatant,
        &Capabilities,
        &mut AiEngagement,
        &mut AiState,
        Option<&mut TargetLock>,
    )>,
    targets: Query<(&Combatant, &Health, &Transform)>,
) {
    for event in events.read() {
        match *event {
            PerceptionEvent::TargetDetected { observer, target } => {
                let Ok((observer_combatant, caps, mut engagement, _, lock)) = observers.get_mut(observer) else {
                    continue;
                };
                if caps.dead || observer == target {
                    continue;
                }

                let Ok((target_combatant, target_health, target_transform)) = targets.get(target) else {
                    tracing::debug!(?observer, ?target, "TargetDetected for unknown entity, ignored");
                    continue;
                };
                if !observer_combatant.is_hostile_to(target_combatant) || !target_health.is_alive() {
                    continue;
                }

                if engagement.set_target(target) {
                    tracing::info!(
                        ?observer,
                        ?target,
                        faction = observer_combatant.faction_id,
                        target_faction = target_combatant.faction_id,
                        "👁️ Target detected"
                    );
                }

                if let Some(mut lock) = lock {
                    lock.set_target(target, Some(target_transform.translation), true);
                }
            }
            PerceptionEvent::TargetLost { observer, target } => {
                let Ok((_, _, mut engagement, mut state, lock)) = observers.get_mut(observer) else {
                    continue;
                };
                if !engagement.clear_if_current(target) {
                    continue;
                }

                *state = AiState::NoTarget;
                if let Some(mut lock) = lock {
                    if lock.target() == Some(target) {
                        lock.clear_target();
                    }
                }
                tracing::info!(?observer, ?target, "👻 Target lost");
            }
        }
    }
}
