//! AI engagement step: дистанция до цели → движение, походка, атака.

use bevy::prelude::*;

use crate::ai::{evaluate_engagement, AiConfig, AiEngagement, AiState, EngagementInput, MovementOrder};
use crate::combat::{AttackRequest, ComboSession};
use crate::components::{Capabilities, DesiredFacing, Health, MovementIntent};

/// Система: шаг AI engagement state machine
///
/// 1. Цель мертва / despawned → сброс цели (NoTarget)
/// 2. `evaluate_engagement` по дистанции
/// 3. Исполнение: MovementIntent, running флаг, DesiredFacing + AttackRequest
pub fn update_ai_engagement(
    mut bots: Query<(
        Entity,
        &Transform,
        &AiConfig,
        &ComboSession,
        &mut AiEngagement,
        &mut AiState,
        &mut Capabilities,
        &mut MovementIntent,
        &mut DesiredFacing,
    )>,
    targets: Query<(&Transform, &Health)>,
    time: Res<Time<Fixed>>,
    mut requests: EventWriter<AttackRequest>,
) {
    let now = time.elapsed_secs();

    for (entity, transform, config, session, mut engagement, mut state, mut caps, mut intent, mut facing) in
        bots.iter_mut()
    {
        if caps.dead {
            continue;
        }

        let position = transform.translation;
        let mut target = None;

        if let Some(current) = engagement.target() {
            match targets.get(current) {
                Ok((target_transform, health)) if health.is_alive() => {
                    target = Some((current, target_transform.translation));
                }
                _ => {
                    engagement.clear_target();
                    tracing::info!(?entity, target = ?current, "👻 AI target invalid (dead or despawned)");
                }
            }
        }

        let decision = evaluate_engagement(
            EngagementInput {
                target: target.map(|(e, p)| (e, position.distance(p))),
                running: caps.running,
                attack_in_progress: session.is_attacking() || caps.attacking,
                cooldown_ready: engagement.can_attack(now, config.attack_cooldown),
            },
            config,
        );

        if *state != decision.state {
            tracing::debug!(?entity, from = ?*state, to = ?decision.state, "AI state");
            *state = decision.state;
        }

        match (decision.movement, target) {
            (MovementOrder::MoveTowardTarget, Some((_, target_position))) => intent.toward(position, target_position),
            _ => intent.stop(),
        }

        caps.running = decision.running && caps.can_run();

        if let (true, Some((target_entity, target_position))) = (decision.attack, target) {
            facing.face(position, target_position);
            requests.write(AttackRequest {
                entity,
                heavy: false,
            });
            engagement.execute_attack(now);
            tracing::info!(?entity, target = ?target_entity, "🗡️ AI attack");
        }
    }
}
