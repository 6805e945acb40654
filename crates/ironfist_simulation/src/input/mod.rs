//! Input intents → core.
//!
//! Core не читает устройства: внешний input слой шлёт дискретные CombatInput
//! события, здесь они превращаются в MovementIntent, флаг бега,
//! AttackRequest и LockRequest.

use bevy::prelude::*;

use crate::combat::AttackRequest;
use crate::components::{Capabilities, MovementIntent, ViewDirection};
use crate::targeting::{LockRequest, LockRequestKind, SwitchDirection};
use crate::CombatSet;

/// Дискретные input события
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum CombatInput {
    /// MoveIntent(vector2): x = вправо, y = вперёд (относительно камеры)
    Move { entity: Entity, intent: Vec2 },
    /// Yaw камеры (control rotation)
    Look { entity: Entity, yaw: f32 },
    AttackRequested { entity: Entity, heavy: bool },
    RunStarted { entity: Entity },
    RunStopped { entity: Entity },
    LockToggleRequested { entity: Entity },
    SwitchTargetRequested { entity: Entity, direction: SwitchDirection },
}

/// Система: CombatInput → intents
pub fn translate_combat_input(
    mut inputs: EventReader<CombatInput>,
    mut actors: Query<(&mut MovementIntent, &mut Capabilities, Option<&mut ViewDirection>)>,
    mut attacks: EventWriter<AttackRequest>,
    mut locks: EventWriter<LockRequest>,
) {
    for input in inputs.read() {
        match *input {
            CombatInput::Move { entity, intent } => {
                let Ok((mut movement, caps, view)) = actors.get_mut(entity) else {
                    continue;
                };
                if caps.dead {
                    movement.stop();
                    continue;
                }
                let view = view.map(|v| *v).unwrap_or_default();
                movement.direction = view.intent_to_world(intent);
            }
            CombatInput::Look { entity, yaw } => {
                if let Ok((_, _, Some(mut view))) = actors.get_mut(entity) {
                    view.yaw = yaw;
                }
            }
            CombatInput::AttackRequested { entity, heavy } => {
                attacks.write(AttackRequest { entity, heavy });
            }
            CombatInput::RunStarted { entity } => {
                let Ok((_, mut caps, _)) = actors.get_mut(entity) else {
                    continue;
                };
                if caps.can_run() {
                    caps.running = true;
                } else {
                    tracing::trace!(?entity, "Run refused (dead or hit reacting)");
                }
            }
            CombatInput::RunStopped { entity } => {
                if let Ok((_, mut caps, _)) = actors.get_mut(entity) {
                    caps.running = false;
                }
            }
            CombatInput::LockToggleRequested { entity } => {
                locks.write(LockRequest {
                    entity,
                    kind: LockRequestKind::Toggle,
                });
            }
            CombatInput::SwitchTargetRequested { entity, direction } => {
                locks.write(LockRequest {
                    entity,
                    kind: LockRequestKind::Switch(direction),
                });
            }
        }
    }
}

/// Input plugin: translate_combat_input в CombatSet::Input (до lock запросов)
pub struct CombatInputPlugin;

impl Plugin for CombatInputPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatInput>();
        app.add_systems(
            FixedUpdate,
            translate_combat_input
                .in_set(CombatSet::Input)
                .before(crate::targeting::process_lock_requests),
        );
    }
}
