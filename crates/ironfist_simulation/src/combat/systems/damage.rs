//! Damage attribute pipeline.
//!
//! Единственный путь изменения здоровья: `DamagePipeline::apply`.
//! Clamp в [0, max], HealthChanged на каждое изменение, EntityDied ровно один раз.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::{DamageRequest, EntityDied, HealthChanged, SimulationAuthority};
use crate::components::{DamageOutcome, Health};

/// ApplyDamage + нотификации
#[derive(SystemParam)]
pub struct DamagePipeline<'w> {
    changed: EventWriter<'w, HealthChanged>,
    died: EventWriter<'w, EntityDied>,
}

impl DamagePipeline<'_> {
    /// Применяет урон к `health` цели `target`.
    ///
    /// Урон ≤ 0 и урон по мёртвой цели: no-op, событий нет.
    pub fn apply(
        &mut self,
        target: Entity,
        source: Option<Entity>,
        amount: f32,
        health: &mut Health,
    ) -> DamageOutcome {
        let outcome = health.apply_damage(amount);

        match outcome {
            DamageOutcome::Ignored => {
                tracing::trace!(?target, amount, "damage ignored (non-positive or already dead)");
            }
            DamageOutcome::Damaged { old, new } => {
                self.changed.write(HealthChanged {
                    entity: target,
                    old,
                    new,
                    source,
                });
            }
            DamageOutcome::Killed { old } => {
                self.changed.write(HealthChanged {
                    entity: target,
                    old,
                    new: 0.0,
                    source,
                });
                self.died.write(EntityDied {
                    entity: target,
                    killer: source,
                });
                tracing::info!(?target, killer = ?source, "💀 Entity died");
            }
        }

        outcome
    }
}

/// Система: внешний урон (DamageRequest) через тот же pipeline
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut healths: Query<&mut Health>,
    mut pipeline: DamagePipeline,
    authority: Res<SimulationAuthority>,
) {
    for request in requests.read() {
        if *authority != SimulationAuthority::Authoritative {
            continue;
        }

        let Ok(mut health) = healths.get_mut(request.target) else {
            tracing::debug!(target = ?request.target, "DamageRequest for entity without Health, skipped");
            continue;
        };

        pipeline.apply(request.target, request.source, request.amount, &mut health);
    }
}
