//! Melee hit detection system.

use bevy::prelude::*;

use crate::combat::{DamageDealt, DamagePipeline, MeleeTrace, SimulationAuthority};
use crate::components::{DamageOutcome, Health};
use crate::physics::SceneQuery;

/// Система: sweep'ы открытых окон MeleeTrace
///
/// Для каждого активного окна:
/// 1. Владелец мёртв → StopWindow (fail-safe, окно не переживает владельца)
/// 2. Интервал не прошёл → пропуск
/// 3. Каждая точка: sphere sweep prev → current, владелец исключён
/// 4. Новые цели (HitRegistry) → DamagePipeline с уроном окна
pub fn sweep_melee_traces(
    mut tracers: Query<(Entity, &Transform, &mut MeleeTrace)>,
    scene: SceneQuery,
    mut healths: Query<&mut Health>,
    mut pipeline: DamagePipeline,
    mut dealt: EventWriter<DamageDealt>,
    authority: Res<SimulationAuthority>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (owner, transform, mut trace) in tracers.iter_mut() {
        if !trace.is_active() {
            continue;
        }

        let owner_alive = healths.get(owner).map(|h| h.is_alive()).unwrap_or(false);
        if !owner_alive {
            trace.stop_window();
            tracing::debug!(?owner, "🛑 Trace stopped: owner dead");
            continue;
        }

        if !trace.advance(delta) {
            continue;
        }

        let Some(damage) = trace.window_damage() else {
            continue;
        };
        let radius = trace.radius;
        let layer = trace.layer;

        for (start, end) in trace.sweep_segments(transform) {
            for hit in scene.sweep_sphere(start, end, radius, layer, &[owner]) {
                if !trace.register_hit(hit.entity) {
                    continue;
                }

                if *authority != SimulationAuthority::Authoritative {
                    continue;
                }

                let Ok(mut health) = healths.get_mut(hit.entity) else {
                    tracing::warn!(?owner, target = ?hit.entity, "Trace hit entity without Health, skipped");
                    continue;
                };

                let outcome = pipeline.apply(hit.entity, Some(owner), damage, &mut health);
                if outcome == DamageOutcome::Ignored {
                    continue;
                }

                dealt.write(DamageDealt {
                    attacker: owner,
                    target: hit.entity,
                    damage,
                    impact_point: hit.point,
                });
                tracing::info!(
                    attacker = ?owner,
                    target = ?hit.entity,
                    damage,
                    hp = health.current(),
                    "💥 Melee hit"
                );
            }
        }
    }
}
