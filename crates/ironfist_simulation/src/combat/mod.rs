//! Combat module: combo атаки, hit detection, damage pipeline, смерть.
//!
//! Поток одного удара:
//! 1. AttackRequest (input / AI / NextTickQueue) → ComboSession решает: старт, буфер, debounce
//! 2. Started → MeleeTrace открывает hit window, AttackStarted уходит в animation layer
//! 3. Sweep'ы окна → DamagePipeline цели (HitRegistry: одна цель = один удар за окно)
//! 4. BlendingOut / Completed → follow-up окно или буферизованная атака на следующем тике
//! 5. EntityDied → cancel всего in-flight состояния в том же тике
//!
//! Animation layer внешний: он получает AttackStarted и возвращает AnimationEvent.
//! Headless: ScriptedAnimator играет тайминги из каталога.

use bevy::prelude::*;

pub mod catalog;
pub mod components;
pub mod deferred;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use catalog::{AttackCatalog, AttackDefinition, AttackId, AttackKind, CatalogSettings};
pub use components::*;
pub use deferred::{drain_next_tick_queue, DeferredAction, NextTickQueue};
pub use events::{
    AnimationEvent, AnimationPhase, AttackRequest, AttackStarted, CombatCommand, DamageDealt, DamageRequest,
    EntityDied, HealthChanged,
};
pub use systems::*;

use crate::CombatSet;

/// Combat Plugin
///
/// Регистрирует combat события и системы в FixedUpdate.
///
/// Порядок выполнения (по CombatSet):
/// 1. Deferred: drain_next_tick_queue — отложенные атаки прошлого тика
/// 2. Input: process_combat_commands — restart hooks
/// 3. Combo: requests → scripted animation → animation events → follow-up окна
/// 4. Trace: sweep_melee_traces — урон применяется сразу (смерть в этом же тике)
/// 5. Damage: внешний урон, hit reactions
/// 6. Death: handle_deaths — cancel окон, буфера, очереди, lock'а, AI
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackRequest>()
            .add_event::<AttackStarted>()
            .add_event::<AnimationEvent>()
            .add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<CombatCommand>();

        app.init_resource::<NextTickQueue>()
            .init_resource::<SimulationAuthority>();

        app.add_systems(FixedUpdate, drain_next_tick_queue.in_set(CombatSet::Deferred))
            .add_systems(FixedUpdate, process_combat_commands.in_set(CombatSet::Input))
            .add_systems(
                FixedUpdate,
                (
                    process_attack_requests,
                    drive_scripted_animations,
                    handle_animation_events,
                    tick_combo_windows,
                )
                    .chain()
                    .in_set(CombatSet::Combo),
            )
            .add_systems(FixedUpdate, sweep_melee_traces.in_set(CombatSet::Trace))
            .add_systems(
                FixedUpdate,
                (apply_damage_requests, tick_hit_reactions, start_hit_reactions)
                    .chain()
                    .in_set(CombatSet::Damage),
            )
            .add_systems(FixedUpdate, handle_deaths.in_set(CombatSet::Death));
    }
}
