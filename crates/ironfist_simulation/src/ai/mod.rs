//! AI Engagement State Machine (боты)
//!
//! Perception (TargetDetected / TargetLost) → цель → дистанционные пороги →
//! MovementIntent / походка / AttackRequest в ComboSession.
//!
//! Цель зеркалится в TargetLock (auto-enable), чтобы rotation assist
//! и камера видели то же, что AI.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::PerceptionEvent;
pub use systems::{handle_perception_events, update_ai_engagement};

use crate::CombatSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate:
/// 1. handle_perception_events (CombatSet::Perception)
/// 2. update_ai_engagement (CombatSet::Ai) — до Combo, атака стартует в том же тике
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PerceptionEvent>();

        app.add_systems(FixedUpdate, handle_perception_events.in_set(CombatSet::Perception));
        app.add_systems(FixedUpdate, update_ai_engagement.in_set(CombatSet::Ai));
    }
}
