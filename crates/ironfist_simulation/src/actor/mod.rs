//! Actor spawn helpers: игрок и боты.
//!
//! Player и Bot — маркеры. Через Required Components они тянут Combatant
//! (здоровье, флаги, комбо, MeleeTrace) и своё управление:
//! - Player: ViewDirection (камера) + TargetLock (ручной lock, auto-lock)
//! - Bot: AiEngagement + TargetLock (цель ставит perception, auto-lock выключен)
//!
//! Настройки из `CombatSettings` копируются в компоненты при спавне.

use bevy::prelude::*;

use crate::ai::AiEngagement;
use crate::combat::{MeleeTrace, ScriptedAnimator};
use crate::components::{Combatant, Health, ViewDirection};
use crate::config::CombatSettings;
use crate::targeting::{TargetLock, TargetLockConfig};

/// Marker: управляется игроком (CombatInput)
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Combatant, ViewDirection, TargetLock)]
pub struct Player;

/// Marker: управляется AI engagement
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Combatant, AiEngagement, TargetLock)]
pub struct Bot;

/// Где и кого спавнить
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub yaw: f32,
    pub faction_id: u64,
    pub max_health: f32,
}

impl SpawnPoint {
    pub fn new(position: Vec3, faction_id: u64) -> Self {
        Self {
            position,
            yaw: 0.0,
            faction_id,
            max_health: 100.0,
        }
    }

    /// Повернуть лицом к точке (по горизонтали)
    pub fn facing(mut self, target: Vec3) -> Self {
        if let Some(yaw) = crate::components::yaw_from_direction(target - self.position) {
            self.yaw = yaw;
        }
        self
    }

    pub fn with_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_rotation_y(self.yaw))
    }
}

/// Игрок: камера смотрит туда же, куда боец
pub fn player_bundle(spawn: SpawnPoint, settings: &CombatSettings) -> impl Bundle {
    (
        Player,
        Combatant::new(spawn.faction_id),
        spawn.transform(),
        Health::new(spawn.max_health),
        ViewDirection { yaw: spawn.yaw },
        settings.locomotion,
        MeleeTrace::from_settings(&settings.trace),
        settings.lock,
        ScriptedAnimator::default(),
    )
}

/// Бот: lock только через perception (auto-lock выключен)
pub fn bot_bundle(spawn: SpawnPoint, settings: &CombatSettings) -> impl Bundle {
    (
        Bot,
        Combatant::new(spawn.faction_id),
        spawn.transform(),
        Health::new(spawn.max_health),
        settings.locomotion,
        MeleeTrace::from_settings(&settings.trace),
        TargetLockConfig {
            auto_lock: false,
            ..settings.lock
        },
        settings.ai,
        ScriptedAnimator::default(),
    )
}
