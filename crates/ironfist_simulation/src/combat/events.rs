//! Combat events
//!
//! Вход в core:
//! - AttackRequest (input / AI / NextTickQueue)
//! - AnimationEvent (animation layer → lifecycle атаки)
//! - DamageRequest (внешний урон: окружение, скрипты)
//! - CombatCommand (restart оркестрация: reset, clear target)
//!
//! Выход из core:
//! - AttackStarted (animation layer: играть атаку)
//! - DamageDealt, HealthChanged, EntityDied

use bevy::prelude::*;

use crate::combat::AttackId;

/// Запрос атаки (RequestAttack)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackRequest {
    pub entity: Entity,
    /// Heavy input: предпочесть heavy follow-up
    pub heavy: bool,
}

/// Атака началась: animation layer должен проиграть `attack`.
///
/// `serial` нужно возвращать в AnimationEvent.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackStarted {
    pub entity: Entity,
    pub attack: AttackId,
    pub serial: u32,
    pub combo: u32,
    pub damage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Started,
    BlendingOut,
    Completed,
    Interrupted,
}

/// Lifecycle событие анимации атаки.
///
/// Может прийти в любом порядке относительно RequestAttack того же кадра:
/// события для уже закончившейся атаки молча игнорируются.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationEvent {
    pub entity: Entity,
    pub serial: u32,
    pub phase: AnimationPhase,
}

/// Внешний урон через тот же damage pipeline
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub source: Option<Entity>,
    pub amount: f32,
}

/// Попадание melee trace
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub impact_point: Vec3,
}

/// OnHealthChanged(old, new)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub entity: Entity,
    pub old: f32,
    pub new: f32,
    pub source: Option<Entity>,
}

/// OnDeath: ровно один раз на переход здоровья в 0
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Hooks для restart оркестрации (спавнер / game mode)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatCommand {
    /// Полное здоровье, сброс флагов, комбо, окна, lock'а и AI цели
    Reset { entity: Entity },
    /// Сброс цели (lock + AI)
    ClearTarget { entity: Entity },
}
