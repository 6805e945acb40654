//! Базовые компоненты бойцов: Combatant, Health, Capabilities

use bevy::prelude::*;

use crate::combat::{ComboSession, HitReaction, MeleeTrace};
use crate::components::{DesiredFacing, LocomotionConfig, MovementIntent, Velocity};
use crate::physics::Hurtbox;

/// Боец (игрок или бот): может атаковать, получать урон и умирать.
///
/// Required Components добавляют всё остальное состояние бойца:
/// здоровье, флаги, комбо-сессию и собственный MeleeTrace.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    Capabilities,
    MovementIntent,
    Velocity,
    DesiredFacing,
    LocomotionConfig,
    Hurtbox,
    ComboSession,
    MeleeTrace,
    HitReaction
)]
pub struct Combatant {
    /// Союзники (одинаковый faction_id) не выбираются целями
    pub faction_id: u64,
}

impl Combatant {
    pub fn new(faction_id: u64) -> Self {
        Self { faction_id }
    }

    pub fn is_hostile_to(&self, other: &Combatant) -> bool {
        self.faction_id != other.faction_id
    }
}

/// Результат `Health::apply_damage`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Урон ≤ 0, NaN, или цель уже мертва
    Ignored,
    Damaged { old: f32, new: f32 },
    /// Первый переход в 0 (ровно один раз)
    Killed { old: f32 },
}

/// Здоровье бойца
///
/// Инвариант: 0 ≤ current ≤ max. Max задаётся при спавне и боем не меняется.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(1.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn fraction(&self) -> f32 {
        self.current / self.max
    }

    /// Уменьшает здоровье на `amount` с clamp в [0, max].
    ///
    /// Повторный вызов после смерти ничего не делает (Killed возвращается ровно один раз).
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        let old = self.current;
        self.current = (old - amount).clamp(0.0, self.max);

        if self.current <= 0.0 {
            self.current = 0.0;
            DamageOutcome::Killed { old }
        } else {
            DamageOutcome::Damaged { old, new: self.current }
        }
    }

    /// Restart hook: полное здоровье
    pub fn restore(&mut self) {
        self.current = self.max;
    }
}

/// Capability флаги (вместо runtime тегов)
///
/// Проверяются напрямую в системах:
/// - running: бег (ротация по направлению движения)
/// - attacking: атака в процессе (in-flight)
/// - dead: блокирует атаки, lock, AI
/// - hit_reacting: реакция на удар, отменяет бег
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Capabilities {
    pub running: bool,
    pub attacking: bool,
    pub dead: bool,
    pub hit_reacting: bool,
}

impl Capabilities {
    pub fn gait(&self) -> crate::components::Gait {
        if self.running {
            crate::components::Gait::Running
        } else {
            crate::components::Gait::Walking
        }
    }

    pub fn can_run(&self) -> bool {
        !self.dead && !self.hit_reacting
    }

    pub fn can_request_attack(&self) -> bool {
        !self.dead
    }
}
