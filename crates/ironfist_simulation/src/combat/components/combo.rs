//! Combo state machine components.
//!
//! `Idle → Attacking → (BlendingOut → Idle | ComboWindowOpen → Idle-or-NextAttacking)`
//!
//! ComboSession принадлежит одному бойцу, чужие системы его не мутируют.
//! Вся логика здесь чистая (время передаётся параметром), системы только
//! связывают её с событиями, MeleeTrace и NextTickQueue.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::combat::{AttackCatalog, AttackDefinition, AttackId};

/// Тюнинг комбо (Resource)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComboTuning {
    /// Минимальное время от начала атаки, после которого повторный input буферизуется.
    /// Раньше: считается тем же нажатием и отбрасывается.
    pub debounce: f32,
}

impl Default for ComboTuning {
    fn default() -> Self {
        Self { debounce: 0.15 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum ComboPhase {
    #[default]
    Idle,
    Attacking,
    /// Атака ещё идёт, анимация уже blend-out
    BlendingOut,
    /// Атака закончилась, follow-up окно открыто
    ComboWindowOpen,
}

/// Буферизованный input (один слот, последний input перезаписывает)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferedInput {
    pub heavy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackEndReason {
    Completed,
    Interrupted,
    Cancelled,
}

/// Что играть: результат успешного RequestAttack
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPlan {
    pub attack: AttackId,
    pub combo: u32,
    pub damage: f32,
    pub serial: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttackDecision {
    /// Боец мёртв (или каталог не дал атаку)
    Rejected,
    /// Слишком рано после старта текущей атаки
    Debounced,
    Buffered,
    Started(AttackPlan),
}

/// Результат конца атаки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackEnd {
    /// Событие для уже завершённой / другой атаки: игнорируем
    Stale,
    Ended,
    /// Атака закончилась, буфер нужно обслужить на следующем тике
    EndedWithBuffered(BufferedInput),
}

/// Комбо-сессия бойца
#[derive(Component, Debug, Clone, Default)]
pub struct ComboSession {
    phase: ComboPhase,
    current: Option<AttackId>,
    hit_count: u32,
    buffered: Option<BufferedInput>,
    attack_started_at: f32,
    /// Оставшееся время follow-up окна (None = таймер не взведён)
    followup_window: Option<f32>,
    /// Буфер отдан в NextTickQueue, окно не должно сбросить комбо до его обработки
    awaiting_deferred: bool,
    /// Окно истекло без буфера, пока атака ещё шла: цепочка прервана
    window_lapsed: bool,
    /// Номер атаки: отсекает lifecycle события от предыдущих атак
    serial: u32,
}

impl ComboSession {
    pub fn phase(&self) -> ComboPhase {
        self.phase
    }

    pub fn current_attack(&self) -> Option<&AttackId> {
        self.current.as_ref()
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn has_buffered(&self) -> bool {
        self.buffered.is_some()
    }

    pub fn followup_window_remaining(&self) -> Option<f32> {
        self.followup_window
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.phase, ComboPhase::Attacking | ComboPhase::BlendingOut)
    }

    /// RequestAttack.
    ///
    /// - мёртв → Rejected
    /// - атакует → буфер если прошло больше debounce, иначе Debounced
    /// - иначе старт: стартер (счётчик 0 или max) или SelectNextAttack
    pub fn request_attack(
        &mut self,
        now: f32,
        heavy: bool,
        dead: bool,
        tuning: &ComboTuning,
        catalog: &AttackCatalog,
        rng: &mut impl Rng,
    ) -> AttackDecision {
        if dead {
            return AttackDecision::Rejected;
        }

        if self.is_attacking() {
            if now - self.attack_started_at > tuning.debounce {
                self.buffered = Some(BufferedInput { heavy });
                return AttackDecision::Buffered;
            }
            return AttackDecision::Debounced;
        }

        let continuing = self.hit_count > 0 && self.hit_count < catalog.max_combo_length();
        let follow_up = if continuing {
            self.current
                .as_ref()
                .and_then(|current| catalog.select_next_attack(current, heavy, rng))
        } else {
            None
        };

        let definition: &AttackDefinition = match follow_up {
            Some(def) => def,
            None => {
                // Новая цепочка: конец follow-ups, max combo или первый удар
                self.hit_count = 0;
                match catalog.pick_starter(rng) {
                    Some(def) => def,
                    None => return AttackDecision::Rejected,
                }
            }
        };

        self.hit_count += 1;
        self.current = Some(definition.id.clone());
        self.phase = ComboPhase::Attacking;
        self.attack_started_at = now;
        self.followup_window = None;
        self.buffered = None;
        self.awaiting_deferred = false;
        self.window_lapsed = false;
        self.serial = self.serial.wrapping_add(1);

        AttackDecision::Started(AttackPlan {
            attack: definition.id.clone(),
            combo: self.hit_count,
            damage: definition.damage_for_combo(self.hit_count),
            serial: self.serial,
        })
    }

    /// Blend-out текущей атаки. false если событие устарело.
    pub fn on_blend_out(&mut self, serial: u32, catalog: &AttackCatalog) -> bool {
        if serial != self.serial || self.phase != ComboPhase::Attacking {
            return false;
        }

        self.phase = ComboPhase::BlendingOut;

        let keep_alive = self.buffered.is_some() && self.hit_count < catalog.max_combo_length();
        if !keep_alive {
            self.open_window(catalog);
        }
        true
    }

    /// Конец атаки (completed / interrupted / cancelled).
    ///
    /// Вызывающий обязан закрыть hit window при любом результате кроме Stale.
    pub fn end_attack(&mut self, serial: u32, reason: AttackEndReason, catalog: &AttackCatalog) -> AttackEnd {
        if serial != self.serial || !self.is_attacking() {
            return AttackEnd::Stale;
        }

        if let Some(buffered) = self.buffered.take() {
            self.phase = ComboPhase::ComboWindowOpen;
            self.awaiting_deferred = true;
            if self.window_lapsed {
                // Буфер пришёл после таймаута: новая цепочка со стартера
                self.current = None;
                self.hit_count = 0;
                self.followup_window = None;
                self.window_lapsed = false;
            } else if self.followup_window.is_none() {
                self.open_window(catalog);
            }
            return AttackEnd::EndedWithBuffered(buffered);
        }

        match reason {
            AttackEndReason::Completed => {
                // Completed без blend-out: окно открывается сейчас
                if self.followup_window.is_none() {
                    self.open_window(catalog);
                }
                if self.followup_window.is_some_and(|remaining| remaining <= 0.0) {
                    self.reset();
                } else {
                    self.phase = ComboPhase::ComboWindowOpen;
                }
            }
            AttackEndReason::Interrupted | AttackEndReason::Cancelled => self.reset(),
        }

        AttackEnd::Ended
    }

    /// Тик follow-up окна. true если комбо сброшено по таймауту.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.followup_window.as_mut() else {
            return false;
        };

        *remaining -= delta;
        if *remaining > 0.0 {
            return false;
        }

        match self.phase {
            ComboPhase::ComboWindowOpen if !self.awaiting_deferred => {
                self.reset();
                true
            }
            _ => {
                // Атака ещё идёт (или ждём deferred): решение в end_attack / request_attack
                *remaining = 0.0;
                if self.buffered.is_none() && !self.awaiting_deferred {
                    self.window_lapsed = true;
                }
                false
            }
        }
    }

    /// Смерть: буфер и таймеры отменяются немедленно. true если было что отменять.
    pub fn on_death(&mut self) -> bool {
        let was_active = self.phase != ComboPhase::Idle || self.buffered.is_some() || self.awaiting_deferred;
        self.reset();
        was_active
    }

    /// Сброс: счётчик 0, следующая атака будет стартером
    pub fn reset(&mut self) {
        self.phase = ComboPhase::Idle;
        self.current = None;
        self.hit_count = 0;
        self.buffered = None;
        self.followup_window = None;
        self.awaiting_deferred = false;
        self.window_lapsed = false;
    }

    fn open_window(&mut self, catalog: &AttackCatalog) {
        let duration = self
            .current
            .as_ref()
            .and_then(|id| catalog.get(id))
            .map_or(0.0, |def| def.follow_up_window);
        self.followup_window = Some(duration);
    }
}
