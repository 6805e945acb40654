//! AI engagement components (state machine, config, target tracking).

use bevy::prelude::*;
use serde::Deserialize;

/// AI engagement состояния
///
/// NoTarget → Pursuing → Engaging → Attacking → Engaging | Pursuing.
/// NoTarget достижим из любого состояния (цель потеряна / смерть).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum AiState {
    #[default]
    NoTarget,
    /// Цель дальше attack_range + engage_margin: догоняем
    Pursuing { target: Entity },
    /// Подход на дистанцию удара / ожидание cooldown'а
    Engaging { target: Entity },
    /// Атака запрошена или в процессе (ComboSession)
    Attacking { target: Entity },
}

impl AiState {
    pub fn target(&self) -> Option<Entity> {
        match self {
            AiState::NoTarget => None,
            AiState::Pursuing { target } | AiState::Engaging { target } | AiState::Attacking { target } => {
                Some(*target)
            }
        }
    }
}

/// Дистанции и cooldown бота
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct AiConfig {
    pub attack_range: f32,
    /// Запас сверх attack_range: внутри него бот подходит шагом
    pub engage_margin: f32,
    /// Дальше этого: бег
    pub run_distance: f32,
    /// Ближе этого: шаг (между порогами походка не меняется)
    pub stop_run_distance: f32,
    /// Секунды между атаками
    pub attack_cooldown: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            attack_range: 150.0,
            engage_margin: 50.0,
            run_distance: 300.0,
            stop_run_distance: 200.0,
            attack_cooldown: 1.5,
        }
    }
}

/// Текущая цель бота + время последней атаки
///
/// Цель: Entity (generation-checked), не владеет ею. Система engagement
/// обнуляет её, как только цель мертва или despawned.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(AiState, AiConfig)]
pub struct AiEngagement {
    target: Option<Entity>,
    last_attack_time: Option<f32>,
}

impl AiEngagement {
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// true если цель сменилась
    pub fn set_target(&mut self, target: Entity) -> bool {
        let changed = self.target != Some(target);
        self.target = Some(target);
        changed
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// TargetLost: сбрасываем только если это текущая цель
    pub fn clear_if_current(&mut self, target: Entity) -> bool {
        if self.target == Some(target) {
            self.target = None;
            true
        } else {
            false
        }
    }

    /// CanAttack: прошло ≥ cooldown с последней атаки (первая атака сразу)
    pub fn can_attack(&self, now: f32, cooldown: f32) -> bool {
        self.last_attack_time.is_none_or(|last| now - last >= cooldown)
    }

    /// ExecuteAttack: обновляет timestamp безусловно
    pub fn execute_attack(&mut self, now: f32) {
        self.last_attack_time = Some(now);
    }

    pub fn last_attack_time(&self) -> Option<f32> {
        self.last_attack_time
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Что делать с движением после шага оценки
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementOrder {
    Stop,
    MoveTowardTarget,
}

/// Результат одного шага engagement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementDecision {
    pub state: AiState,
    pub movement: MovementOrder,
    pub running: bool,
    /// Face target + RequestAttack
    pub attack: bool,
}

/// Входные данные шага (снимок состояния бота и цели)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementInput {
    /// Цель и дистанция до неё (None: цели нет)
    pub target: Option<(Entity, f32)>,
    pub running: bool,
    /// Атака уже идёт (ComboSession не Idle)
    pub attack_in_progress: bool,
    pub cooldown_ready: bool,
}

/// Один шаг engagement state machine (чистая функция)
pub fn evaluate_engagement(input: EngagementInput, config: &AiConfig) -> EngagementDecision {
    let Some((target, distance)) = input.target else {
        return EngagementDecision {
            state: AiState::NoTarget,
            movement: MovementOrder::Stop,
            running: false,
            attack: false,
        };
    };

    // Гистерезис походки
    let running = if distance > config.run_distance {
        true
    } else if distance < config.stop_run_distance {
        false
    } else {
        input.running
    };

    if distance > config.attack_range {
        let state = if distance > config.attack_range + config.engage_margin {
            AiState::Pursuing { target }
        } else {
            AiState::Engaging { target }
        };
        return EngagementDecision {
            state,
            movement: MovementOrder::MoveTowardTarget,
            running,
            attack: false,
        };
    }

    if input.attack_in_progress {
        return EngagementDecision {
            state: AiState::Attacking { target },
            movement: MovementOrder::Stop,
            running: false,
            attack: false,
        };
    }

    if input.cooldown_ready {
        EngagementDecision {
            state: AiState::Attacking { target },
            movement: MovementOrder::Stop,
            running: false,
            attack: true,
        }
    } else {
        EngagementDecision {
            state: AiState::Engaging { target },
            movement: MovementOrder::Stop,
            running: false,
            attack: false,
        }
    }
}
