//! Attack catalog: статические определения атак и выбор следующей атаки в комбо.
//!
//! Каталог загружается один раз (RON), валидируется и дальше только читается.
//! Выбор атак идёт через `DeterministicRng` (seed), поэтому одинаковый seed
//! даёт одинаковые комбо-цепочки.

use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Идентификатор атаки из каталога (например `"jab"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttackId(String);

impl AttackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Тип атаки: heavy follow-up выбирается детерминированно при heavy input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackKind {
    #[default]
    Light,
    Heavy,
}

/// Запись каталога (immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub id: AttackId,
    #[serde(default)]
    pub kind: AttackKind,
    /// Базовый урон (для первого удара комбо)
    pub damage: f32,
    /// Бонус за каждый следующий удар: `damage * (1 + (n - 1) * combo_bonus)`
    #[serde(default = "default_combo_bonus")]
    pub combo_bonus: f32,
    /// Допустимые продолжения
    #[serde(default)]
    pub follow_ups: Vec<AttackId>,
    /// Сколько секунд после blend-out принимается follow-up input
    #[serde(default = "default_follow_up_window")]
    pub follow_up_window: f32,
    /// Длительность анимации (для headless ScriptedAnimator)
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Момент blend-out от начала анимации
    #[serde(default = "default_blend_out_at")]
    pub blend_out_at: f32,
}

fn default_combo_bonus() -> f32 {
    0.15
}

fn default_follow_up_window() -> f32 {
    0.6
}

fn default_duration() -> f32 {
    0.8
}

fn default_blend_out_at() -> f32 {
    0.6
}

impl AttackDefinition {
    pub fn new(id: impl Into<String>, kind: AttackKind, damage: f32, follow_ups: &[&str]) -> Self {
        Self {
            id: AttackId::new(id),
            kind,
            damage,
            combo_bonus: default_combo_bonus(),
            follow_ups: follow_ups.iter().map(|&f| AttackId::new(f)).collect(),
            follow_up_window: default_follow_up_window(),
            duration: default_duration(),
            blend_out_at: default_blend_out_at(),
        }
    }

    /// Итоговый урон для удара номер `combo_count` (1-based)
    pub fn damage_for_combo(&self, combo_count: u32) -> f32 {
        let chain = combo_count.saturating_sub(1) as f32;
        self.damage * (1.0 + chain * self.combo_bonus)
    }
}

/// Сырые настройки каталога (как в RON файле)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub max_combo_length: u32,
    pub starters: Vec<AttackId>,
    pub attacks: Vec<AttackDefinition>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            max_combo_length: 4,
            starters: vec![AttackId::new("jab"), AttackId::new("cross")],
            attacks: vec![
                AttackDefinition::new("jab", AttackKind::Light, 20.0, &["cross", "hook"]),
                AttackDefinition::new("cross", AttackKind::Light, 22.0, &["hook", "uppercut"]),
                AttackDefinition::new("hook", AttackKind::Light, 25.0, &["jab", "haymaker"]),
                AttackDefinition {
                    duration: 1.0,
                    blend_out_at: 0.75,
                    ..AttackDefinition::new("uppercut", AttackKind::Heavy, 35.0, &["jab"])
                },
                AttackDefinition {
                    duration: 1.1,
                    blend_out_at: 0.85,
                    follow_up_window: 0.4,
                    ..AttackDefinition::new("haymaker", AttackKind::Heavy, 40.0, &[])
                },
            ],
        }
    }
}

/// Валидированный каталог атак (Resource)
#[derive(Resource, Debug, Clone)]
pub struct AttackCatalog {
    attacks: HashMap<AttackId, AttackDefinition>,
    starters: Vec<AttackId>,
    max_combo_length: u32,
}

impl Default for AttackCatalog {
    fn default() -> Self {
        let settings = CatalogSettings::default();
        Self {
            attacks: settings
                .attacks
                .into_iter()
                .map(|def| (def.id.clone(), def))
                .collect(),
            starters: settings.starters,
            max_combo_length: settings.max_combo_length,
        }
    }
}

impl AttackCatalog {
    /// Собирает каталог, проверяя ссылки и значения
    pub fn new(settings: CatalogSettings) -> Result<Self, ConfigError> {
        if settings.attacks.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if settings.starters.is_empty() {
            return Err(ConfigError::NoStarters);
        }
        if settings.max_combo_length == 0 {
            return Err(ConfigError::invalid("catalog.max_combo_length", 0.0));
        }

        let mut attacks = HashMap::with_capacity(settings.attacks.len());
        for def in settings.attacks {
            validate_definition(&def)?;
            let id = def.id.clone();
            if attacks.insert(id.clone(), def).is_some() {
                return Err(ConfigError::DuplicateAttack(id));
            }
        }

        for starter in &settings.starters {
            if !attacks.contains_key(starter) {
                return Err(ConfigError::UnknownAttack {
                    referenced_by: "catalog.starters".to_string(),
                    id: starter.clone(),
                });
            }
        }

        for def in attacks.values() {
            if let Some(missing) = def.follow_ups.iter().find(|f| !attacks.contains_key(*f)) {
                return Err(ConfigError::UnknownAttack {
                    referenced_by: def.id.to_string(),
                    id: missing.clone(),
                });
            }
        }

        Ok(Self {
            attacks,
            starters: settings.starters,
            max_combo_length: settings.max_combo_length,
        })
    }

    pub fn get(&self, id: &AttackId) -> Option<&AttackDefinition> {
        self.attacks.get(id)
    }

    pub fn starters(&self) -> &[AttackId] {
        &self.starters
    }

    pub fn max_combo_length(&self) -> u32 {
        self.max_combo_length
    }

    /// Случайный стартер (равновероятно)
    pub fn pick_starter(&self, rng: &mut impl Rng) -> Option<&AttackDefinition> {
        self.starters.choose(rng).and_then(|id| self.get(id))
    }

    /// Следующая атака после `current`.
    ///
    /// Heavy input + есть heavy follow-up → первый heavy по порядку (без рандома).
    /// Иначе равновероятно среди follow-ups. `None` если цепочка закончилась.
    pub fn select_next_attack(
        &self,
        current: &AttackId,
        heavy_requested: bool,
        rng: &mut impl Rng,
    ) -> Option<&AttackDefinition> {
        let follow_ups = &self.get(current)?.follow_ups;

        if heavy_requested {
            let heavy = follow_ups
                .iter()
                .filter_map(|id| self.get(id))
                .find(|def| def.kind == AttackKind::Heavy);
            if heavy.is_some() {
                return heavy;
            }
        }

        follow_ups.choose(rng).and_then(|id| self.get(id))
    }
}

fn validate_definition(def: &AttackDefinition) -> Result<(), ConfigError> {
    let field = |name: &str| format!("{}.{}", def.id, name);

    if !def.damage.is_finite() || def.damage < 0.0 {
        return Err(ConfigError::invalid(field("damage"), def.damage));
    }
    if !def.combo_bonus.is_finite() || def.combo_bonus < 0.0 {
        return Err(ConfigError::invalid(field("combo_bonus"), def.combo_bonus));
    }
    if !def.follow_up_window.is_finite() || def.follow_up_window < 0.0 {
        return Err(ConfigError::invalid(field("follow_up_window"), def.follow_up_window));
    }
    if !def.duration.is_finite() || def.duration <= 0.0 {
        return Err(ConfigError::invalid(field("duration"), def.duration));
    }
    if !(0.0..=def.duration).contains(&def.blend_out_at) {
        return Err(ConfigError::invalid(field("blend_out_at"), def.blend_out_at));
    }
    Ok(())
}
