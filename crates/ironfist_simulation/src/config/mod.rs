//! Статическая конфигурация боя (RON).
//!
//! Загружается один раз при старте, в рантайме не мутируется:
//! - catalog: атаки, стартеры, follow-up списки, окна
//! - combo / trace / hit_reaction: тайминги
//! - lock / ai / locomotion: радиусы, углы, пороги дистанций
//!
//! Формат: `config/combat.ron`. Отсутствующие секции берутся из `Default`.

use std::path::Path;

use serde::Deserialize;

use crate::ai::AiConfig;
use crate::combat::{AttackCatalog, CatalogSettings, ComboTuning, HitReactionConfig, TraceSettings};
use crate::components::LocomotionConfig;
use crate::targeting::TargetLockConfig;

pub mod error;

pub use error::ConfigError;

/// Полный набор настроек боя
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    pub catalog: CatalogSettings,
    pub combo: ComboTuning,
    pub trace: TraceSettings,
    pub lock: TargetLockConfig,
    pub ai: AiConfig,
    pub locomotion: LocomotionConfig,
    pub hit_reaction: HitReactionConfig,
}

impl CombatSettings {
    /// Парсит RON и валидирует всё (включая каталог атак)
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = ron::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_ron(&source)?;
        tracing::info!(path = %path.display(), attacks = settings.catalog.attacks.len(), "📜 Combat config loaded");
        Ok(settings)
    }

    /// Проверка числовых значений + сборка каталога
    pub fn validate(&self) -> Result<AttackCatalog, ConfigError> {
        non_negative("combo.debounce", self.combo.debounce)?;

        positive("trace.radius", self.trace.radius)?;
        positive("trace.interval", self.trace.interval)?;
        non_negative("trace.base_damage", self.trace.base_damage)?;

        positive("lock.max_lock_distance", self.lock.max_lock_distance)?;
        if self.lock.break_distance < self.lock.max_lock_distance {
            return Err(ConfigError::invalid("lock.break_distance", self.lock.break_distance));
        }
        non_negative("lock.always_valid_distance", self.lock.always_valid_distance)?;
        if !(0.0..=180.0).contains(&self.lock.lock_angle) {
            return Err(ConfigError::invalid("lock.lock_angle", self.lock.lock_angle));
        }
        positive("lock.rotation_speed", self.lock.rotation_speed)?;
        positive("lock.auto_lock_distance", self.lock.auto_lock_distance)?;
        non_negative("lock.auto_check_interval", self.lock.auto_check_interval)?;

        positive("ai.attack_range", self.ai.attack_range)?;
        non_negative("ai.engage_margin", self.ai.engage_margin)?;
        non_negative("ai.attack_cooldown", self.ai.attack_cooldown)?;
        // Гистерезис: порог остановки бега строго ниже порога бега
        if self.ai.stop_run_distance >= self.ai.run_distance {
            return Err(ConfigError::invalid("ai.stop_run_distance", self.ai.stop_run_distance));
        }

        positive("locomotion.walk_speed", self.locomotion.walk_speed)?;
        positive("locomotion.run_speed", self.locomotion.run_speed)?;
        positive("locomotion.walk_rotation_rate", self.locomotion.walk_rotation_rate)?;
        positive("locomotion.run_rotation_rate", self.locomotion.run_rotation_rate)?;

        non_negative("hit_reaction.duration", self.hit_reaction.duration)?;

        AttackCatalog::new(self.catalog.clone())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, value))
    }
}
