//! Hit reaction: короткий stagger после нелетального урона.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct HitReactionConfig {
    /// Длительность реакции (секунды). Повторный удар перезапускает таймер.
    pub duration: f32,
}

impl Default for HitReactionConfig {
    fn default() -> Self {
        Self { duration: 0.4 }
    }
}

/// Таймер реакции на удар (0 = не реагирует)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HitReaction {
    remaining: f32,
}

impl HitReaction {
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn cancel(&mut self) {
        self.remaining = 0.0;
    }

    /// true если реакция закончилась на этом тике
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.remaining = (self.remaining - delta).max(0.0);
        !self.is_active()
    }
}
