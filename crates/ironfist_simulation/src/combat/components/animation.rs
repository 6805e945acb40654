//! Headless animation driver.
//!
//! В игре lifecycle события (blend-out, completed, interrupted) шлёт animation layer.
//! Для headless симуляции и тестов ScriptedAnimator генерирует их сам
//! по таймингам из каталога (`duration`, `blend_out_at`).

use bevy::prelude::*;

use crate::combat::{AnimationPhase, AttackDefinition};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScriptedClip {
    serial: u32,
    elapsed: f32,
    blend_out_at: f32,
    duration: f32,
    blended_out: bool,
}

#[derive(Component, Debug, Clone, Default)]
pub struct ScriptedAnimator {
    clip: Option<ScriptedClip>,
}

impl ScriptedAnimator {
    pub fn play(&mut self, serial: u32, attack: &AttackDefinition) {
        self.clip = Some(ScriptedClip {
            serial,
            elapsed: 0.0,
            blend_out_at: attack.blend_out_at,
            duration: attack.duration,
            blended_out: false,
        });
    }

    pub fn is_playing(&self) -> bool {
        self.clip.is_some()
    }

    /// Останавливает клип без событий (смерть, reset)
    pub fn stop(&mut self) {
        self.clip = None;
    }

    /// Продвигает клип; возвращает события, которые произошли за этот шаг
    pub fn advance(&mut self, delta: f32) -> Vec<(u32, AnimationPhase)> {
        let mut fired = Vec::new();
        let Some(clip) = self.clip.as_mut() else {
            return fired;
        };

        clip.elapsed += delta;

        if !clip.blended_out && clip.elapsed >= clip.blend_out_at {
            clip.blended_out = true;
            fired.push((clip.serial, AnimationPhase::BlendingOut));
        }

        if clip.elapsed >= clip.duration {
            fired.push((clip.serial, AnimationPhase::Completed));
            self.clip = None;
        }

        fired
    }
}
