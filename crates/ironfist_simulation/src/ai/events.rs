//! Perception events: слой восприятия (vision cone, триггеры) → AI

use bevy::prelude::*;

/// Perception события
///
/// Отправляются внешним perception слоем, когда:
/// - TargetDetected: враг попал в поле зрения
/// - TargetLost: враг вышел из поля зрения
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerceptionEvent {
    TargetDetected {
        /// Кто увидел
        observer: Entity,
        /// Кого увидел
        target: Entity,
    },
    TargetLost { observer: Entity, target: Entity },
}
