//! Melee hit detection components.
//!
//! MeleeTrace превращает анимацию удара в серию sphere sweep'ов:
//! каждые `interval` секунд каждая точка крепления (кисть) проходит путь
//! от прошлой позиции до текущей. HitRegistry не даёт ударить одну цель
//! дважды за одно окно.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;
use serde::Deserialize;

use crate::physics::layers;

/// Нижняя граница интервала sweep'ов
pub const MIN_TRACE_INTERVAL: f32 = 0.001;

/// Настройки трассировки (общие для всех бойцов, копируются в MeleeTrace при спавне)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraceSettings {
    /// Радиус сферы sweep'а
    pub radius: f32,
    /// Интервал между sweep'ами (секунды)
    pub interval: f32,
    /// Урон, если окно открыто с damage ≤ 0
    pub base_damage: f32,
    pub allow_multiple_hits: bool,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            radius: 12.0,
            interval: 0.02,
            base_damage: 25.0,
            allow_multiple_hits: false,
        }
    }
}

/// Authority: урон применяет только authoritative инстанс.
/// Без сети всегда Authoritative.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimulationAuthority {
    #[default]
    Authoritative,
    Proxy,
}

/// Уже поражённые за текущее окно
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitRegistry {
    struck: Vec<Entity>,
}

impl HitRegistry {
    pub fn contains(&self, entity: Entity) -> bool {
        self.struck.contains(&entity)
    }

    /// true если entity добавлена впервые
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.contains(entity) {
            return false;
        }
        self.struck.push(entity);
        true
    }

    pub fn clear(&mut self) {
        self.struck.clear();
    }

    pub fn len(&self) -> usize {
        self.struck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.struck.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.struck.iter().copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct TraceWindow {
    damage: f32,
    since_sweep: f32,
    last_positions: Vec<Vec3>,
}

/// Hit detection engine бойца
#[derive(Component, Debug, Clone)]
pub struct MeleeTrace {
    /// Точки крепления в local space владельца (по умолчанию правая и левая кисть
    /// на вытянутой руке). Animation layer может переписывать их каждый кадр.
    pub sockets: Vec<Vec3>,
    pub radius: f32,
    pub interval: f32,
    pub base_damage: f32,
    pub allow_multiple_hits: bool,
    pub layer: Group,
    registry: HitRegistry,
    window: Option<TraceWindow>,
}

impl Default for MeleeTrace {
    fn default() -> Self {
        Self::from_settings(&TraceSettings::default())
    }
}

impl MeleeTrace {
    pub fn from_settings(settings: &TraceSettings) -> Self {
        Self {
            sockets: vec![Vec3::new(20.0, 130.0, -110.0), Vec3::new(-20.0, 130.0, -110.0)],
            radius: settings.radius,
            interval: settings.interval,
            base_damage: settings.base_damage,
            allow_multiple_hits: settings.allow_multiple_hits,
            layer: layers::COMBATANT,
            registry: HitRegistry::default(),
            window: None,
        }
    }

    pub fn with_sockets(mut self, sockets: Vec<Vec3>) -> Self {
        self.sockets = sockets;
        self
    }

    pub fn is_active(&self) -> bool {
        self.window.is_some()
    }

    pub fn registry(&self) -> &HitRegistry {
        &self.registry
    }

    /// Урон текущего окна (None если окно закрыто)
    pub fn window_damage(&self) -> Option<f32> {
        self.window.as_ref().map(|w| w.damage)
    }

    pub fn socket_positions(&self, owner: &Transform) -> Vec<Vec3> {
        self.sockets.iter().map(|&local| owner.transform_point(local)).collect()
    }

    /// StartWindow: чистит HitRegistry, запоминает урон и стартовые позиции точек.
    ///
    /// Уже открытое окно перезапускается. Возвращает true при перезапуске.
    pub fn start_window(&mut self, damage: f32, owner: &Transform) -> bool {
        let restarted = self.window.is_some();
        let damage = if damage > 0.0 { damage } else { self.base_damage };

        self.registry.clear();
        self.window = Some(TraceWindow {
            damage,
            since_sweep: 0.0,
            last_positions: self.socket_positions(owner),
        });
        restarted
    }

    /// StopWindow: идемпотентна. true если окно было открыто.
    pub fn stop_window(&mut self) -> bool {
        self.registry.clear();
        self.window.take().is_some()
    }

    /// Продвигает таймер окна. true если пора делать sweep.
    ///
    /// Остаток переносится (не больше одного интервала), так что
    /// при тике 60Hz и интервале 20ms sweep'ы идут с нужной частотой без догоняния.
    pub fn advance(&mut self, delta: f32) -> bool {
        let interval = self.interval.max(MIN_TRACE_INTERVAL);
        let Some(window) = self.window.as_mut() else {
            return false;
        };

        window.since_sweep += delta;
        if window.since_sweep + 1e-6 < interval {
            return false;
        }
        window.since_sweep = (window.since_sweep - interval).clamp(0.0, interval);
        true
    }

    /// Отрезки (прошлая позиция → текущая) для каждой точки; прошлые позиции обновляются
    pub fn sweep_segments(&mut self, owner: &Transform) -> Vec<(Vec3, Vec3)> {
        let current = self.socket_positions(owner);
        let Some(window) = self.window.as_mut() else {
            return Vec::new();
        };

        let segments = window
            .last_positions
            .iter()
            .copied()
            .zip(current.iter().copied())
            .collect();
        window.last_positions = current;
        segments
    }

    /// Регистрирует попадание. true если урон нужно применить.
    pub fn register_hit(&mut self, entity: Entity) -> bool {
        if self.window.is_none() {
            return false;
        }
        let first = self.registry.insert(entity);
        first || self.allow_multiple_hits
    }
}
