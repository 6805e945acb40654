//! Target lock state + чистая логика выбора целей.
//!
//! Lock хранит только Entity цели (generation-checked handle, не владеет ею).
//! Позиции и "жива ли" цель системы передают сюда как `LockCandidate`.

use bevy::prelude::*;
use serde::Deserialize;

use crate::components::planar;

/// Радиусы, углы, скорость rotation assist
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct TargetLockConfig {
    /// Радиус поиска целей
    pub max_lock_distance: f32,
    /// Радиус разрыва lock'а (больше радиуса поиска: без мерцания на границе)
    pub break_distance: f32,
    /// Ближе этого lock не рвётся никогда (ближний бой)
    pub always_valid_distance: f32,
    /// Половина угла конуса поиска (градусы)
    pub lock_angle: f32,
    /// Скорость поворота к цели (градусы/сек)
    pub rotation_speed: f32,
    /// Смещение точки фокуса по высоте (камера)
    pub target_height_offset: f32,
    pub auto_lock: bool,
    pub auto_lock_distance: f32,
    pub auto_check_interval: f32,
}

impl Default for TargetLockConfig {
    fn default() -> Self {
        Self {
            max_lock_distance: 1000.0,
            break_distance: 1500.0,
            always_valid_distance: 300.0,
            lock_angle: 60.0,
            rotation_speed: 720.0,
            target_height_offset: 80.0,
            auto_lock: true,
            auto_lock_distance: 600.0,
            auto_check_interval: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SwitchDirection {
    Left,
    Right,
}

/// Потенциальная цель (снимок из SceneQuery + Health + фракция)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockCandidate {
    pub entity: Entity,
    pub position: Vec3,
    pub alive: bool,
    pub hostile: bool,
}

/// Состояние lock'а бойца
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(TargetLockConfig)]
pub struct TargetLock {
    locked: bool,
    target: Option<Entity>,
    /// Игрок выключил lock сам: auto-lock подавлен до явного включения
    manually_disabled: bool,
    last_auto_check: Option<f32>,
    /// Последняя известная позиция цели
    focus: Option<Vec3>,
}

impl TargetLock {
    /// IsTargetLocked
    pub fn is_target_locked(&self) -> bool {
        self.locked && self.target.is_some()
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// LockedTarget для камеры: Some только при активном lock'е
    pub fn locked_target(&self) -> Option<Entity> {
        if self.is_target_locked() {
            self.target
        } else {
            None
        }
    }

    pub fn is_manually_disabled(&self) -> bool {
        self.manually_disabled
    }

    pub fn focus(&self) -> Option<Vec3> {
        if self.is_target_locked() {
            self.focus
        } else {
            None
        }
    }

    /// Точка кадрирования камеры (позиция цели + height offset)
    pub fn focus_point(&self, config: &TargetLockConfig) -> Option<Vec3> {
        self.focus().map(|p| p + Vec3::Y * config.target_height_offset)
    }

    /// EnableTargetLock: ближайшая доступная цель. Явное включение снимает manual disable.
    pub fn enable(
        &mut self,
        owner_position: Vec3,
        forward: Vec3,
        candidates: &[LockCandidate],
        config: &TargetLockConfig,
    ) -> bool {
        self.manually_disabled = false;
        let available = find_available_targets(
            owner_position,
            forward,
            candidates,
            config.max_lock_distance,
            config.lock_angle,
        );

        match closest_target(owner_position, &available) {
            Some(candidate) => {
                self.lock_on(candidate);
                true
            }
            None => false,
        }
    }

    /// DisableTargetLock (идемпотентно). true если lock был.
    pub fn disable(&mut self) -> bool {
        let was_locked = self.is_target_locked();
        self.locked = false;
        self.target = None;
        self.focus = None;
        was_locked
    }

    /// Выключение игроком: auto-lock подавлен до явного enable
    pub fn disable_manually(&mut self) -> bool {
        self.manually_disabled = true;
        self.disable()
    }

    /// ToggleTargetLock. Возвращает состояние после переключения.
    pub fn toggle(
        &mut self,
        owner_position: Vec3,
        forward: Vec3,
        candidates: &[LockCandidate],
        config: &TargetLockConfig,
    ) -> bool {
        if self.is_target_locked() {
            self.disable_manually();
            false
        } else {
            self.enable(owner_position, forward, candidates, config)
        }
    }

    /// SwitchTargetRight / Left. true если цель сменилась. Без lock'а: no-op.
    pub fn switch_target(
        &mut self,
        owner_position: Vec3,
        forward: Vec3,
        view_right: Vec3,
        candidates: &[LockCandidate],
        direction: SwitchDirection,
        config: &TargetLockConfig,
    ) -> bool {
        if !self.is_target_locked() {
            return false;
        }

        let available = find_available_targets(
            owner_position,
            forward,
            candidates,
            config.max_lock_distance,
            config.lock_angle,
        );

        match target_in_direction(
            owner_position,
            view_right,
            self.target,
            &available,
            direction,
            config.max_lock_distance,
        ) {
            Some(candidate) => {
                self.lock_on(candidate);
                true
            }
            None => false,
        }
    }

    /// SetTarget (AI / скрипты)
    pub fn set_target(&mut self, target: Entity, position: Option<Vec3>, auto_enable: bool) {
        self.target = Some(target);
        self.focus = position;
        if auto_enable {
            self.locked = true;
        }
    }

    /// ClearTarget
    pub fn clear_target(&mut self) {
        self.disable();
    }

    /// Полный сброс (restart hook)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Auto-lock: раз в `auto_check_interval`, если не выключен вручную и lock'а нет.
    /// Конус шире (×1.5), радиус короче.
    pub fn try_auto_lock(
        &mut self,
        now: f32,
        owner_position: Vec3,
        forward: Vec3,
        candidates: &[LockCandidate],
        config: &TargetLockConfig,
    ) -> bool {
        if !config.auto_lock || self.manually_disabled || self.is_target_locked() {
            return false;
        }
        if let Some(last) = self.last_auto_check {
            if now - last < config.auto_check_interval {
                return false;
            }
        }
        self.last_auto_check = Some(now);

        let available = find_available_targets(
            owner_position,
            forward,
            candidates,
            config.auto_lock_distance,
            config.lock_angle * 1.5,
        );

        match closest_target(owner_position, &available) {
            Some(candidate) => {
                self.lock_on(candidate);
                true
            }
            None => false,
        }
    }

    /// Нужно ли сейчас проверять auto-lock (чтобы не делать query каждый тик)
    pub fn auto_check_due(&self, now: f32, config: &TargetLockConfig) -> bool {
        config.auto_lock
            && !self.manually_disabled
            && !self.is_target_locked()
            && self
                .last_auto_check
                .is_none_or(|last| now - last >= config.auto_check_interval)
    }

    /// Проверка валидности (каждый тик при lock'е).
    ///
    /// `target_state`: None если цель despawned, иначе (позиция, жива).
    /// Возвращает true если lock сохранён.
    pub fn validate(
        &mut self,
        owner_position: Vec3,
        target_state: Option<(Vec3, bool)>,
        config: &TargetLockConfig,
    ) -> bool {
        if !self.is_target_locked() {
            return false;
        }

        match target_state {
            Some((position, alive)) if is_target_valid(owner_position, position, alive, config) => {
                self.focus = Some(position);
                true
            }
            _ => {
                self.disable();
                false
            }
        }
    }

    fn lock_on(&mut self, candidate: LockCandidate) {
        self.locked = true;
        self.target = Some(candidate.entity);
        self.focus = Some(candidate.position);
    }
}

/// FindAvailableTargets: живые враги в радиусе и в конусе `half_angle_deg` от forward
pub fn find_available_targets(
    owner_position: Vec3,
    forward: Vec3,
    candidates: &[LockCandidate],
    radius: f32,
    half_angle_deg: f32,
) -> Vec<LockCandidate> {
    let forward = planar(forward).normalize_or_zero();
    let min_dot = half_angle_deg.to_radians().cos();

    candidates
        .iter()
        .filter(|c| c.alive && c.hostile)
        .filter(|c| owner_position.distance(c.position) <= radius)
        .filter(|c| {
            let to_target = planar(c.position - owner_position).normalize_or_zero();
            // Цель в той же точке: считаем в конусе
            to_target == Vec3::ZERO || forward == Vec3::ZERO || forward.dot(to_target) >= min_dot
        })
        .copied()
        .collect()
}

pub fn closest_target(owner_position: Vec3, available: &[LockCandidate]) -> Option<LockCandidate> {
    available.iter().copied().min_by(|a, b| {
        owner_position
            .distance(a.position)
            .total_cmp(&owner_position.distance(b.position))
            .then(a.entity.cmp(&b.entity))
    })
}

/// Лучшая цель справа/слева от текущей: score = |right·dir| / (dist / max_lock_distance)
pub fn target_in_direction(
    owner_position: Vec3,
    view_right: Vec3,
    current: Option<Entity>,
    available: &[LockCandidate],
    direction: SwitchDirection,
    max_lock_distance: f32,
) -> Option<LockCandidate> {
    let right = planar(view_right).normalize_or_zero();
    let mut best: Option<(f32, LockCandidate)> = None;

    for candidate in available.iter().filter(|c| Some(c.entity) != current) {
        let offset = planar(candidate.position - owner_position);
        let to_target = offset.normalize_or_zero();
        let right_dot = to_target.dot(right);

        let on_side = match direction {
            SwitchDirection::Right => right_dot >= 0.0,
            SwitchDirection::Left => right_dot <= 0.0,
        };
        if !on_side {
            continue;
        }

        let normalized_distance = (offset.length() / max_lock_distance).max(1e-3);
        let score = right_dot.abs() / normalized_distance;

        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, *candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// Цель валидна: жива; ближе always-valid радиуса всегда, иначе не дальше break радиуса
pub fn is_target_valid(owner_position: Vec3, target_position: Vec3, alive: bool, config: &TargetLockConfig) -> bool {
    if !alive {
        return false;
    }
    let distance = owner_position.distance(target_position);
    distance <= config.always_valid_distance || distance <= config.break_distance
}
