//! Movement компоненты: намерение движения, походка, yaw helpers
//!
//! Core пишет MovementIntent / DesiredFacing / Capabilities::gait(),
//! movement layer (или headless integrator из physics::movement) их исполняет.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use serde::Deserialize;

/// Походка: влияет на скорость и на то, кто управляет ротацией
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum Gait {
    #[default]
    Walking,
    Running,
}

/// Намерение движения в world space (плоскость XZ, не нормализовано)
///
/// Пишут: input (MoveIntent), AI (move-toward-target).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementIntent {
    pub direction: Vec3,
}

impl MovementIntent {
    pub fn stop(&mut self) {
        self.direction = Vec3::ZERO;
    }

    /// Двигаться от `from` к `to` (по горизонтали)
    pub fn toward(&mut self, from: Vec3, to: Vec3) {
        self.direction = planar(to - from).normalize_or_zero();
    }

    pub fn is_moving(&self) -> bool {
        self.direction.length_squared() > 1e-4
    }
}

/// Текущая скорость (результат интеграции движения)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Velocity(pub Vec3);

/// One-shot запрос мгновенно повернуться (AI атака: face target)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DesiredFacing {
    pub yaw: Option<f32>,
}

impl DesiredFacing {
    pub fn face(&mut self, from: Vec3, to: Vec3) {
        if let Some(yaw) = yaw_from_direction(to - from) {
            self.yaw = Some(yaw);
        }
    }
}

/// Yaw камеры / контроллера игрока (control rotation)
///
/// Нужен для MoveIntent (движение относительно камеры), walking-ротации
/// и SwitchTarget (право/лево относительно взгляда).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ViewDirection {
    pub yaw: f32,
}

impl ViewDirection {
    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        right_from_yaw(self.yaw)
    }

    /// Input vector (x = right, y = forward) → world direction
    pub fn intent_to_world(&self, input: Vec2) -> Vec3 {
        (self.right() * input.x + self.forward() * input.y).normalize_or_zero()
    }
}

/// Скорости и скорости поворота по походке
#[derive(Component, Debug, Clone, Copy, PartialEq, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Градусы в секунду
    pub walk_rotation_rate: f32,
    pub run_rotation_rate: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 200.0,
            run_speed: 450.0,
            walk_rotation_rate: 500.0,
            run_rotation_rate: 1000.0,
        }
    }
}

impl LocomotionConfig {
    pub fn speed(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walking => self.walk_speed,
            Gait::Running => self.run_speed,
        }
    }

    pub fn rotation_rate(&self, gait: Gait) -> f32 {
        match gait {
            Gait::Walking => self.walk_rotation_rate,
            Gait::Running => self.run_rotation_rate,
        }
    }
}

// ============================================================================
// Yaw math (Y-up, forward = -Z)
// ============================================================================

pub fn planar(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Yaw, при котором forward смотрит вдоль `direction` (None для нулевого вектора)
pub fn yaw_from_direction(direction: Vec3) -> Option<f32> {
    let flat = planar(direction);
    if flat.length_squared() < 1e-6 {
        return None;
    }
    Some((-flat.x).atan2(-flat.z))
}

pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

pub fn right_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

pub fn yaw_of(transform: &Transform) -> f32 {
    transform.rotation.to_euler(EulerRot::YXZ).0
}

/// Угол в (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Поворот `current` к `target` не больше чем на `max_step` радиан (кратчайшим путём)
pub fn rotate_yaw_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let diff = wrap_angle(target - current);
    if diff.abs() <= max_step {
        wrap_angle(target)
    } else {
        wrap_angle(current + diff.signum() * max_step)
    }
}
