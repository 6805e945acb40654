//! World query layer: sphere sweep и radius query по hurtbox капсулам.
//!
//! Core использует только `SceneQuery` (SystemParam), broad-phase здесь не нужен:
//! бойцов десятки, brute force по капсулам детерминирован и дешёвый.
//! Слои: `bevy_rapier3d::Group` bitmask (membership hurtbox ∩ слой запроса).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

/// Collision слои
pub mod layers {
    use bevy_rapier3d::prelude::Group;

    /// Тела бойцов (hurtbox): по нему идут sweep'ы оружия и lock query
    pub const COMBATANT: Group = Group::GROUP_1;
}

/// Hurtbox бойца: вертикальная капсула над `Transform::translation`
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hurtbox {
    pub radius: f32,
    /// Половина длины центрального отрезка капсулы
    pub half_height: f32,
    /// Высота центра капсулы над позицией (позиция = ноги)
    pub center_height: f32,
    pub memberships: Group,
}

impl Default for Hurtbox {
    fn default() -> Self {
        Self {
            radius: 35.0,
            half_height: 55.0,
            center_height: 90.0,
            memberships: layers::COMBATANT,
        }
    }
}

impl Hurtbox {
    /// Центральный отрезок капсулы в world space
    pub fn segment(&self, origin: Vec3) -> (Vec3, Vec3) {
        let center = origin + Vec3::Y * self.center_height;
        (
            center - Vec3::Y * self.half_height,
            center + Vec3::Y * self.half_height,
        )
    }

    pub fn in_layer(&self, layer: Group) -> bool {
        self.memberships.intersects(layer)
    }
}

/// Попадание sweep'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub entity: Entity,
    /// Ближайшая к капсуле точка на пути sweep'а
    pub point: Vec3,
    /// Доля пути [0, 1] до `point`
    pub fraction: f32,
}

/// Результат radius query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyEntity {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
}

/// Spatial queries поверх Hurtbox компонентов
#[derive(SystemParam)]
pub struct SceneQuery<'w, 's> {
    volumes: Query<'w, 's, (Entity, &'static Transform, &'static Hurtbox)>,
    transforms: Query<'w, 's, &'static Transform>,
}

impl SceneQuery<'_, '_> {
    /// Sweep сферы радиуса `radius` от `start` до `end` по слою `layer`, без `ignore`
    pub fn sweep_sphere(
        &self,
        start: Vec3,
        end: Vec3,
        radius: f32,
        layer: Group,
        ignore: &[Entity],
    ) -> Vec<SweepHit> {
        sweep_volumes(
            self.volumes.iter().map(|(e, t, h)| (e, t.translation, h)),
            start,
            end,
            radius,
            layer,
            ignore,
        )
    }

    /// Все тела слоя, пересекающие сферу (origin, radius), отсортированы по дистанции
    pub fn query_nearby(&self, origin: Vec3, radius: f32, layer: Group) -> Vec<NearbyEntity> {
        nearby_volumes(
            self.volumes.iter().map(|(e, t, h)| (e, t.translation, h)),
            origin,
            radius,
            layer,
        )
    }

    /// Позиция entity (None если despawned / нет Transform)
    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.transforms.get(entity).ok().map(|t| t.translation)
    }
}

pub fn sweep_volumes<'a>(
    volumes: impl Iterator<Item = (Entity, Vec3, &'a Hurtbox)>,
    start: Vec3,
    end: Vec3,
    radius: f32,
    layer: Group,
    ignore: &[Entity],
) -> Vec<SweepHit> {
    let mut hits: Vec<SweepHit> = volumes
        .filter(|(entity, _, hurtbox)| hurtbox.in_layer(layer) && !ignore.contains(entity))
        .filter_map(|(entity, origin, hurtbox)| {
            let (a, b) = hurtbox.segment(origin);
            let closest = closest_segment_points(start, end, a, b);
            (closest.distance <= radius + hurtbox.radius).then(|| SweepHit {
                entity,
                point: closest.on_first,
                fraction: closest.s,
            })
        })
        .collect();

    // Порядок по пути sweep'а, затем по entity (детерминизм)
    hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction).then(a.entity.cmp(&b.entity)));
    hits
}

pub fn nearby_volumes<'a>(
    volumes: impl Iterator<Item = (Entity, Vec3, &'a Hurtbox)>,
    origin: Vec3,
    radius: f32,
    layer: Group,
) -> Vec<NearbyEntity> {
    let mut found: Vec<NearbyEntity> = volumes
        .filter(|(_, _, hurtbox)| hurtbox.in_layer(layer))
        .filter_map(|(entity, position, hurtbox)| {
            let (a, b) = hurtbox.segment(position);
            let closest = closest_segment_points(origin, origin, a, b);
            (closest.distance <= radius + hurtbox.radius).then(|| NearbyEntity {
                entity,
                position,
                distance: origin.distance(position),
            })
        })
        .collect();

    found.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.entity.cmp(&b.entity)));
    found
}

/// Ближайшие точки двух отрезков
#[derive(Debug, Clone, Copy)]
pub struct ClosestPoints {
    pub distance: f32,
    pub s: f32,
    pub on_first: Vec3,
}

/// Closest points между отрезками p1-q1 и p2-q2 (вырожденные отрезки допустимы)
pub fn closest_segment_points(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> ClosestPoints {
    const EPS: f32 = 1e-6;

    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t) = if a <= EPS && e <= EPS {
        (0.0, 0.0)
    } else if a <= EPS {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPS {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s = if denom > EPS {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    let on_first = p1 + d1 * s;
    let on_second = p2 + d2 * t;
    ClosestPoints {
        distance: on_first.distance(on_second),
        s,
        on_first,
    }
}
