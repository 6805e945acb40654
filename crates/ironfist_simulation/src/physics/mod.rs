//! Physics/world layer
//!
//! - query: SceneQuery (sphere sweep, radius query) поверх Hurtbox капсул
//! - movement: headless интеграция движения + ротация по походке

use bevy::prelude::*;

pub mod movement;
pub mod query;

pub use movement::{apply_locomotion_rotation, integrate_movement};
pub use query::{layers, Hurtbox, NearbyEntity, SceneQuery, SweepHit};

use crate::CombatSet;

/// Locomotion plugin: движение + ротация бойца (последними в тике)
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (integrate_movement, apply_locomotion_rotation)
                .chain()
                .in_set(CombatSet::Locomotion),
        );
    }
}
