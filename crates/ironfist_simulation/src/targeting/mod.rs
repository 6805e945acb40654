//! Target Lock Controller
//!
//! Sticky ссылка на врага для камеры и rotation assist.
//!
//! - TargetLock: состояние (locked, target Entity, manual disable, auto-check timestamp)
//! - LockRequest: toggle / enable / disable / switch от input слоя
//! - AI ставит цель напрямую через `TargetLock::set_target` (perception)
//!
//! Lock не владеет целью: Entity проверяется каждый тик и обнуляется,
//! если цель умерла, despawned или ушла за break радиус.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

pub use components::*;
pub use events::{LockRequest, LockRequestKind};
pub use systems::{apply_lock_rotation, gather_candidates, process_lock_requests, update_target_locks};

use crate::CombatSet;

/// Target lock plugin
///
/// - CombatSet::Input: process_lock_requests
/// - CombatSet::TargetLock: update_target_locks → apply_lock_rotation
///   (после Death, до Locomotion: бег перекрывает assist)
pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LockRequest>();

        app.add_systems(FixedUpdate, process_lock_requests.in_set(CombatSet::Input));
        app.add_systems(
            FixedUpdate,
            (update_target_locks, apply_lock_rotation)
                .chain()
                .in_set(CombatSet::TargetLock),
        );
    }
}
