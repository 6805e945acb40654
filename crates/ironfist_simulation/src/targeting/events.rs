//! Target lock requests (input → TargetLock)

use bevy::prelude::*;

use crate::targeting::SwitchDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRequestKind {
    /// ToggleTargetLock (ручное выключение подавляет auto-lock)
    Toggle,
    Enable,
    Disable,
    Switch(SwitchDirection),
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRequest {
    pub entity: Entity,
    pub kind: LockRequestKind,
}
