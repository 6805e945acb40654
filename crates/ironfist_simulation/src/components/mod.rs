//! ECS Components бойцов
//!
//! Организация по доменам:
//! - actor: Combatant, Health, Capabilities (флаги running/attacking/dead/hit_reacting)
//! - movement: MovementIntent, DesiredFacing, ViewDirection, походка, yaw math
//!
//! Компоненты конкретных подсистем живут рядом с ними
//! (combat::ComboSession, targeting::TargetLock, ai::AiEngagement).

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
