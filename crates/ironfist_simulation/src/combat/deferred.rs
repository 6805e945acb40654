//! "Run on next tick" очередь.
//!
//! Буферизованная атака стартует не синхронно в конце предыдущей, а на
//! следующем тике: к этому моменту флаг attacking уже снят, и новая атака
//! не будет ложно отклонена.

use bevy::prelude::*;

use crate::combat::AttackRequest;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    RequestAttack { entity: Entity, heavy: bool },
}

impl DeferredAction {
    pub fn entity(&self) -> Entity {
        match self {
            DeferredAction::RequestAttack { entity, .. } => *entity,
        }
    }
}

/// Однопоточная очередь, дренируется один раз в начале тика
#[derive(Resource, Debug, Default)]
pub struct NextTickQueue {
    pending: Vec<DeferredAction>,
}

impl NextTickQueue {
    pub fn push(&mut self, action: DeferredAction) {
        self.pending.push(action);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<DeferredAction> {
        std::mem::take(&mut self.pending)
    }

    /// Отменяет всё отложенное для entity (смерть). Возвращает число отменённых.
    pub fn cancel_for(&mut self, entity: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|action| action.entity() != entity);
        before - self.pending.len()
    }
}

/// Система: дренирует очередь (первая в FixedUpdate)
pub fn drain_next_tick_queue(mut queue: ResMut<NextTickQueue>, mut requests: EventWriter<AttackRequest>) {
    for action in queue.drain() {
        match action {
            DeferredAction::RequestAttack { entity, heavy } => {
                tracing::debug!(?entity, heavy, "⏭️ Deferred attack request");
                requests.write(AttackRequest { entity, heavy });
            }
        }
    }
}
