//! IRONFIST Simulation Core
//!
//! Real-time melee combat + target acquisition на Bevy 0.16 (headless ECS).
//!
//! Пять частей (снизу вверх):
//! - Damage pipeline: Health, HealthChanged, EntityDied (ровно один раз)
//! - Melee hit detection: MeleeTrace sweep'ы + HitRegistry
//! - Combo state machine: ComboSession (буфер, debounce, follow-up окна)
//! - Target lock: TargetLock (поиск, валидация, switch, rotation assist)
//! - AI engagement: AiEngagement / AiState (perception → дистанции → атака)
//!
//! Animation, камера, input устройства и perception — внешние слои,
//! общаются с core только через события.

use std::time::Duration;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod logger;
pub mod physics;
pub mod targeting;

// Re-export базовых типов для удобства
pub use actor::{bot_bundle, player_bundle, Bot, Player, SpawnPoint};
pub use ai::{AIPlugin, AiConfig, AiEngagement, AiState, PerceptionEvent};
pub use combat::{
    AnimationEvent, AnimationPhase, AttackCatalog, AttackRequest, AttackStarted, CombatCommand, CombatPlugin,
    ComboPhase, ComboSession, DamageDealt, DamageRequest, EntityDied, HealthChanged, MeleeTrace,
    SimulationAuthority,
};
pub use components::*;
pub use config::{CombatSettings, ConfigError};
pub use input::{CombatInput, CombatInputPlugin};
pub use logger::init_logger;
pub use physics::{Hurtbox, LocomotionPlugin, SceneQuery};
pub use targeting::{LockRequest, SwitchDirection, TargetLock, TargetLockConfig, TargetingPlugin};

/// Частота симуляции (FixedUpdate)
pub const FIXED_HZ: f64 = 60.0;

/// Seed по умолчанию, если RNG не вставлен заранее
pub const DEFAULT_SEED: u64 = 42;

/// Длительность одного тика
pub fn fixed_step() -> Duration {
    Duration::from_secs_f64(1.0 / FIXED_HZ)
}

/// Порядок фаз тика (FixedUpdate, chained)
///
/// TargetLock строго перед Locomotion: ротация бега (Locomotion) всегда
/// перекрывает lock assist. Death сразу после Damage: смерть отменяет
/// окна и буферы в том же тике.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// NextTickQueue прошлого тика
    Deferred,
    /// CombatInput, restart hooks, lock запросы
    Input,
    Perception,
    Ai,
    Combo,
    Trace,
    Damage,
    Death,
    TargetLock,
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    settings: CombatSettings,
    catalog: AttackCatalog,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            settings: CombatSettings::default(),
            catalog: AttackCatalog::default(),
        }
    }
}

impl SimulationPlugin {
    /// Plugin с валидированными настройками
    pub fn new(settings: CombatSettings) -> Result<Self, ConfigError> {
        let catalog = settings.validate()?;
        Ok(Self { settings, catalog })
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            // Статическая конфигурация (не мутируется в рантайме)
            .insert_resource(self.catalog.clone())
            .insert_resource(self.settings.combo)
            .insert_resource(self.settings.trace)
            .insert_resource(self.settings.hit_reaction)
            .configure_sets(
                FixedUpdate,
                (
                    CombatSet::Deferred,
                    CombatSet::Input,
                    CombatSet::Perception,
                    CombatSet::Ai,
                    CombatSet::Combo,
                    CombatSet::Trace,
                    CombatSet::Damage,
                    CombatSet::Death,
                    CombatSet::TargetLock,
                    CombatSet::Locomotion,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                CombatInputPlugin,
                CombatPlugin,
                AIPlugin,
                TargetingPlugin,
                LocomotionPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (без SimulationPlugin)
pub fn create_headless_app(seed: u64) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity для детерминизма
    entities.sort_by_key(|(entity, _)| *entity);

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
