//! Общие helpers для integration тестов
//!
//! Каждый `step` = ровно один FixedUpdate тик (ManualDuration = fixed step).

#![allow(dead_code)]

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use ironfist_simulation::*;

/// Полный combat App (SimulationPlugin с настройками по умолчанию)
pub fn combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(fixed_step()));

    // Первый update: Time стартует с нулевого delta, FixedUpdate не запускается
    app.update();
    app
}

pub fn step(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.update();
    }
}

pub fn send<E: Event>(app: &mut App, event: E) {
    app.world_mut().send_event(event);
}

pub fn spawn_player(app: &mut App, position: Vec3, faction_id: u64) -> Entity {
    let settings = CombatSettings::default();
    app.world_mut()
        .spawn(player_bundle(SpawnPoint::new(position, faction_id), &settings))
        .id()
}

pub fn spawn_bot(app: &mut App, position: Vec3, faction_id: u64, facing: Vec3) -> Entity {
    let settings = CombatSettings::default();
    app.world_mut()
        .spawn(bot_bundle(SpawnPoint::new(position, faction_id).facing(facing), &settings))
        .id()
}

/// Боец без AI и lock'а (мишень)
pub fn spawn_dummy(app: &mut App, position: Vec3, faction_id: u64) -> Entity {
    app.world_mut()
        .spawn((Combatant::new(faction_id), Transform::from_translation(position)))
        .id()
}

pub fn health(app: &App, entity: Entity) -> f32 {
    app.world().get::<Health>(entity).map_or(-1.0, |h| h.current())
}

pub fn position(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).map_or(Vec3::NAN, |t| t.translation)
}

pub fn set_position(app: &mut App, entity: Entity, position: Vec3) {
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(entity) {
        transform.translation = position;
    }
}

pub fn yaw(app: &App, entity: Entity) -> f32 {
    app.world().get::<Transform>(entity).map_or(f32::NAN, yaw_of)
}

pub fn component<C: Component + Clone>(app: &App, entity: Entity) -> C {
    app.world()
        .get::<C>(entity)
        .cloned()
        .unwrap_or_else(|| panic!("{entity:?} has no {}", std::any::type_name::<C>()))
}

/// Все события типа E, прошедшие через FixedUpdate с момента `record`
#[derive(Resource)]
pub struct Recorded<E: Event>(pub Vec<E>);

impl<E: Event> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn collect_events<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

pub fn record<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>();
    app.add_systems(FixedUpdate, collect_events::<E>.after(CombatSet::Locomotion));
}

pub fn recorded<E: Event + Clone>(app: &App) -> Vec<E> {
    app.world().resource::<Recorded<E>>().0.clone()
}
