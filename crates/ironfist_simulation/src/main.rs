//! Headless симуляция IRONFIST
//!
//! Игрок против двух ботов без рендера: боты замечают игрока, догоняют и бьют,
//! игрок держит lock и отвечает комбо.

use bevy::prelude::*;
use ironfist_simulation::*;

const CONFIG: &str = include_str!("../config/combat.ron");
const TICKS: u32 = 1200;

fn main() {
    let seed = 42;

    let plugin = match ron::from_str::<CombatSettings>(CONFIG)
        .map_err(ConfigError::from)
        .and_then(SimulationPlugin::new)
    {
        Ok(plugin) => plugin,
        Err(err) => {
            eprintln!("Invalid combat config: {err}");
            std::process::exit(1);
        }
    };
    let settings = plugin.settings().clone();

    let mut app = create_headless_app(seed);
    app.add_plugins(plugin);
    app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(fixed_step()));

    tracing::info!(seed, "Starting IRONFIST headless simulation");

    let world = app.world_mut();
    let player = world
        .spawn(player_bundle(
            SpawnPoint::new(Vec3::ZERO, 1).with_health(300.0),
            &settings,
        ))
        .id();
    let bots: Vec<Entity> = [Vec3::new(150.0, 0.0, -800.0), Vec3::new(-400.0, 0.0, -600.0)]
        .into_iter()
        .map(|position| {
            world
                .spawn(bot_bundle(SpawnPoint::new(position, 2).facing(Vec3::ZERO), &settings))
                .id()
        })
        .collect();

    for &bot in &bots {
        world.send_event(PerceptionEvent::TargetDetected {
            observer: bot,
            target: player,
        });
    }

    for tick in 0..TICKS {
        // Игрок: бьёт каждые 0.5 секунды, пока жив
        if tick % 30 == 0 {
            app.world_mut().send_event(CombatInput::AttackRequested {
                entity: player,
                heavy: tick % 120 == 0,
            });
        }

        app.update();

        if tick % 120 == 0 {
            let world = app.world();
            let player_hp = world.get::<Health>(player).map_or(0.0, |h| h.current());
            let locked = world.get::<TargetLock>(player).and_then(|l| l.locked_target());
            tracing::info!(tick, player_hp, ?locked, "📊 Status");
        }
    }

    let world = app.world();
    for entity in std::iter::once(player).chain(bots) {
        let hp = world.get::<Health>(entity).map_or(0.0, |h| h.current());
        let state = world.get::<AiState>(entity).copied();
        println!("{entity:?}: hp = {hp:.1}, ai = {state:?}");
    }

    println!("Simulation complete!");
}
