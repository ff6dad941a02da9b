//! Headless демо: игрок против двух врагов, скриптованный бой.
//!
//! Запуск: cargo run -p duskfall_simulation

use bevy::prelude::*;
use duskfall_simulation::{
    create_headless_app, log_info, spawn_enemy, spawn_player, AnimationCue, AttackIntent, CueKind,
    CycleTargetIntent, Enemy, EnemyCommand, EnemyCommandKind, EnemyState, Health, ProximityEvent,
    ProximityKind, SimulationPlugin, ToggleCombatIntent, WeaponContact,
};

fn main() {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);

    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let grunt = spawn_enemy(world, Vec3::new(5.0, 0.0, 0.0), Enemy::default(), player);
    let brute = spawn_enemy(world, Vec3::new(0.0, 0.0, 6.0), Enemy::default(), player);
    app.update();

    log_info("=== DUSKFALL combat demo ===");

    // Враги замечены, игрок включает lock и перебирает цель
    for hostile in [grunt, brute] {
        app.world_mut().send_event(ProximityEvent {
            player,
            hostile,
            kind: ProximityKind::Entered,
        });
    }
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.update();
    app.world_mut()
        .send_event(CycleTargetIntent { entity: player, clockwise: true });
    app.update();

    // Грант атакует, игрок отвечает серией ударов до смерти гранта
    app.world_mut().send_event(EnemyCommand {
        entity: grunt,
        kind: EnemyCommandKind::Attack { rotate: true },
    });
    app.update();

    for _ in 0..5 {
        app.world_mut().send_event(AttackIntent { entity: player });
        app.update();
        app.world_mut().send_event(AnimationCue {
            entity: player,
            kind: CueKind::DamageWindowBegin,
        });
        app.world_mut().send_event(WeaponContact {
            attacker: player,
            target: grunt,
        });
        app.update();
        app.world_mut().send_event(AnimationCue {
            entity: player,
            kind: CueKind::AttackEnd,
        });
        // Пауза на реген stamina
        for _ in 0..120 {
            app.update();
        }
    }

    let world = app.world();
    let grunt_health = world.get::<Health>(grunt).map(|h| h.current).unwrap_or(0.0);
    let grunt_state = world.get::<EnemyState>(grunt).copied();
    log_info(&format!(
        "Grunt: {:.0} hp, state {:?}",
        grunt_health, grunt_state
    ));
    log_info("=== demo complete ===");
}
