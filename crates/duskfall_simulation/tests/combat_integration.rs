//! Integration-тесты боевого ядра: полный App, события как от host.
//!
//! `create_headless_app` двигает время вручную — один `app.update()`
//! равен одному fixed tick, тесты детерминированы.

use bevy::prelude::*;
use duskfall_simulation::{
    create_headless_app, spawn_enemy, spawn_player, AnimationCue, AnimationRequest, AnimationSet,
    AttackIntent, CueKind, CycleTargetIntent, DamageInstigated, Enemy, EnemyCommand,
    EnemyCommandKind, EnemyState, EntityDied, Health, HitConfirmed, MoveAxisIntent, MoveFlags,
    MovementCommand, ProximityEvent, ProximityKind, RollIntent, SimulationPlugin, SprintIntent,
    Stamina, Target, ToggleCombatIntent, WeaponContact, XpAwarded,
};

/// Захват исходящих событий для assertions (события дренируются каждый тик)
#[derive(Resource, Default)]
struct Outbox {
    animations: Vec<(Entity, String)>,
    deaths: Vec<Entity>,
    hits: Vec<(Entity, Entity)>,
    xp: Vec<(Entity, f32)>,
}

fn capture_outbox(
    mut outbox: ResMut<Outbox>,
    mut animations: EventReader<AnimationRequest>,
    mut deaths: EventReader<EntityDied>,
    mut hits: EventReader<HitConfirmed>,
    mut xp: EventReader<XpAwarded>,
) {
    for event in animations.read() {
        outbox.animations.push((event.entity, event.clip.clone()));
    }
    for event in deaths.read() {
        outbox.deaths.push(event.entity);
    }
    for event in hits.read() {
        outbox.hits.push((event.attacker, event.target));
    }
    for event in xp.read() {
        outbox.xp.push((event.to, event.amount));
    }
}

fn setup() -> App {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin)
        .init_resource::<Outbox>()
        .add_systems(FixedUpdate, capture_outbox.after(duskfall_simulation::SimSet::Upkeep));
    app
}

fn spawn_duo(app: &mut App, enemy_position: Vec3) -> (Entity, Entity) {
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let enemy = spawn_enemy(world, enemy_position, Enemy::default(), player);
    app.update();
    (player, enemy)
}

fn health_of(app: &App, entity: Entity) -> f32 {
    app.world().get::<Health>(entity).unwrap().current
}

fn state_of(app: &App, entity: Entity) -> EnemyState {
    *app.world().get::<EnemyState>(entity).unwrap()
}

// === Engagement ===

#[test]
fn test_enemy_engages_within_near_threshold() {
    let mut app = setup();
    // 10m < near_threshold 12m
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(10.0, 0.0, 0.0));

    app.update();
    app.update();

    assert_eq!(state_of(&app, enemy), EnemyState::ChaseClose);
    let target = app.world().get::<Target>(enemy).unwrap();
    assert!(target.locked);
    assert_eq!(
        *app.world().get::<MovementCommand>(enemy).unwrap(),
        MovementCommand::FollowEntity { target: player }
    );
}

#[test]
fn test_enemy_idle_beyond_near_threshold() {
    let mut app = setup();
    let (_, enemy) = spawn_duo(&mut app, Vec3::new(14.0, 0.0, 0.0));

    for _ in 0..5 {
        app.update();
    }

    assert_eq!(state_of(&app, enemy), EnemyState::Idle);
}

#[test]
fn test_chase_far_closes_to_chase_close() {
    let mut app = setup();
    let (_, enemy) = spawn_duo(&mut app, Vec3::new(7.0, 0.0, 0.0));

    // Approach переводит в ChaseFar; цель уже ближе close_threshold 8.5
    app.world_mut().send_event(EnemyCommand {
        entity: enemy,
        kind: EnemyCommandKind::Approach,
    });
    app.update();
    app.update();

    assert_eq!(state_of(&app, enemy), EnemyState::ChaseClose);
}

// === Damage pipeline ===

#[test]
fn test_lethal_damage_is_terminal_and_once_only() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    // Overkill: 150 на 100 hp
    app.world_mut().send_event(DamageInstigated {
        target: enemy,
        instigator: player,
        amount: 150.0,
    });
    app.update();
    app.update();

    assert_eq!(health_of(&app, enemy), 0.0);
    assert_eq!(state_of(&app, enemy), EnemyState::Dead);

    let outbox = app.world().resource::<Outbox>();
    assert_eq!(outbox.deaths, vec![enemy]);
    assert_eq!(outbox.xp, vec![(player, 40.0)]);
    let death_clips = outbox
        .animations
        .iter()
        .filter(|(e, clip)| *e == enemy && clip.starts_with("death"))
        .count();
    assert_eq!(death_clips, 1);

    // Повторный урон по мёртвому — полный no-op
    app.world_mut().send_event(DamageInstigated {
        target: enemy,
        instigator: player,
        amount: 50.0,
    });
    for _ in 0..3 {
        app.update();
    }

    let outbox = app.world().resource::<Outbox>();
    assert_eq!(outbox.deaths.len(), 1);
    assert_eq!(outbox.xp.len(), 1);
    let death_clips = outbox
        .animations
        .iter()
        .filter(|(e, clip)| *e == enemy && clip.starts_with("death"))
        .count();
    assert_eq!(death_clips, 1, "death side effects must not repeat");
}

#[test]
fn test_damage_interrupts_attack_into_stumble() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(EnemyCommand {
        entity: enemy,
        kind: EnemyCommandKind::Attack { rotate: false },
    });
    app.update();
    assert_eq!(state_of(&app, enemy), EnemyState::Attack);

    app.world_mut().send_event(DamageInstigated {
        target: enemy,
        instigator: player,
        amount: 25.0,
    });
    app.update();

    assert_eq!(state_of(&app, enemy), EnemyState::Stumble);
    let attack = app
        .world()
        .get::<duskfall_simulation::AttackState>(enemy)
        .unwrap();
    assert!(!attack.attacking);

    // Команды во время stumble отбрасываются
    app.world_mut().send_event(EnemyCommand {
        entity: enemy,
        kind: EnemyCommandKind::Attack { rotate: false },
    });
    app.update();
    assert_eq!(state_of(&app, enemy), EnemyState::Stumble);

    // Конец hit reaction → обратно в погоню
    app.world_mut().send_event(AnimationCue {
        entity: enemy,
        kind: CueKind::StumbleEnd,
    });
    app.update();
    assert_eq!(state_of(&app, enemy), EnemyState::ChaseClose);
}

#[test]
fn test_consecutive_stumble_clips_never_repeat() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    for _ in 0..6 {
        app.world_mut().send_event(DamageInstigated {
            target: enemy,
            instigator: player,
            amount: 5.0,
        });
        app.update();
        app.world_mut().send_event(AnimationCue {
            entity: enemy,
            kind: CueKind::StumbleEnd,
        });
        app.update();
    }

    let outbox = app.world().resource::<Outbox>();
    let stumbles: Vec<&String> = outbox
        .animations
        .iter()
        .filter(|(e, clip)| *e == enemy && clip.starts_with("takehit"))
        .map(|(_, clip)| clip)
        .collect();
    assert_eq!(stumbles.len(), 6);
    for pair in stumbles.windows(2) {
        assert_ne!(pair[0], pair[1], "immediate stumble clip repeat");
    }
}

#[test]
fn test_uninterruptable_enemy_takes_damage_without_stumble() {
    let mut app = setup();
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let boss = spawn_enemy(world, Vec3::new(20.0, 0.0, 0.0), Enemy::boss(), player);
    app.update();

    app.world_mut().send_event(EnemyCommand {
        entity: boss,
        kind: EnemyCommandKind::Attack { rotate: false },
    });
    app.update();

    app.world_mut().send_event(DamageInstigated {
        target: boss,
        instigator: player,
        amount: 30.0,
    });
    app.update();

    assert_eq!(health_of(&app, boss), 70.0);
    // Замах не прерван
    assert_eq!(state_of(&app, boss), EnemyState::Attack);
}

#[test]
fn test_roll_grants_full_damage_immunity() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::RollStart,
    });
    app.update();

    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: enemy,
        amount: 40.0,
    });
    app.update();
    assert_eq!(health_of(&app, player), 100.0);

    // После RollEnd уязвимость возвращается
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::RollEnd,
    });
    app.update();
    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: enemy,
        amount: 40.0,
    });
    app.update();
    assert_eq!(health_of(&app, player), 60.0);
}

#[test]
fn test_locked_victim_immune_to_third_parties() {
    let mut app = setup();
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    // За near_threshold (12), но внутри lock_distance (15)
    let grunt = spawn_enemy(world, Vec3::new(13.0, 0.0, 0.0), Enemy::default(), player);
    let brute = spawn_enemy(world, Vec3::new(0.0, 0.0, 14.0), Enemy::default(), player);
    app.update();

    for hostile in [grunt, brute] {
        app.world_mut().send_event(ProximityEvent {
            player,
            hostile,
            kind: ProximityKind::Entered,
        });
    }
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.update();

    let target = app.world().get::<Target>(player).unwrap();
    assert!(target.locked);
    assert_eq!(target.entity, Some(grunt));

    // Урон не от залоченной цели — отклонён
    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: brute,
        amount: 30.0,
    });
    app.update();
    assert_eq!(health_of(&app, player), 100.0);

    // От цели дуэли — проходит
    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: grunt,
        amount: 30.0,
    });
    app.update();
    assert_eq!(health_of(&app, player), 70.0);
}

// === Hit ledger ===

#[test]
fn test_hit_ledger_one_hit_per_swing() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::DamageWindowBegin,
    });

    // Overlap длится 5 тиков — контакт приходит каждый тик
    for _ in 0..5 {
        app.world_mut().send_event(WeaponContact {
            attacker: player,
            target: enemy,
        });
        app.update();
    }

    assert_eq!(health_of(&app, enemy), 75.0, "exactly one 25 dmg hit");
    let outbox = app.world().resource::<Outbox>();
    assert_eq!(outbox.hits, vec![(player, enemy)]);

    // Новый замах — ledger очищен, удар проходит снова
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::AttackEnd,
    });
    app.update();
    // Реген не успевает вернуть порог? 33 потрачено, регена хватает (тиков мало)
    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::DamageWindowBegin,
    });
    app.world_mut().send_event(WeaponContact {
        attacker: player,
        target: enemy,
    });
    app.update();

    assert_eq!(health_of(&app, enemy), 50.0);
}

#[test]
fn test_contact_outside_damage_window_ignored() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    // Замах идёт, но damage window ещё не открыт
    app.world_mut().send_event(WeaponContact {
        attacker: player,
        target: enemy,
    });
    app.update();

    assert_eq!(health_of(&app, enemy), 100.0);
    assert!(app.world().resource::<Outbox>().hits.is_empty());
}

#[test]
fn test_rejected_contact_does_not_burn_ledger_slot() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    // Враг перекатывается... у врагов нет RollState; вместо этого жертва
    // уже мертва — контакт отклонён, в ledger не попадает
    app.world_mut().send_event(DamageInstigated {
        target: enemy,
        instigator: player,
        amount: 200.0,
    });
    app.update();

    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::DamageWindowBegin,
    });
    app.world_mut().send_event(WeaponContact {
        attacker: player,
        target: enemy,
    });
    app.update();

    let attack = app
        .world()
        .get::<duskfall_simulation::AttackState>(player)
        .unwrap();
    assert!(!attack.has_hit(enemy), "rejected hit must not enter ledger");
    assert!(app.world().resource::<Outbox>().hits.is_empty());
}

// === Stamina ===

#[test]
fn test_stamina_gates_follow_cost_and_thresholds() {
    let mut app = setup();
    let (player, _) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    // Регенерацию выключаем, чтобы арифметика была точной
    app.world_mut().get_mut::<Stamina>(player).unwrap().regen_rate = 0.0;

    // Roll: 100 → 70
    app.world_mut().send_event(RollIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 70.0);

    // Attack: 70 → 37
    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 37.0);

    // Комбо-атака при 37 (> 10): 37 → 4
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::NextAttackReady,
    });
    app.update();
    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 4.0);

    // 4 ≤ 10 — атака отклонена
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::NextAttackReady,
    });
    app.update();
    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 4.0);

    // 4 ≤ 30 — перекат отклонён (замах завершаем, чтобы гейт был чисто по stamina)
    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::AttackEnd,
    });
    app.update();
    app.world_mut().send_event(RollIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 4.0);
}

#[test]
fn test_roll_attack_then_roll_denied_while_attacking() {
    let mut app = setup();
    let (player, _) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().get_mut::<Stamina>(player).unwrap().regen_rate = 0.0;

    // Roll: 100 → 70
    app.world_mut().send_event(RollIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 70.0);

    // Attack: 70 → 37
    app.world_mut().send_event(AttackIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 37.0);

    // Запас 37 выше порога 30, но замах ещё идёт — перекат отклонён,
    // stamina не тронута
    app.world_mut().send_event(RollIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Stamina>(player).unwrap().current, 37.0);
    let attack = app
        .world()
        .get::<duskfall_simulation::AttackState>(player)
        .unwrap();
    assert!(attack.attacking, "swing must survive the denied roll");
}

#[test]
fn test_combo_index_wraps_over_clip_table() {
    let mut app = setup();
    let (player, _) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    // Запас на 4 атаки подряд
    app.world_mut().get_mut::<Stamina>(player).unwrap().max = 400.0;
    app.world_mut().get_mut::<Stamina>(player).unwrap().current = 400.0;

    for _ in 0..4 {
        app.world_mut().send_event(AttackIntent { entity: player });
        app.update();
        app.world_mut().send_event(AnimationCue {
            entity: player,
            kind: CueKind::NextAttackReady,
        });
        app.update();
    }

    let outbox = app.world().resource::<Outbox>();
    let attacks: Vec<&String> = outbox
        .animations
        .iter()
        .filter(|(e, clip)| *e == player && clip.starts_with("attack"))
        .map(|(_, clip)| clip)
        .collect();
    // Таблица из трёх клипов: четвёртый замах заворачивает на первый
    assert_eq!(attacks.len(), 4);
    assert_eq!(attacks[3], attacks[0]);
    assert_ne!(attacks[1], attacks[0]);
    assert_ne!(attacks[2], attacks[1]);
}

#[test]
fn test_sprint_does_not_drain_while_locked() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(0.0, 0.0, -5.0));

    app.world_mut().send_event(ProximityEvent {
        player,
        hostile: enemy,
        kind: ProximityKind::Entered,
    });
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.world_mut().send_event(SprintIntent {
        entity: player,
        sprinting: true,
    });
    app.world_mut().send_event(MoveAxisIntent {
        entity: player,
        direction: Vec2::new(1.0, 0.0),
    });
    app.update();
    assert!(app.world().get::<Target>(player).unwrap().locked);

    let before = app.world().get::<Stamina>(player).unwrap().current;
    for _ in 0..60 {
        app.update();
    }
    let after = app.world().get::<Stamina>(player).unwrap().current;
    assert!(after >= before, "sprint must not drain under combat lock");
}

#[test]
fn test_stamina_regenerates_when_idle() {
    let mut app = setup();
    let (player, _) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(RollIntent { entity: player });
    app.update();
    let drained = app.world().get::<Stamina>(player).unwrap().current;
    assert!(drained <= 70.5);

    // ~2 секунды простоя: 15/s regen
    for _ in 0..120 {
        app.update();
    }
    let recovered = app.world().get::<Stamina>(player).unwrap().current;
    assert!(
        recovered >= drained + 25.0,
        "expected regen, got {recovered} from {drained}"
    );
}

// === Targeting ===

#[test]
fn test_cycle_target_round_trip() {
    let mut app = setup();
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    // Камера в origin по умолчанию; текущая цель впереди (-Z), второй справа
    let ahead = spawn_enemy(world, Vec3::new(0.0, 0.0, -5.0), Enemy::default(), player);
    let right = spawn_enemy(world, Vec3::new(4.0, 0.0, -5.0), Enemy::default(), player);
    app.update();

    for hostile in [ahead, right] {
        app.world_mut().send_event(ProximityEvent {
            player,
            hostile,
            kind: ProximityKind::Entered,
        });
    }
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Target>(player).unwrap().entity, Some(ahead));

    // По часовой → правый; обратно → исходный
    app.world_mut().send_event(CycleTargetIntent {
        entity: player,
        clockwise: true,
    });
    app.update();
    assert_eq!(app.world().get::<Target>(player).unwrap().entity, Some(right));

    app.world_mut().send_event(CycleTargetIntent {
        entity: player,
        clockwise: false,
    });
    app.update();
    assert_eq!(app.world().get::<Target>(player).unwrap().entity, Some(ahead));
}

#[test]
fn test_dead_target_triggers_auto_retarget() {
    let mut app = setup();
    let world = app.world_mut();
    let player = spawn_player(world, Vec3::ZERO);
    let grunt = spawn_enemy(world, Vec3::new(0.0, 0.0, -5.0), Enemy::default(), player);
    let brute = spawn_enemy(world, Vec3::new(0.0, 0.0, -9.0), Enemy::default(), player);
    app.update();

    for hostile in [grunt, brute] {
        app.world_mut().send_event(ProximityEvent {
            player,
            hostile,
            kind: ProximityKind::Entered,
        });
    }
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.update();
    assert_eq!(app.world().get::<Target>(player).unwrap().entity, Some(grunt));

    app.world_mut().send_event(DamageInstigated {
        target: grunt,
        instigator: player,
        amount: 200.0,
    });
    app.update();
    app.update();

    let target = app.world().get::<Target>(player).unwrap();
    assert_eq!(target.entity, Some(brute), "auto-retarget to next hostile");
    assert!(target.locked);

    // Последний умер — lock снимается
    app.world_mut().send_event(DamageInstigated {
        target: brute,
        instigator: player,
        amount: 200.0,
    });
    app.update();
    app.update();

    let target = app.world().get::<Target>(player).unwrap();
    assert_eq!(target.entity, None);
    assert!(!target.locked);
}

#[test]
fn test_lock_breaks_beyond_lock_distance() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(0.0, 0.0, -5.0));

    app.world_mut().send_event(ProximityEvent {
        player,
        hostile: enemy,
        kind: ProximityKind::Entered,
    });
    app.world_mut().send_event(ToggleCombatIntent { entity: player });
    app.update();
    assert!(app.world().get::<Target>(player).unwrap().locked);

    // Цель утащили за lock_distance 15
    app.world_mut().get_mut::<Transform>(enemy).unwrap().translation = Vec3::new(0.0, 0.0, -20.0);
    app.update();

    let target = app.world().get::<Target>(player).unwrap();
    assert!(!target.locked);
    assert_eq!(target.entity, None);
}

// === Move flags ===

#[test]
fn test_stumble_drives_backwards_move_flag() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: enemy,
        amount: 10.0,
    });
    app.update();
    assert!(app.world().get::<MoveFlags>(player).unwrap().backwards);

    app.world_mut().send_event(AnimationCue {
        entity: player,
        kind: CueKind::StumbleEnd,
    });
    app.update();
    assert!(!app.world().get::<MoveFlags>(player).unwrap().backwards);
}

#[test]
fn test_enemy_swing_drives_forward_move_flag() {
    let mut app = setup();
    let (_, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut().send_event(EnemyCommand {
        entity: enemy,
        kind: EnemyCommandKind::Attack { rotate: false },
    });
    app.update();
    assert!(app.world().get::<MoveFlags>(enemy).unwrap().forward);

    app.world_mut().send_event(AnimationCue {
        entity: enemy,
        kind: CueKind::AttackEnd,
    });
    app.update();
    assert!(!app.world().get::<MoveFlags>(enemy).unwrap().forward);
}

// === Player death ===

#[test]
fn test_player_death_freezes_enemy_ai() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(10.0, 0.0, 0.0));

    app.update();
    assert_eq!(state_of(&app, enemy), EnemyState::ChaseClose);

    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: enemy,
        amount: 500.0,
    });
    app.update();

    assert!(app.world().get::<Enemy>(enemy).unwrap().target_dead);
    let frozen = state_of(&app, enemy);
    for _ in 0..5 {
        app.update();
    }
    assert_eq!(state_of(&app, enemy), frozen, "FSM must be a no-op");
}

#[test]
#[should_panic(expected = "clip table is empty")]
fn test_player_death_with_empty_death_table_fails_loudly() {
    let mut app = setup();
    let (player, enemy) = spawn_duo(&mut app, Vec3::new(20.0, 0.0, 0.0));

    app.world_mut()
        .get_mut::<AnimationSet>(player)
        .unwrap()
        .deaths
        .clear();

    app.world_mut().send_event(DamageInstigated {
        target: player,
        instigator: enemy,
        amount: 500.0,
    });
    app.update();
    app.update();
}
