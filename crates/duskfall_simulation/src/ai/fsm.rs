//! Вражеская combat state machine.
//!
//! Переходы:
//!   Idle → ChaseClose       цель жива и ближе near_threshold (+ lock)
//!   ChaseFar → ChaseClose   цель ближе close_threshold
//!   ChaseClose → Attack     команда Attack
//!   Attack → ChaseClose     AttackEnd cue (combat::cues)
//!   Stumble → ChaseClose    StumbleEnd cue / конец stumble
//!   Taunt → ChaseClose      TauntEnd cue
//!   * → Stumble             interrupt от damage pipeline
//!   * → Dead                lethal damage (absorbing)
//!
//! После смерти игрока (`Enemy::target_dead`) tick — полный no-op:
//! враги замирают в текущем состоянии.

use bevy::prelude::*;

use crate::animation::{pick_uniform, AnimationRequest, AnimationSet};
use crate::components::{
    AttackState, Enemy, EnemyConfig, EnemyState, Health, HealthBar, MoveFlags, MovementCommand,
    Player, StumbleState, Target,
};
use crate::facing::face_towards;
use crate::logger::{log, log_info};
use crate::{DeterministicRng, EnemyCommand, EnemyCommandKind};

/// Исполняет команды AI collaborator'а.
///
/// Команды к врагу в Stumble/Dead отбрасываются: hit reaction и смерть
/// не прерываются решениями behavior tree.
#[allow(clippy::type_complexity)]
pub fn process_enemy_commands(
    mut command_events: EventReader<EnemyCommand>,
    mut enemies: Query<
        (
            &mut EnemyState,
            &mut AttackState,
            &mut MoveFlags,
            &mut MovementCommand,
            &mut Transform,
            &Target,
            &AnimationSet,
        ),
        With<Enemy>,
    >,
    targets: Query<(&Transform, &Health), Without<Enemy>>,
    mut rng: ResMut<DeterministicRng>,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    for command in command_events.read() {
        let Ok((mut state, mut attack, mut move_flags, mut movement, mut transform, target, clips)) =
            enemies.get_mut(command.entity)
        else {
            continue;
        };

        if matches!(*state, EnemyState::Stumble | EnemyState::Dead) {
            continue;
        }

        match command.kind {
            EnemyCommandKind::Attack { rotate } => {
                attack.begin();
                // Замах идёт с выпадом вперёд
                move_flags.clear();
                move_flags.forward = true;
                *movement = MovementCommand::Stop;
                state.set(EnemyState::Attack);

                if rotate {
                    if let Some(target_entity) = target.entity {
                        if let Ok((target_transform, target_health)) = targets.get(target_entity) {
                            if target_health.is_alive() {
                                face_towards(&mut transform, target_transform.translation);
                            }
                        }
                    }
                }

                let index = pick_uniform(&mut rng.rng, clips.attacks.len());
                anim_events.write(AnimationRequest {
                    entity: command.entity,
                    clip: clips.attacks[index].clone(),
                });
                log(&format!("⚔️ Enemy {:?} attacks", command.entity));
            }
            EnemyCommandKind::Approach => {
                state.set(EnemyState::ChaseFar);
            }
            EnemyCommandKind::Taunt => {
                state.set(EnemyState::Taunt);
                *movement = MovementCommand::Stop;
                anim_events.write(AnimationRequest {
                    entity: command.entity,
                    clip: clips.taunt.clone(),
                });
            }
        }
    }
}

/// Дистанционные переходы + терминальные side effects Dead.
#[allow(clippy::type_complexity)]
pub fn tick_state_machine(
    mut enemies: Query<(
        Entity,
        &mut Enemy,
        &mut EnemyState,
        &EnemyConfig,
        &Transform,
        &mut Target,
        &StumbleState,
        &mut MovementCommand,
        &AnimationSet,
    )>,
    targets: Query<(&Transform, &Health), Without<Enemy>>,
    mut rng: ResMut<DeterministicRng>,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    for (
        entity,
        mut enemy,
        mut state,
        config,
        transform,
        mut target,
        stumble,
        mut movement,
        clips,
    ) in enemies.iter_mut()
    {
        if enemy.target_dead {
            continue;
        }

        match *state {
            EnemyState::Idle => {
                let Some(target_entity) = target.entity else {
                    continue;
                };
                let Ok((target_transform, target_health)) = targets.get(target_entity) else {
                    continue;
                };
                if !target_health.is_alive() {
                    continue;
                }
                let distance = transform.translation.distance(target_transform.translation);
                if distance <= config.near_threshold {
                    target.locked = true;
                    state.set(EnemyState::ChaseClose);
                    log(&format!(
                        "👁️ Enemy {:?} engages at {:.1}m",
                        entity, distance
                    ));
                }
            }
            EnemyState::ChaseClose => {
                if let Some(target_entity) = target.entity {
                    *movement = MovementCommand::FollowEntity {
                        target: target_entity,
                    };
                }
            }
            EnemyState::ChaseFar => {
                let Some(target_entity) = target.entity else {
                    continue;
                };
                let Ok((target_transform, _)) = targets.get(target_entity) else {
                    continue;
                };
                let distance = transform.translation.distance(target_transform.translation);
                if distance <= config.close_threshold {
                    state.set(EnemyState::ChaseClose);
                }
            }
            // Замах завершает AttackEnd cue, stumble — StumbleEnd
            EnemyState::Attack | EnemyState::Taunt => {}
            EnemyState::Stumble => {
                if !stumble.stumbling {
                    state.set(EnemyState::ChaseClose);
                }
            }
            EnemyState::Dead => {
                if !enemy.dead_executed {
                    enemy.dead_executed = true;
                    *movement = MovementCommand::Stop;
                    let index = pick_uniform(&mut rng.rng, clips.deaths.len());
                    anim_events.write(AnimationRequest {
                        entity,
                        clip: clips.deaths[index].clone(),
                    });
                    log_info(&format!("💀 Enemy {:?} death sequence", entity));
                }
            }
        }
    }
}

/// Периодическая переоценка видимости вражеских health bars.
///
/// Дистанция до игрока проверяется раз в `healthbar_check_interval`,
/// не каждый тик (accumulated-time gate оригинала).
pub fn check_healthbar_visibility(
    mut enemies: Query<(&mut HealthBar, &EnemyConfig, &Transform), With<Enemy>>,
    players: Query<&Transform, With<Player>>,
    time: Res<Time<Fixed>>,
) {
    let Ok(player_transform) = players.single() else {
        return;
    };
    let delta = time.delta_secs();

    for (mut bar, config, transform) in enemies.iter_mut() {
        bar.check_timer += delta;
        if bar.check_timer < config.healthbar_check_interval {
            continue;
        }
        bar.check_timer = 0.0;

        let distance = transform.translation.distance(player_transform.translation);
        bar.visible = distance <= config.healthbar_distance;
    }
}
