//! Damage pipeline: единственная точка мутации Health.
//!
//! Вход — `DamageInstigated` (от hit ledger или напрямую от host: ловушки,
//! скрипты). Выход — `DamageApplied` / `HealthChanged` / `EntityDied` /
//! `XpAwarded` + побочные эффекты interrupt'а (stumble, отмена атаки).
//!
//! Правила отклонения (урон = 0, без событий):
//! - самоурон (instigator == target)
//! - у жертвы combat lock на ДРУГОГО актора (duel rule оригинала)
//! - жертва в перекате (полный i-frame)
//! - жертва уже мертва

use bevy::prelude::*;

use crate::animation::{pick_non_repeating, AnimationRequest, AnimationSet};
use crate::components::{
    AttackState, Enemy, EnemyState, Facing, Health, MoveFlags, MovementCommand, Player, RollState,
    StumbleState, Target,
};
use crate::facing::face_towards;
use crate::logger::{log, log_info, log_warning};
use crate::DeterministicRng;

/// Входящий урон (host collision, hit ledger, скрипты)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageInstigated {
    pub target: Entity,
    pub instigator: Entity,
    pub amount: f32,
}

/// Урон фактически снят (amount > 0 всегда; отклонённый урон событий не даёт)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageApplied {
    pub target: Entity,
    pub instigator: Entity,
    pub amount: f32,
}

/// Health изменился — host обновляет UI bars
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub entity: Entity,
    pub current: f32,
}

/// Максимум health изменился (level up и т.п.)
#[derive(Event, Debug, Clone, Copy)]
pub struct MaxHealthChanged {
    pub entity: Entity,
    pub max: f32,
}

/// Актор умер. Side effects смерти — в `finalize_deaths`.
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Начисление опыта игроку за убийство (progression — внешний collaborator)
#[derive(Event, Debug, Clone, Copy)]
pub struct XpAwarded {
    pub to: Entity,
    pub amount: f32,
}

/// Маркер мёртвого актора: системы intents/cues его игнорируют
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Применяет весь входящий урон за тик.
///
/// ParamSet: p0 мутирует жертву (включая Transform для snap-разворота),
/// p1 читает Transform источника — конфликт разнесён по passes.
#[allow(clippy::type_complexity)]
pub fn apply_damage(
    mut damage_events: EventReader<DamageInstigated>,
    mut queries: ParamSet<(
        Query<(
            &mut Health,
            &Target,
            &mut AttackState,
            &mut MoveFlags,
            &mut StumbleState,
            &mut MovementCommand,
            &mut Transform,
            Option<&RollState>,
            Option<&mut EnemyState>,
            Option<&Enemy>,
            &AnimationSet,
        )>,
        Query<&Transform>,
    )>,
    players: Query<(), With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    mut applied_events: EventWriter<DamageApplied>,
    mut health_events: EventWriter<HealthChanged>,
    mut died_events: EventWriter<EntityDied>,
    mut xp_events: EventWriter<XpAwarded>,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    for event in damage_events.read() {
        // Самоурон отбрасывается до любых запросов
        if event.instigator == event.target {
            continue;
        }

        let instigator_pos = queries
            .p1()
            .get(event.instigator)
            .ok()
            .map(|t| t.translation);

        let mut victims = queries.p0();
        let Ok((
            mut health,
            target,
            mut attack,
            mut move_flags,
            mut stumble,
            mut movement,
            mut transform,
            roll,
            mut enemy_state,
            enemy,
            clips,
        )) = victims.get_mut(event.target)
        else {
            log_warning(&format!(
                "⚠️ Damage to unknown entity {:?} dropped",
                event.target
            ));
            continue;
        };

        // Duel rule: залоченная жертва неуязвима для всех, кроме своей цели
        if target.locked && target.entity.is_some_and(|t| t != event.instigator) {
            continue;
        }

        // Roll i-frames
        if roll.is_some_and(|r| r.rolling) {
            continue;
        }

        if !health.is_alive() {
            continue;
        }

        let applied = health.take_damage(event.amount);

        health_events.write(HealthChanged {
            entity: event.target,
            current: health.current,
        });
        applied_events.write(DamageApplied {
            target: event.target,
            instigator: event.instigator,
            amount: applied,
        });
        log(&format!(
            "🗡️ {:?} → {:?}: {} dmg ({}/{} hp left)",
            event.instigator, event.target, applied, health.current, health.max
        ));

        // Lethal blow: переход в Dead, XP — только игроку-убийце
        if !health.is_alive() {
            if let Some(state) = enemy_state.as_mut() {
                state.set(EnemyState::Dead);
            }
            if players.contains(event.instigator) {
                if let Some(enemy) = enemy {
                    xp_events.write(XpAwarded {
                        to: event.instigator,
                        amount: enemy.xp_on_death,
                    });
                }
            }
            died_events.write(EntityDied {
                entity: event.target,
                killer: Some(event.instigator),
            });
            log_info(&format!(
                "💀 {:?} killed by {:?}",
                event.target, event.instigator
            ));
            continue;
        }

        // Non-lethal: uninterruptable (boss) теряет health без hit reaction
        if enemy.is_some_and(|e| !e.interruptable) {
            continue;
        }

        // Interrupt: отмена атаки + stumble + разворот на источник
        attack.end();
        if enemy.is_none() {
            // Игрок теряет позицию в комбо
            attack.combo_index = 0;
        }
        // Stumble-анимация отыгрывает отход назад — host блендит по флагу
        move_flags.clear();
        move_flags.backwards = true;
        stumble.stumbling = true;
        *movement = MovementCommand::Stop;
        if let Some(state) = enemy_state.as_mut() {
            state.set(EnemyState::Stumble);
        }

        let index = pick_non_repeating(&mut rng.rng, clips.stumbles.len(), stumble.last_stumble_index);
        stumble.last_stumble_index = index;
        anim_events.write(AnimationRequest {
            entity: event.target,
            clip: clips.stumbles[index].clone(),
        });

        if let Some(pos) = instigator_pos {
            face_towards(&mut transform, pos);
        }
    }
}

/// Терминальные side effects смерти (ровно один раз на entity).
///
/// Смерть игрока дополнительно переводит всех врагов в passive no-op
/// режим (`Enemy::target_dead`).
#[allow(clippy::type_complexity)]
pub fn finalize_deaths(
    mut died_events: EventReader<EntityDied>,
    mut victims: Query<(
        &mut Target,
        &mut AttackState,
        &mut MoveFlags,
        &mut StumbleState,
        &mut Facing,
        &mut MovementCommand,
        Option<&mut RollState>,
        Option<&Player>,
        &AnimationSet,
    )>,
    mut enemies: Query<&mut Enemy>,
    mut anim_events: EventWriter<AnimationRequest>,
    mut commands: Commands,
) {
    for event in died_events.read() {
        let Ok((
            mut target,
            mut attack,
            mut move_flags,
            mut stumble,
            mut facing,
            mut movement,
            roll,
            player,
            clips,
        )) = victims.get_mut(event.entity)
        else {
            continue;
        };

        target.clear();
        attack.end();
        attack.hit_actors.clear();
        move_flags.clear();
        stumble.stumbling = false;
        facing.track_target = false;
        *movement = MovementCommand::Stop;
        if let Some(mut roll) = roll {
            roll.rolling = false;
        }

        if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
            entity_commands.insert(Dead);
        }

        if player.is_some() {
            // Клип смерти игрока фиксированный; вражеский выбирает FSM.
            // Пустая таблица — дефект конфигурации, падаем громко (как pick_uniform)
            assert!(!clips.deaths.is_empty(), "animation clip table is empty");
            anim_events.write(AnimationRequest {
                entity: event.entity,
                clip: clips.deaths[0].clone(),
            });
            for mut enemy in enemies.iter_mut() {
                enemy.target_dead = true;
            }
            log_info("💀 Player died, enemies stand down");
        }
    }
}

/// Транслирует изменения max health в `MaxHealthChanged`.
///
/// Первое появление entity записывается молча — host и так знает
/// стартовый максимум из spawn данных.
pub fn broadcast_max_health(
    combatants: Query<(Entity, &Health)>,
    mut known: Local<std::collections::HashMap<Entity, f32>>,
    mut max_events: EventWriter<MaxHealthChanged>,
) {
    for (entity, health) in combatants.iter() {
        match known.get(&entity) {
            None => {
                known.insert(entity, health.max);
            }
            Some(previous) if (*previous - health.max).abs() > f32::EPSILON => {
                known.insert(entity, health.max);
                max_events.write(MaxHealthChanged {
                    entity,
                    max: health.max,
                });
            }
            Some(_) => {}
        }
    }
}
