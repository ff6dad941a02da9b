//! Animation cue callbacks от host: notify-треки клипов двигают combat flags.
//!
//! Ядро не знает тайминги анимаций — host присылает `AnimationCue` в те
//! моменты, где у клипа стоят notifies (начало/конец damage window,
//! окно комбо, конец замаха/переката/stumble).

use bevy::prelude::*;

use crate::combat::damage::Dead;
use crate::components::{
    AttackState, EnemyState, MoveFlags, MovementSpeed, Player, PlayerConfig, RollState,
    StumbleState, Target,
};
use crate::logger::log;

/// Момент анимации, о котором сообщает host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// Оружие начинает наносить урон
    DamageWindowBegin,
    /// Оружие перестаёт наносить урон
    DamageWindowEnd,
    /// Открылось окно комбо: следующая атака может прервать текущую
    NextAttackReady,
    /// Замах закончился полностью
    AttackEnd,
    StumbleEnd,
    TauntEnd,
    RollStart,
    RollEnd,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct AnimationCue {
    pub entity: Entity,
    pub kind: CueKind,
}

/// Применяет cues к состоянию акторов.
///
/// Cue для мёртвого/исчезнувшего актора — no-op (host мог отправить его
/// в тот же тик, что и смертельный удар). Stray cues вне ожидаемого
/// состояния игнорируются: урон мог отменить атаку между notify и тиком.
#[allow(clippy::type_complexity)]
pub fn process_animation_cues(
    mut cue_events: EventReader<AnimationCue>,
    mut actors: Query<
        (
            &mut AttackState,
            &mut StumbleState,
            &mut MoveFlags,
            &mut MovementSpeed,
            &Target,
            Option<&mut RollState>,
            Option<&mut EnemyState>,
            Option<&Player>,
            Option<&PlayerConfig>,
        ),
        Without<Dead>,
    >,
) {
    for cue in cue_events.read() {
        let Ok((
            mut attack,
            mut stumble,
            mut move_flags,
            mut speed,
            target,
            mut roll,
            mut enemy_state,
            player,
            config,
        )) = actors.get_mut(cue.entity)
        else {
            continue;
        };

        match cue.kind {
            CueKind::DamageWindowBegin => {
                if attack.attacking {
                    attack.damaging = true;
                }
            }
            CueKind::DamageWindowEnd => {
                attack.damaging = false;
            }
            CueKind::NextAttackReady => {
                if attack.attacking {
                    attack.next_attack_ready = true;
                }
            }
            CueKind::AttackEnd => {
                attack.end();
                move_flags.clear();
                if player.is_some() {
                    attack.combo_index = 0;
                }
                if let Some(state) = enemy_state.as_mut() {
                    // Stray AttackEnd после interrupt'а не должен выбивать из Stumble
                    if **state == EnemyState::Attack {
                        state.set(EnemyState::ChaseClose);
                    }
                }
            }
            CueKind::StumbleEnd => {
                stumble.stumbling = false;
                move_flags.clear();
                if let Some(state) = enemy_state.as_mut() {
                    if **state == EnemyState::Stumble {
                        state.set(EnemyState::ChaseClose);
                    }
                }
            }
            CueKind::TauntEnd => {
                if let Some(state) = enemy_state.as_mut() {
                    if **state == EnemyState::Taunt {
                        state.set(EnemyState::ChaseClose);
                    }
                }
            }
            CueKind::RollStart => {
                if let Some(roll) = roll.as_mut() {
                    roll.rolling = true;
                    attack.end();
                    attack.combo_index = 0;
                    if let Some(config) = config {
                        speed.max = config.roll_speed;
                    }
                    log(&format!("🤸 {:?} roll started", cue.entity));
                }
            }
            CueKind::RollEnd => {
                if let Some(roll) = roll.as_mut() {
                    roll.rolling = false;
                    if let Some(config) = config {
                        speed.max = if target.locked {
                            config.combat_speed
                        } else {
                            config.passive_speed
                        };
                    }
                }
            }
        }
    }
}
