//! Player intents: attack, roll, sprint, движение.
//!
//! Input mapping — на стороне host; сюда приходят уже готовые intents.
//! Ядро решает, допустимо ли действие (stamina, текущие флаги), и
//! запрашивает анимацию.

use bevy::prelude::*;

use crate::animation::{AnimationRequest, AnimationSet};
use crate::combat::damage::Dead;
use crate::combat::stamina::{ATTACK_COST, ATTACK_MIN_STAMINA, ROLL_COST, ROLL_MIN_STAMINA};
use crate::components::{
    Airborne, AttackState, CameraRig, InputDirection, Player, RollState, Sprinting, Stamina,
    StumbleState,
};
use crate::facing::{from_yaw, yaw_of};
use crate::logger::log;
use crate::SimSet;

/// Нажатие атаки
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntent {
    pub entity: Entity,
}

/// Нажатие переката
#[derive(Event, Debug, Clone, Copy)]
pub struct RollIntent {
    pub entity: Entity,
}

/// Sprint зажат/отпущен
#[derive(Event, Debug, Clone, Copy)]
pub struct SprintIntent {
    pub entity: Entity,
    pub sprinting: bool,
}

/// Сырые оси движения (forward, right) в диапазоне [-1, 1]
#[derive(Event, Debug, Clone, Copy)]
pub struct MoveAxisIntent {
    pub entity: Entity,
    pub direction: Vec2,
}

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackIntent>()
            .add_event::<RollIntent>()
            .add_event::<SprintIntent>()
            .add_event::<MoveAxisIntent>()
            .add_systems(
                FixedUpdate,
                (apply_move_axis, set_sprinting, player_attack, player_roll)
                    .chain()
                    .in_set(SimSet::Intents),
            );
    }
}

pub fn apply_move_axis(
    mut move_events: EventReader<MoveAxisIntent>,
    mut players: Query<&mut InputDirection, With<Player>>,
) {
    for event in move_events.read() {
        if let Ok(mut input) = players.get_mut(event.entity) {
            input.0 = event.direction;
        }
    }
}

pub fn set_sprinting(
    mut sprint_events: EventReader<SprintIntent>,
    mut players: Query<&mut Sprinting, With<Player>>,
) {
    for event in sprint_events.read() {
        if let Ok(mut sprinting) = players.get_mut(event.entity) {
            sprinting.0 = event.sprinting;
        }
    }
}

/// Атака игрока: гейт по состоянию и stamina, продвижение комбо.
///
/// Условия: не в перекате/stumble/воздухе; либо атака не идёт, либо
/// открыто окно комбо; stamina строго выше порога (не стоимости —
/// последняя атака может увести запас в clamp-ноль).
#[allow(clippy::type_complexity)]
pub fn player_attack(
    mut attack_events: EventReader<AttackIntent>,
    mut players: Query<
        (
            &mut AttackState,
            &mut Stamina,
            &RollState,
            &StumbleState,
            &Airborne,
            &AnimationSet,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    for event in attack_events.read() {
        let Ok((mut attack, mut stamina, roll, stumble, airborne, clips)) =
            players.get_mut(event.entity)
        else {
            continue;
        };

        if roll.rolling || stumble.stumbling || airborne.0 {
            continue;
        }
        if attack.attacking && !attack.next_attack_ready {
            continue;
        }
        if stamina.current <= ATTACK_MIN_STAMINA {
            continue;
        }

        stamina.drain(ATTACK_COST);
        attack.begin();

        // Комбо зациклено по длине таблицы
        if attack.combo_index >= clips.attacks.len() {
            attack.combo_index = 0;
        }
        let clip = clips.attacks[attack.combo_index].clone();
        attack.combo_index += 1;

        anim_events.write(AnimationRequest {
            entity: event.entity,
            clip,
        });
        log(&format!(
            "⚔️ Player {:?} attacks (combo {}, stamina {:.0})",
            event.entity, attack.combo_index, stamina.current
        ));
    }
}

/// Перекат: гейт + мгновенный разворот в направлении input относительно камеры.
///
/// Сам флаг `rolling` выставит `RollStart` cue — до него игрок ещё уязвим
/// (анимация стартует у host'а асинхронно).
#[allow(clippy::type_complexity)]
pub fn player_roll(
    mut roll_events: EventReader<RollIntent>,
    mut players: Query<
        (
            &mut AttackState,
            &mut Stamina,
            &mut Transform,
            &RollState,
            &StumbleState,
            &Airborne,
            &InputDirection,
            &CameraRig,
            &AnimationSet,
        ),
        (With<Player>, Without<Dead>),
    >,
    mut anim_events: EventWriter<AnimationRequest>,
) {
    for event in roll_events.read() {
        let Ok((
            mut attack,
            mut stamina,
            mut transform,
            roll,
            stumble,
            airborne,
            input,
            camera,
            clips,
        )) = players.get_mut(event.entity)
        else {
            continue;
        };

        if attack.attacking || roll.rolling || stumble.stumbling || airborne.0 {
            continue;
        }
        if stamina.current <= ROLL_MIN_STAMINA {
            continue;
        }

        stamina.drain(ROLL_COST);
        attack.end();
        attack.combo_index = 0;

        // Направление переката: оси input в базисе yaw камеры
        if input.0 != Vec2::ZERO {
            let forward = from_yaw(camera.yaw) * Vec3::NEG_Z;
            let right = from_yaw(camera.yaw) * Vec3::X;
            let direction = forward * input.0.x + right * input.0.y;
            if direction.length_squared() > 1e-6 {
                transform.rotation = from_yaw(yaw_of(direction));
            }
        }

        anim_events.write(AnimationRequest {
            entity: event.entity,
            clip: clips.roll.clone(),
        });
        log(&format!(
            "🤸 Player {:?} rolls (stamina {:.0})",
            event.entity, stamina.current
        ));
    }
}
