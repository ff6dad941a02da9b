//! Stamina economy: sprint drain + пассивная регенерация.
//!
//! Стоимости и пороги действий (оригинальные значения):
//! attack 33 при запасе >10, roll 30 при запасе >30 — то есть атака
//! может увести stamina в минус до clamp-нуля, перекат почти нет.

use bevy::prelude::*;

use crate::components::{
    AttackState, InputDirection, MovementSpeed, Player, PlayerConfig, RollState, Sprinting,
    Stamina, Target,
};

pub const ATTACK_COST: f32 = 33.0;
pub const ATTACK_MIN_STAMINA: f32 = 10.0;
pub const ROLL_COST: f32 = 30.0;
pub const ROLL_MIN_STAMINA: f32 = 30.0;
/// Units в секунду при активном спринте
pub const SPRINT_DRAIN_RATE: f32 = 30.0;

/// Sprint drain + переключение max speed игрока.
///
/// Спринт действует только вне combat lock, при ненулевом input и
/// положительной stamina — иначе скорость откатывается к walk/combat.
#[allow(clippy::type_complexity)]
pub fn drain_sprint(
    mut players: Query<
        (
            &Sprinting,
            &Target,
            &InputDirection,
            &RollState,
            &mut Stamina,
            &mut MovementSpeed,
            &PlayerConfig,
        ),
        With<Player>,
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (sprinting, target, input, roll, mut stamina, mut speed, config) in players.iter_mut() {
        if roll.rolling {
            // Скорость переката не трогаем до RollEnd cue
            continue;
        }

        let sprint_active =
            sprinting.0 && !target.locked && input.0 != Vec2::ZERO && stamina.current > 0.0;

        if sprint_active {
            speed.max = config.sprint_speed;
            stamina.drain(SPRINT_DRAIN_RATE * delta);
        } else {
            speed.max = if target.locked {
                config.combat_speed
            } else {
                config.passive_speed
            };
        }
    }
}

/// Пассивная регенерация: приостановлена во время атаки, переката и спринта.
pub fn regenerate_stamina(
    mut combatants: Query<(
        &mut Stamina,
        &AttackState,
        Option<&RollState>,
        Option<&Sprinting>,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut stamina, attack, roll, sprinting) in combatants.iter_mut() {
        if attack.attacking
            || roll.is_some_and(|r| r.rolling)
            || sprinting.is_some_and(|s| s.0)
        {
            continue;
        }
        if stamina.current < stamina.max {
            stamina.regenerate(delta);
        }
    }
}
