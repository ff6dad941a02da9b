//! Facing controller: плавный frame-rate-independent доворот на цель.
//!
//! Yaw lerp в rotation space (не физическая пружина): скорость доворота
//! пропорциональна `Facing::smoothing × delta`. Достигнутая за тик
//! скорость записывается в `Facing::last_rotation_speed` для
//! turn-blend анимаций host'а.

use bevy::prelude::*;
use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use crate::components::{Airborne, AttackState, Facing, RollState, Target};

/// Yaw направления на ground plane (forward = -Z, как у Bevy Transform).
pub fn yaw_of(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z)
}

/// Quat чистого yaw-поворота.
pub fn from_yaw(yaw: f32) -> Quat {
    Quat::from_rotation_y(yaw)
}

/// Нормализация угла в (-PI, PI].
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

/// Мгновенный snap-разворот к точке (ground plane).
///
/// Используется damage pipeline (разворот на источник урона), enemy attack
/// command и стартом переката.
pub fn face_towards(transform: &mut Transform, point: Vec3) {
    let mut direction = point - transform.translation;
    direction.y = 0.0;

    if direction.length_squared() > 1e-6 {
        transform.rotation = from_yaw(yaw_of(direction));
    }
}

/// Система: плавный доворот на захваченную цель
///
/// Условия (все сразу): цель есть, combat lock включён, tracking включён,
/// актор не в атаке, не в воздухе, не в перекате. Иначе скорость за тик = 0.
pub fn look_at_smooth(
    mut queries: ParamSet<(
        Query<(
            Entity,
            &Target,
            &AttackState,
            &Airborne,
            Option<&RollState>,
            &mut Facing,
            &mut Transform,
        )>,
        Query<&Transform>,
    )>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    // Pass 1: собираем позиции целей (читающий запрос отдельно от мутации)
    let mut target_positions: HashMap<Entity, Vec3> = HashMap::new();
    let mut wanted: Vec<(Entity, Entity)> = Vec::new();

    for (entity, target, attack, airborne, roll, facing, _) in queries.p0().iter() {
        let rolling = roll.map(|r| r.rolling).unwrap_or(false);
        if !target.locked || !facing.track_target || attack.attacking || airborne.0 || rolling {
            continue;
        }
        if let Some(target_entity) = target.entity {
            wanted.push((entity, target_entity));
        }
    }

    for (_, target_entity) in &wanted {
        if let Ok(transform) = queries.p1().get(*target_entity) {
            target_positions.insert(*target_entity, transform.translation);
        }
    }

    let wanted: HashMap<Entity, Entity> = wanted.into_iter().collect();

    // Pass 2: доворот
    for (entity, _, _, _, _, mut facing, mut transform) in queries.p0().iter_mut() {
        let target_pos = wanted
            .get(&entity)
            .and_then(|t| target_positions.get(t))
            .copied();

        let Some(target_pos) = target_pos else {
            facing.last_rotation_speed = 0.0;
            continue;
        };

        let mut direction = target_pos - transform.translation;
        direction.y = 0.0;

        if direction.length_squared() < 1e-6 {
            facing.last_rotation_speed = 0.0;
            continue;
        }

        let current_yaw = yaw_of(transform.rotation * Vec3::NEG_Z);
        let desired_yaw = yaw_of(direction);

        let t = (facing.smoothing * delta).clamp(0.0, 1.0);
        let step = wrap_angle(desired_yaw - current_yaw) * t;

        transform.rotation = from_yaw(current_yaw + step);
        facing.last_rotation_speed = step.to_degrees();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_roundtrip() {
        for yaw in [-2.5f32, -1.0, 0.0, 0.7, 3.0] {
            let dir = from_yaw(yaw) * Vec3::NEG_Z;
            assert!((wrap_angle(yaw_of(dir) - yaw)).abs() < 1e-4, "yaw {}", yaw);
        }
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.5), 0.5);
    }

    #[test]
    fn test_face_towards_flattens_ground_plane() {
        let mut transform = Transform::from_translation(Vec3::ZERO);
        face_towards(&mut transform, Vec3::new(3.0, 5.0, 0.0));

        let forward = transform.rotation * Vec3::NEG_Z;
        assert!(forward.y.abs() < 1e-5);
        assert!((forward.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_face_towards_zero_direction_noop() {
        let mut transform = Transform::from_translation(Vec3::ONE);
        let before = transform.rotation;
        // Цель прямо над головой: ground-plane направление нулевое
        face_towards(&mut transform, Vec3::new(1.0, 9.0, 1.0));
        assert_eq!(transform.rotation, before);
    }
}
