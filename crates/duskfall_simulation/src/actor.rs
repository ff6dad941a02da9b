//! Spawn helpers: собирают акторов из required-component деревьев.

use bevy::prelude::*;

use crate::components::{Enemy, Player, Target};

/// Спавнит игрока в точке. Остальные компоненты подтягиваются
/// через `#[require]` с дефолтами.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((Player, Transform::from_translation(position)))
        .id()
}

/// Спавнит врага с заранее известной целью (AI знает игрока со спавна,
/// но не реагирует, пока тот не подойдёт — см. `ai::fsm`).
pub fn spawn_enemy(world: &mut World, position: Vec3, enemy: Enemy, target: Entity) -> Entity {
    world
        .spawn((
            enemy,
            Transform::from_translation(position),
            Target {
                entity: Some(target),
                locked: false,
            },
        ))
        .id()
}
