//! Movement компоненты: команды перемещения для host
//!
//! Архитектура:
//! - ECS система пишет MovementCommand (high-level intent)
//! - Host navigation читает и конвертирует в реальное перемещение
//! - Физика/pathfinding полностью на стороне host

use bevy::prelude::*;

/// Команда движения для актора (выполняется host navigation)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Стоять на месте (не обновлять navigation target)
    #[default]
    Idle,
    /// Следовать за entity (host обновляет target каждый frame)
    FollowEntity { target: Entity },
    /// Остановиться немедленно (сбросить velocity)
    Stop,
}

/// Максимальная скорость движения актора (метры/сек)
///
/// Переключается ядром: passive / combat / sprint / roll.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub max: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { max: 4.5 }
    }
}
