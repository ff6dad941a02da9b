//! Player-специфичные компоненты
//!
//! Акторы БЕЗ `Player` управляются AI systems (`Without<Player>` filter),
//! акторы С ним получают intents от input collaborator.

use bevy::prelude::*;

use crate::components::combatant::Combatant;

/// Marker component для player-controlled entity
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Combatant,
    PlayerConfig,
    RollState,
    Sprinting,
    InputDirection,
    NearbyHostiles,
    CameraRig
)]
pub struct Player;

/// Тюнинг игрока (метры/сек, метры)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerConfig {
    pub passive_speed: f32,
    pub combat_speed: f32,
    pub sprint_speed: f32,
    pub roll_speed: f32,
    /// Combat lock рвётся, когда цель дальше этого
    pub lock_distance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            passive_speed: 4.5,
            combat_speed: 4.5,
            sprint_speed: 6.0,
            roll_speed: 4.0,
            lock_distance: 15.0,
        }
    }
}

/// Перекат: полный damage immunity на время rolling
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct RollState {
    pub rolling: bool,
}

/// Зажат ли sprint (intent от input collaborator)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Sprinting(pub bool);

/// Последний сырой movement input (forward, right) — направление переката
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct InputDirection(pub Vec2);

/// Множество враждебных акторов в радиусе обнаружения
///
/// Поддерживается proximity-нотификациями внешнего spatial-overlap
/// collaborator. Non-owning membership set; порядок вставки сохраняется
/// (от него зависит tie-break при выборе ближайшей цели).
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct NearbyHostiles(pub Vec<Entity>);

impl NearbyHostiles {
    /// Идемпотентное добавление (повторный enter — no-op)
    pub fn add(&mut self, hostile: Entity) {
        if !self.0.contains(&hostile) {
            self.0.push(hostile);
        }
    }

    /// Идемпотентное удаление (повторный exit — no-op)
    pub fn remove(&mut self, hostile: Entity) {
        self.0.retain(|e| *e != hostile);
    }
}

/// Позиция и yaw камеры (host-fed)
///
/// Камера сама по себе внешняя; ядру нужны только её location (углы
/// cycle-targeting считаются от камеры) и yaw (направление переката).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub position: Vec3,
    pub yaw: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearby_hostiles_idempotent() {
        let mut hostiles = NearbyHostiles::default();
        let e = Entity::PLACEHOLDER;

        hostiles.add(e);
        hostiles.add(e);
        assert_eq!(hostiles.0.len(), 1);

        hostiles.remove(e);
        hostiles.remove(e);
        assert!(hostiles.0.is_empty());
    }
}
