//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - combatant: общая запись комбатанта (Health, Stamina, Target, attack flags)
//! - enemy: вражеская специфика (EnemyState, EnemyConfig, HealthBar)
//! - player: player-специфика (RollState, NearbyHostiles, CameraRig)
//! - movement: команды перемещения для host (MovementCommand, MovementSpeed)

pub mod combatant;
pub mod enemy;
pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use combatant::*;
pub use enemy::*;
pub use movement::*;
pub use player::*;
