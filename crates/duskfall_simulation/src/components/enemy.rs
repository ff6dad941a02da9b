//! Вражеские компоненты: EnemyState FSM, config, health bar.

use bevy::prelude::*;

use crate::components::combatant::Combatant;

/// Враг — вариант комбатанта под управлением AI decision collaborator.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Combatant, EnemyState, EnemyConfig, HealthBar)]
pub struct Enemy {
    /// false → урон снимает здоровье, но НЕ вызывает stumble
    pub interruptable: bool,
    /// XP, начисляемый убийце-игроку
    pub xp_on_death: f32,
    /// Цель (player) подтверждённо мертва → state machine tick это no-op
    pub target_dead: bool,
    /// Guard: терминальные side effects выполняются ровно один раз
    pub dead_executed: bool,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            interruptable: true,
            xp_on_death: 40.0,
            target_dead: false,
            dead_executed: false,
        }
    }
}

impl Enemy {
    /// Boss archetype: не прерывается уроном, дороже в XP.
    ///
    /// Оригинальный boss объявлял counter "quick hits before uninterruptable"
    /// и long-attack поля, но не подключал их ни к одному переходу —
    /// незавершённая фича, здесь опущена (см. DESIGN.md).
    pub fn boss() -> Self {
        Self {
            interruptable: false,
            xp_on_death: 150.0,
            ..Default::default()
        }
    }
}

/// Состояния вражеской combat state machine
///
/// Initial: Idle. Terminal: Dead (absorbing — переходов наружу нет).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum EnemyState {
    #[default]
    Idle,
    /// Цель в ближнем радиусе — host ведёт врага вплотную
    ChaseClose,
    /// Holding state для внешнего higher-level approach поведения
    ChaseFar,
    Attack,
    Stumble,
    Taunt,
    Dead,
}

impl EnemyState {
    /// Запрос перехода. Dead — absorbing: все дальнейшие запросы отклоняются
    /// молча (terminal-state violation — не ошибка, а no-op).
    pub fn set(&mut self, new_state: EnemyState) {
        if *self != EnemyState::Dead {
            *self = new_state;
        }
    }
}

/// Тюнинг вражеского поведения (метры, секунды)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EnemyConfig {
    /// Idle → ChaseClose, когда цель ближе этого
    pub near_threshold: f32,
    /// ChaseFar → ChaseClose, когда цель ближе этого
    pub close_threshold: f32,
    /// Health bar виден только ближе этой дистанции к игроку
    pub healthbar_distance: f32,
    /// Период перепроверки видимости health bar (accumulated-time gate)
    pub healthbar_check_interval: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            near_threshold: 12.0,
            close_threshold: 8.5,
            healthbar_distance: 10.0,
            healthbar_check_interval: 0.5,
        }
    }
}

/// Видимость вражеского health bar (переоценивается периодически, не каждый тик)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct HealthBar {
    pub visible: bool,
    pub check_timer: f32,
}
