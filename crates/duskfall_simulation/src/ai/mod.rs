//! Enemy AI: command execution + combat state machine.
//!
//! Decision making (когда атаковать, какой паттерн) — внешний collaborator
//! (behavior tree host'а). Ядро исполняет команды и держит FSM консистентной.

pub mod fsm;

use bevy::prelude::*;

use crate::SimSet;

/// Команда от AI decision collaborator конкретному врагу
#[derive(Event, Debug, Clone, Copy)]
pub struct EnemyCommand {
    pub entity: Entity,
    pub kind: EnemyCommandKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyCommandKind {
    /// Начать замах; `rotate` — развернуться на цель перед ударом
    Attack { rotate: bool },
    /// Дальнее сближение (ChaseFar, ведёт host)
    Approach,
    Taunt,
}

pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EnemyCommand>().add_systems(
            FixedUpdate,
            (
                fsm::process_enemy_commands,
                fsm::tick_state_machine,
                fsm::check_healthbar_visibility,
            )
                .chain()
                .in_set(SimSet::StateMachine),
        );
    }
}
