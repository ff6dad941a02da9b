//! DUSKFALL Simulation Core
//!
//! ECS-симуляция боевого ядра на Bevy 0.16 (strategic layer).
//!
//! HYBRID ARCHITECTURE:
//! - ECS = strategic layer (combat state machine, damage rules, stamina, targeting)
//! - Host engine = tactical layer (rendering, animation playback, collision,
//!   navigation, input mapping) — общается через Bevy events
//!
//! Host присылает: `DamageInstigated`, `WeaponContact`, `ProximityEvent`,
//! `AnimationCue`, player intents. Host читает: `AnimationRequest`,
//! `HealthChanged`, `HitConfirmed`, `MovementCommand`, `EnemyState`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod facing;
pub mod logger;
pub mod player;
pub mod targeting;

// Re-export базовых типов для удобства
pub use actor::{spawn_enemy, spawn_player};
pub use ai::{AIPlugin, EnemyCommand, EnemyCommandKind};
pub use animation::{AnimationRequest, AnimationSet};
pub use combat::{
    AnimationCue, CombatPlugin, CueKind, DamageApplied, DamageInstigated, Dead, EntityDied,
    HealthChanged, HitConfirmed, MaxHealthChanged, WeaponContact, XpAwarded, ATTACK_COST,
    ATTACK_MIN_STAMINA, ROLL_COST, ROLL_MIN_STAMINA,
};
pub use components::*;
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use player::{AttackIntent, MoveAxisIntent, PlayerPlugin, RollIntent, SprintIntent};
pub use targeting::{
    CycleTargetIntent, ProximityEvent, ProximityKind, TargetingPlugin, ToggleCombatIntent,
};

/// Порядок выполнения подсистем внутри одного fixed tick.
///
/// Damage pipeline обязан отработать ДО state machine: внешний источник может
/// нанести урон в начале тика, и FSM должна видеть post-damage состояние.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Animation cues от host (damage window, attack end, stumble end)
    Cues,
    /// Player input intents (attack, roll, sprint, движение)
    Intents,
    /// Target acquisition: proximity set, cycle, validate
    Targeting,
    /// Hit registration + damage pipeline + death finalization
    Combat,
    /// Enemy commands + combat state machine tick
    StateMachine,
    /// Stamina economy + facing controller
    Upkeep,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Seed мог задать host (или create_headless_app) — не перетираем
        if app.world().get_resource::<DeterministicRng>().is_none() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app
            // Fixed timestep 60Hz для simulation tick (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .configure_sets(
                FixedUpdate,
                (
                    SimSet::Cues,
                    SimSet::Intents,
                    SimSet::Targeting,
                    SimSet::Combat,
                    SimSet::StateMachine,
                    SimSet::Upkeep,
                )
                    .chain(),
            )
            // Подсистемы (ECS strategic layer)
            .add_plugins((CombatPlugin, TargetingPlugin, PlayerPlugin, AIPlugin))
            .add_systems(FixedUpdate, facing::look_at_smooth.in_set(SimSet::Upkeep));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Используется для выбора анимаций (stumble/death/attack clips).
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// `TimeUpdateStrategy::ManualDuration` — каждый `app.update()` продвигает
/// время ровно на 1/60 секунды, то есть один update == один fixed tick.
/// Без этого FixedUpdate зависел бы от wall-clock и тесты были бы флаки.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
            std::time::Duration::from_micros(16_667),
        ));

    app
}
