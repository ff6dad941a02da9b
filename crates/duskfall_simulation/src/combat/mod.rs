//! Combat systems: damage pipeline, hit registration, stamina, animation cues.
//!
//! Порядок внутри тика жёсткий (`.chain()` в каждом set):
//!
//! Cues:   process_animation_cues (damage window / attack end / roll / stumble)
//! Combat: collect_weapon_contacts → apply_damage → confirm_hits
//!         → finalize_deaths → broadcast_max_health
//! Upkeep: drain_sprint → regenerate_stamina
//!
//! Damage до state machine — AI видит post-damage состояние того же тика.

pub mod cues;
pub mod damage;
pub mod hit_ledger;
pub mod stamina;

pub use cues::{AnimationCue, CueKind};
pub use damage::{
    DamageApplied, DamageInstigated, Dead, EntityDied, HealthChanged, MaxHealthChanged, XpAwarded,
};
pub use hit_ledger::{HitConfirmed, PendingWeaponHits, WeaponContact};
pub use stamina::{ATTACK_COST, ATTACK_MIN_STAMINA, ROLL_COST, ROLL_MIN_STAMINA, SPRINT_DRAIN_RATE};

use bevy::prelude::*;

use crate::animation::AnimationRequest;
use crate::SimSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationCue>()
            .add_event::<AnimationRequest>()
            .add_event::<DamageInstigated>()
            .add_event::<DamageApplied>()
            .add_event::<HealthChanged>()
            .add_event::<MaxHealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<XpAwarded>()
            .add_event::<WeaponContact>()
            .add_event::<HitConfirmed>()
            .init_resource::<PendingWeaponHits>()
            .add_systems(
                FixedUpdate,
                cues::process_animation_cues.in_set(SimSet::Cues),
            )
            .add_systems(
                FixedUpdate,
                (
                    hit_ledger::collect_weapon_contacts,
                    damage::apply_damage,
                    hit_ledger::confirm_hits,
                    damage::finalize_deaths,
                    damage::broadcast_max_health,
                )
                    .chain()
                    .in_set(SimSet::Combat),
            )
            .add_systems(
                FixedUpdate,
                (stamina::drain_sprint, stamina::regenerate_stamina)
                    .chain()
                    .in_set(SimSet::Upkeep),
            );
    }
}
