//! Hit registration: weapon overlap contacts → урон → подтверждение.
//!
//! Host шлёт `WeaponContact` каждый тик, пока хитбокс оружия пересекает
//! актора. Ledger (`AttackState::hit_actors`) гарантирует не больше одного
//! применённого удара на жертву за attack instance, сколько бы тиков ни
//! длился overlap. Запись в ledger — только при подтверждённом (amount > 0)
//! уроне: отклонённый контакт (i-frame переката) не сжигает попытку.

use bevy::prelude::*;

use crate::combat::damage::{DamageApplied, DamageInstigated};
use crate::components::{AttackState, Attacker};

/// Хитбокс оружия attacker'а пересёк target (host collision, каждый тик)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponContact {
    pub attacker: Entity,
    pub target: Entity,
}

/// Удар подтверждён — host играет hit feedback (camera shake, hitstop)
#[derive(Event, Debug, Clone, Copy)]
pub struct HitConfirmed {
    pub attacker: Entity,
    pub target: Entity,
}

/// Контакты текущего тика, прошедшие фильтры и ждущие вердикта damage pipeline
#[derive(Resource, Debug, Default)]
pub struct PendingWeaponHits(pub Vec<(Entity, Entity)>);

/// Фильтрует сырые контакты и выпускает `DamageInstigated`.
///
/// Контакт отбрасывается, если: attacker == target; attacker не в damage
/// window; target уже в ledger этого замаха; пара уже обработана в этом тике.
pub fn collect_weapon_contacts(
    mut contact_events: EventReader<WeaponContact>,
    attackers: Query<(&AttackState, &Attacker)>,
    mut pending: ResMut<PendingWeaponHits>,
    mut damage_events: EventWriter<DamageInstigated>,
) {
    pending.0.clear();

    for contact in contact_events.read() {
        if contact.attacker == contact.target {
            continue;
        }

        let Ok((attack, attacker)) = attackers.get(contact.attacker) else {
            continue;
        };

        if !attack.attacking || !attack.damaging {
            continue;
        }
        if attack.has_hit(contact.target) {
            continue;
        }
        // Несколько контактов одной пары за тик (multi-shape хитбокс) — один удар
        if pending.0.contains(&(contact.attacker, contact.target)) {
            continue;
        }

        pending.0.push((contact.attacker, contact.target));
        damage_events.write(DamageInstigated {
            target: contact.target,
            instigator: contact.attacker,
            amount: attacker.base_damage,
        });
    }
}

/// Заносит подтверждённые удары в ledger и выпускает `HitConfirmed`.
///
/// Срабатывает только для pending-пар этого тика: прямой host-урон
/// (ловушки) через `DamageApplied` сюда не попадает.
pub fn confirm_hits(
    mut applied_events: EventReader<DamageApplied>,
    mut attackers: Query<&mut AttackState>,
    mut pending: ResMut<PendingWeaponHits>,
    mut hit_events: EventWriter<HitConfirmed>,
) {
    for applied in applied_events.read() {
        let pair = (applied.instigator, applied.target);
        let Some(position) = pending.0.iter().position(|p| *p == pair) else {
            continue;
        };
        if applied.amount <= 0.0 {
            continue;
        }

        pending.0.remove(position);

        if let Ok(mut attack) = attackers.get_mut(applied.instigator) {
            attack.record_hit(applied.target);
        }
        hit_events.write(HitConfirmed {
            attacker: applied.instigator,
            target: applied.target,
        });
    }
}
