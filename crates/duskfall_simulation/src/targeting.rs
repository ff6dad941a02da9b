//! Target acquisition игрока: proximity set, combat lock, cycle targeting.
//!
//! Spatial overlap — внешний collaborator: host шлёт `ProximityEvent`
//! enter/exit, ядро держит `NearbyHostiles` и выбирает цель. Углы cycle
//! targeting считаются от позиции камеры, не от актора: выбор должен
//! совпадать с тем, что игрок видит на экране.

use bevy::prelude::*;

use crate::components::{
    CameraRig, Enemy, Health, MovementSpeed, NearbyHostiles, Player, PlayerConfig, Target,
};
use crate::facing::{wrap_angle, yaw_of};
use crate::logger::log;
use crate::SimSet;

/// Hostile вошёл в/покинул радиус обнаружения игрока (host overlap)
#[derive(Event, Debug, Clone, Copy)]
pub struct ProximityEvent {
    pub player: Entity,
    pub hostile: Entity,
    pub kind: ProximityKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityKind {
    Entered,
    Exited,
}

/// Перебор цели в экранном порядке; `clockwise` задаёт направление
#[derive(Event, Debug, Clone, Copy)]
pub struct CycleTargetIntent {
    pub entity: Entity,
    pub clockwise: bool,
}

/// Вкл/выкл combat lock (захват ближайшего hostile при включении)
#[derive(Event, Debug, Clone, Copy)]
pub struct ToggleCombatIntent {
    pub entity: Entity,
}

pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProximityEvent>()
            .add_event::<CycleTargetIntent>()
            .add_event::<ToggleCombatIntent>()
            .add_systems(
                FixedUpdate,
                (
                    process_proximity_events,
                    toggle_combat,
                    cycle_target,
                    validate_target,
                )
                    .chain()
                    .in_set(SimSet::Targeting),
            );
    }
}

/// Combat lock on/off: скорость, слот цели.
///
/// Facing tracking привязан к `Target::locked` внутри `look_at_smooth`,
/// отдельного флага не трогаем.
fn set_in_combat(
    target: &mut Target,
    speed: &mut MovementSpeed,
    config: &PlayerConfig,
    in_combat: bool,
) {
    target.locked = in_combat;
    speed.max = if in_combat {
        config.combat_speed
    } else {
        config.passive_speed
    };
    if !in_combat {
        target.entity = None;
    }
}

/// Ближайший кандидат по дистанции (strict `<`: при равенстве побеждает
/// более ранний по порядку входа в радиус).
pub fn select_nearest(origin: Vec3, candidates: &[(Entity, Vec3)]) -> Option<Entity> {
    let mut best: Option<(Entity, f32)> = None;
    for (entity, position) in candidates {
        let distance = origin.distance(*position);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((*entity, distance));
        }
    }
    best.map(|(entity, _)| entity)
}

/// Следующая цель в заданном направлении обзора камеры.
///
/// Для каждого кандидата — знаковая yaw-разница между camera→candidate и
/// camera→current. Clockwise берёт отрицательные разницы, counter-clockwise
/// положительные; из подходящих — минимальная по модулю.
pub fn select_cycled(
    camera: Vec3,
    current: Vec3,
    candidates: &[(Entity, Vec3)],
    clockwise: bool,
) -> Option<Entity> {
    let current_yaw = yaw_of(current - camera);
    let mut best: Option<(Entity, f32)> = None;

    for (entity, position) in candidates {
        let difference = wrap_angle(yaw_of(*position - camera) - current_yaw);
        if difference == 0.0 {
            continue;
        }
        if clockwise != (difference < 0.0) {
            continue;
        }
        let magnitude = difference.abs();
        if best.is_none_or(|(_, m)| magnitude < m) {
            best = Some((*entity, magnitude));
        }
    }

    best.map(|(entity, _)| entity)
}

/// Поддерживает `NearbyHostiles` по enter/exit нотификациям.
pub fn process_proximity_events(
    mut proximity_events: EventReader<ProximityEvent>,
    mut players: Query<&mut NearbyHostiles, With<Player>>,
) {
    for event in proximity_events.read() {
        let Ok(mut hostiles) = players.get_mut(event.player) else {
            continue;
        };
        match event.kind {
            ProximityKind::Entered => hostiles.add(event.hostile),
            ProximityKind::Exited => hostiles.remove(event.hostile),
        }
    }
}

/// Вкл/выкл combat lock по intent.
///
/// Включение без hostiles поблизости — no-op (lock не виснет в пустоте).
#[allow(clippy::type_complexity)]
pub fn toggle_combat(
    mut toggle_events: EventReader<ToggleCombatIntent>,
    mut players: Query<
        (
            &mut Target,
            &mut MovementSpeed,
            &NearbyHostiles,
            &PlayerConfig,
            &Transform,
        ),
        With<Player>,
    >,
    hostiles_q: Query<(&Transform, &Health), With<Enemy>>,
) {
    for event in toggle_events.read() {
        let Ok((mut target, mut speed, hostiles, config, transform)) = players.get_mut(event.entity)
        else {
            continue;
        };

        if target.locked {
            set_in_combat(&mut target, &mut speed, config, false);
            log(&format!("🎯 {:?} combat lock off", event.entity));
            continue;
        }

        let candidates = living_positions(hostiles, &hostiles_q);
        if let Some(nearest) = select_nearest(transform.translation, &candidates) {
            target.entity = Some(nearest);
            set_in_combat(&mut target, &mut speed, config, true);
            log(&format!("🎯 {:?} locks onto {:?}", event.entity, nearest));
        }
    }
}

/// Перебор цели по кругу относительно камеры.
///
/// Без текущей цели перебор вырождается в захват ближайшего.
#[allow(clippy::type_complexity)]
pub fn cycle_target(
    mut cycle_events: EventReader<CycleTargetIntent>,
    mut players: Query<
        (
            &mut Target,
            &mut MovementSpeed,
            &NearbyHostiles,
            &PlayerConfig,
            &CameraRig,
            &Transform,
        ),
        With<Player>,
    >,
    hostiles_q: Query<(&Transform, &Health), With<Enemy>>,
) {
    for event in cycle_events.read() {
        let Ok((mut target, mut speed, hostiles, config, camera, transform)) =
            players.get_mut(event.entity)
        else {
            continue;
        };

        let candidates = living_positions(hostiles, &hostiles_q);

        let current_position = target
            .entity
            .and_then(|t| hostiles_q.get(t).ok())
            .filter(|(_, health)| health.is_alive())
            .map(|(t, _)| t.translation);

        let next = match current_position {
            Some(current) => {
                let others: Vec<(Entity, Vec3)> = candidates
                    .iter()
                    .copied()
                    .filter(|(e, _)| Some(*e) != target.entity)
                    .collect();
                select_cycled(camera.position, current, &others, event.clockwise)
            }
            None => select_nearest(transform.translation, &candidates),
        };

        if let Some(next) = next {
            target.entity = Some(next);
            if !target.locked {
                set_in_combat(&mut target, &mut speed, config, true);
            }
            log(&format!("🎯 {:?} cycles to {:?}", event.entity, next));
        }
    }
}

/// Реактивная валидация слота цели (каждый тик, после intents).
///
/// - мёртвые hostiles вычищаются из `NearbyHostiles`
/// - мёртвая/исчезнувшая цель при lock'е → авто-retarget на ближайшего,
///   некого — lock снимается
/// - залоченная цель дальше `lock_distance` → lock рвётся
#[allow(clippy::type_complexity)]
pub fn validate_target(
    mut players: Query<
        (
            Entity,
            &mut Target,
            &mut MovementSpeed,
            &mut NearbyHostiles,
            &PlayerConfig,
            &Transform,
        ),
        With<Player>,
    >,
    hostiles_q: Query<(&Transform, &Health), With<Enemy>>,
) {
    for (entity, mut target, mut speed, mut hostiles, config, transform) in players.iter_mut() {
        hostiles.0.retain(|hostile| {
            hostiles_q
                .get(*hostile)
                .is_ok_and(|(_, health)| health.is_alive())
        });

        let Some(current) = target.entity else {
            continue;
        };

        let alive_position = hostiles_q
            .get(current)
            .ok()
            .filter(|(_, health)| health.is_alive())
            .map(|(t, _)| t.translation);

        match alive_position {
            None => {
                target.entity = None;
                if target.locked {
                    let candidates = living_positions(&hostiles, &hostiles_q);
                    match select_nearest(transform.translation, &candidates) {
                        Some(next) => {
                            target.entity = Some(next);
                            log(&format!("🎯 {:?} retargets to {:?}", entity, next));
                        }
                        None => {
                            set_in_combat(&mut target, &mut speed, config, false);
                            log(&format!("🎯 {:?} lock dropped, no hostiles left", entity));
                        }
                    }
                }
            }
            Some(position) => {
                if target.locked && transform.translation.distance(position) >= config.lock_distance
                {
                    set_in_combat(&mut target, &mut speed, config, false);
                    log(&format!("🎯 {:?} lock broken by distance", entity));
                }
            }
        }
    }
}

fn living_positions(
    hostiles: &NearbyHostiles,
    hostiles_q: &Query<(&Transform, &Health), With<Enemy>>,
) -> Vec<(Entity, Vec3)> {
    hostiles
        .0
        .iter()
        .filter_map(|hostile| {
            hostiles_q
                .get(*hostile)
                .ok()
                .filter(|(_, health)| health.is_alive())
                .map(|(transform, _)| (*hostile, transform.translation))
        })
        .collect()
}
