//! Animation collaborator contract: clip tables, requests, random selection.
//!
//! Ядро НЕ проигрывает анимации — оно отправляет `AnimationRequest` и
//! получает обратно `AnimationCue` callbacks (см. `combat::attack`).
//! Выбор клипа детерминирован через `DeterministicRng`.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Таблицы анимационных клипов комбатанта (data-driven, host загружает)
///
/// Пустая таблица — дефект конфигурации: выбор из неё падает громко
/// (assert), а не молча отдаёт невалидный индекс.
#[derive(Component, Debug, Clone, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
pub struct AnimationSet {
    pub attacks: Vec<String>,
    pub stumbles: Vec<String>,
    pub deaths: Vec<String>,
    pub roll: String,
    pub taunt: String,
}

impl Default for AnimationSet {
    fn default() -> Self {
        Self {
            attacks: vec![
                "attack_light_a".into(),
                "attack_light_b".into(),
                "attack_light_c".into(),
            ],
            stumbles: vec![
                "takehit_stumble_a".into(),
                "takehit_stumble_b".into(),
                "takehit_stumble_c".into(),
            ],
            deaths: vec!["death_a".into(), "death_b".into()],
            roll: "combat_roll".into(),
            taunt: "taunt".into(),
        }
    }
}

/// Запрос host'у: проиграть клип на entity
#[derive(Event, Debug, Clone)]
pub struct AnimationRequest {
    pub entity: Entity,
    pub clip: String,
}

/// Равномерный выбор индекса клипа.
pub fn pick_uniform<R: Rng>(rng: &mut R, clip_count: usize) -> usize {
    assert!(clip_count > 0, "animation clip table is empty");
    rng.gen_range(0..clip_count)
}

/// Выбор stumble-клипа без немедленного повтора.
///
/// Re-roll до индекса, отличного от `last_index` — равномерно по всем
/// индексам кроме последнего использованного (при ≥2 клипах).
pub fn pick_non_repeating<R: Rng>(rng: &mut R, clip_count: usize, last_index: usize) -> usize {
    assert!(clip_count > 0, "animation clip table is empty");

    if clip_count == 1 {
        return 0;
    }

    loop {
        let index = rng.gen_range(0..clip_count);
        if index != last_index {
            return index;
        }
    }
}
