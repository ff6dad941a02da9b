//! Общая запись комбатанта: Health, Stamina, Target, attack lifecycle flags.
//!
//! Deep inheritance оригинала (Combatant → EnemyBase / PlayerCharacter)
//! заменена композицией: общие поля живут здесь, вариант-специфичное
//! поведение — в `Enemy` / `Player` модулях.

use bevy::prelude::*;

use crate::animation::AnimationSet;
use crate::components::movement::{MovementCommand, MovementSpeed};

/// Комбатант — базовый компонент для участников боя (player и enemy).
///
/// Автоматически добавляет общий набор боевых компонентов через
/// Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(
    Transform,
    Health,
    Stamina,
    Target,
    Attacker,
    AttackState,
    MoveFlags,
    StumbleState,
    Facing,
    Airborne,
    AnimationSet,
    MovementCommand,
    MovementSpeed
)]
pub struct Combatant;

/// Здоровье комбатанта
///
/// Инвариант: 0.0 ≤ current ≤ max, clamp на каждой мутации.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Вычитает урон, clamp к [0, max]. Возвращает фактически снятое.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);
        before - self.current
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }
}

/// Выносливость (stamina) для атак/перекатов/спринта
///
/// Инвариант: 0.0 ≤ current ≤ max
/// Regen: 15 units/sec (когда не спринтуем/не атакуем/не в перекате)
/// Costs: attack 33 (порог >10), roll 30 (порог >30), sprint 30/sec
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Stamina {
    pub current: f32,
    pub max: f32,
    pub regen_rate: f32, // units per second
}

impl Default for Stamina {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Stamina {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate: 15.0,
        }
    }

    /// Списывает стоимость с clamp к нулю (проверка порога — на вызывающем).
    pub fn drain(&mut self, cost: f32) {
        self.current = (self.current - cost).clamp(0.0, self.max);
    }

    pub fn regenerate(&mut self, delta_time: f32) {
        self.current = (self.current + self.regen_rate * delta_time).clamp(0.0, self.max);
    }
}

/// Текущая цель комбатанта (non-owning weak reference)
///
/// `entity` может указывать на умершего/исчезнувшего актора — каждый
/// потребитель обязан проверять liveness перед использованием
/// (`targeting::validate_target` чистит слот реактивно).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Target {
    pub entity: Option<Entity>,
    /// Combat lock: facing/камера удерживают ориентацию на цель
    pub locked: bool,
}

impl Target {
    pub fn clear(&mut self) {
        self.entity = None;
        self.locked = false;
    }
}

/// Способность наносить урон оружием
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Базовый урон одного подтверждённого попадания
    pub base_damage: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self { base_damage: 25.0 }
    }
}

/// Attack lifecycle flags + per-attack hit ledger
///
/// `hit_actors` — exclusion set одного замаха: актор получает урон не более
/// одного раза за attack instance, сколько бы тиков ни длился overlap.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct AttackState {
    pub attacking: bool,
    /// true только внутри damage window анимации (между cues)
    pub damaging: bool,
    /// Окно комбо: следующая атака может начаться до конца текущей
    pub next_attack_ready: bool,
    /// Индекс в цепочке комбо (player attack chain)
    pub combo_index: usize,
    pub hit_actors: Vec<Entity>,
}

impl AttackState {
    /// Начало атаки: сброс флагов и очистка hit ledger.
    pub fn begin(&mut self) {
        self.attacking = true;
        self.next_attack_ready = false;
        self.damaging = false;
        self.hit_actors.clear();
    }

    /// Завершение/отмена атаки. Полный набор флагов сбрасывается атомарно
    /// относительно остального тика (никаких частичных отмен).
    pub fn end(&mut self) {
        self.attacking = false;
        self.next_attack_ready = false;
        self.damaging = false;
    }

    pub fn has_hit(&self, actor: Entity) -> bool {
        self.hit_actors.contains(&actor)
    }

    pub fn record_hit(&mut self, actor: Entity) {
        if !self.hit_actors.contains(&actor) {
            self.hit_actors.push(actor);
        }
    }
}

/// Флаги анимационного перемещения (вперёд/назад во время stumble и т.п.)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct MoveFlags {
    pub forward: bool,
    pub backwards: bool,
}

impl MoveFlags {
    pub fn clear(&mut self) {
        self.forward = false;
        self.backwards = false;
    }
}

/// Stumble (hit reaction) состояние
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StumbleState {
    pub stumbling: bool,
    /// Последний проигранный stumble clip — немедленный повтор запрещён
    pub last_stumble_index: usize,
}

/// Facing controller: плавный доворот на цель
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Facing {
    /// Damping coefficient (yaw lerp rate, 1/sec)
    pub smoothing: f32,
    /// Yaw, пройденный за последний тик (градусы) — для turn-blend анимаций
    pub last_rotation_speed: f32,
    /// false → facing-tracking выключен, скорость репортится как 0
    pub track_target: bool,
}

impl Default for Facing {
    fn default() -> Self {
        Self {
            smoothing: 5.0,
            last_rotation_speed: 0.0,
            track_target: true,
        }
    }
}

impl Facing {
    /// Мгновенная скорость вращения за последний тик (градусы).
    pub fn current_rotation_speed(&self) -> f32 {
        if self.track_target {
            self.last_rotation_speed
        } else {
            0.0
        }
    }
}

/// В воздухе ли актор (host-fed: физика прыжков внешняя)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Airborne(pub bool);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_clamped_on_damage() {
        let mut health = Health::new(100.0);

        let applied = health.take_damage(30.0);
        assert_eq!(applied, 30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        // Overkill: clamp к нулю, снято только остаток
        let applied = health.take_damage(500.0);
        assert_eq!(applied, 70.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_heal_clamped() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        health.heal(30.0);
        assert_eq!(health.current, 80.0);

        health.heal(100.0); // Clamp к max
        assert_eq!(health.current, 100.0);
    }

    #[test]
    fn test_stamina_drain_clamped() {
        let mut stamina = Stamina::new(100.0);

        stamina.drain(33.0);
        assert_eq!(stamina.current, 67.0);

        // Drain ниже нуля → clamp (оригинальный FMath::Clamp)
        stamina.drain(100.0);
        assert_eq!(stamina.current, 0.0);
    }

    #[test]
    fn test_stamina_regenerate() {
        let mut stamina = Stamina::new(100.0);
        stamina.drain(50.0);

        stamina.regenerate(2.0); // 2 sec × 15 units/sec = +30
        assert_eq!(stamina.current, 80.0);

        stamina.regenerate(10.0); // Clamp к max
        assert_eq!(stamina.current, 100.0);
    }

    #[test]
    fn test_attack_state_begin_clears_ledger() {
        let mut attack = AttackState::default();
        attack.record_hit(Entity::PLACEHOLDER);
        attack.next_attack_ready = true;

        attack.begin();
        assert!(attack.attacking);
        assert!(!attack.next_attack_ready);
        assert!(!attack.damaging);
        assert!(attack.hit_actors.is_empty());
    }

    #[test]
    fn test_hit_ledger_no_duplicates() {
        let mut attack = AttackState::default();
        attack.record_hit(Entity::PLACEHOLDER);
        attack.record_hit(Entity::PLACEHOLDER);

        assert_eq!(attack.hit_actors.len(), 1);
        assert!(attack.has_hit(Entity::PLACEHOLDER));
    }

    #[test]
    fn test_rotation_speed_zero_when_tracking_disabled() {
        let mut facing = Facing::default();
        facing.last_rotation_speed = 12.5;
        assert_eq!(facing.current_rotation_speed(), 12.5);

        facing.track_target = false;
        assert_eq!(facing.current_rotation_speed(), 0.0);
    }
}
