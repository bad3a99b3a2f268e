//! PathfindingAgent: абстракция над navmesh агентом движка.
//!
//! Граф путей строит внешний navigation service; ядро AI только
//! ставит цели и читает прогресс.

use bevy::prelude::*;

pub trait PathfindingAgent {
    /// `false` если путь не может быть запрошен
    fn set_destination(&mut self, point: Vec3) -> bool;
    fn reset_path(&mut self);

    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn set_stopping_distance(&mut self, distance: f32);

    /// Текущая скорость (вектор)
    fn velocity(&self) -> Vec3;
    /// Максимальная скорость движения (для lead prediction)
    fn speed(&self) -> f32;
    fn is_on_nav_mesh(&self) -> bool;

    /// Ближайшая проходимая точка в пределах `max_distance`
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// `false` - поворотом управляет AI (facing controller), а не steering агента
    fn set_update_rotation(&mut self, enabled: bool);
}
