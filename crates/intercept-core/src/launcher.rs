//! Launcher controller and selection policy.
//!
//! [`LauncherComponents`] is the per-launcher state machine:
//!
//! ```text
//! Unselected <-> Selected --(last round)--> NoAmmo
//!      ^                                       |
//!      +------------- resupply ----------------+
//!   any --(non-player blast)--> Destroyed --repair--> Unselected
//! ```
//!
//! Every mutator returns the [`Transition`] it caused, if any, so the caller
//! emits `LauncherStateChanged` exactly when something changed.
//!
//! [`LauncherBank`] owns the launcher IDs and enforces that at most one
//! launcher is selected.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::Arena;
use crate::config::LauncherConfig;
use crate::entity::{Entity, EntityId, KindMask, Payload};
use crate::event::Notification;
use crate::world::World;

/// Launcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LauncherState {
    /// Ready but not chosen by the player.
    Unselected,
    /// Chosen; pointer presses fire from here.
    Selected,
    /// Out of rounds until the next resupply.
    NoAmmo,
    /// Knocked out until repaired.
    Destroyed,
}

/// A state change caused by a mutator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State before.
    pub from: LauncherState,
    /// State after.
    pub to: LauncherState,
}

/// Which launcher states still collide with enemy missiles and blasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherCollision {
    /// Empty launchers can be hit.
    pub when_no_ammo: bool,
    /// Destroyed launchers still absorb hits.
    pub when_destroyed: bool,
}

impl Default for LauncherCollision {
    fn default() -> Self {
        Self {
            when_no_ammo: true,
            when_destroyed: false,
        }
    }
}

/// Why a fire request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireRejected {
    /// The launcher is not the selected one.
    NotSelected(LauncherState),
    /// Magazine empty.
    OutOfAmmo,
    /// Firing was stopped by game over.
    FiringStopped,
    /// The aim point is below the firing floor.
    BelowFloor,
}

/// A granted fire request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireOrder {
    /// Launcher tip.
    pub origin: Vec2,
    /// Aim point.
    pub target: Vec2,
    /// Interceptor speed.
    pub speed: f32,
    /// Interceptor warhead.
    pub payload: Payload,
    /// Rounds left after this shot.
    pub ammo_left: u32,
    /// True when this shot crossed the low-ammo threshold.
    pub low_ammo: bool,
    /// Set when the shot emptied the magazine.
    pub transition: Option<Transition>,
}

/// Launcher state and ammunition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherComponents {
    /// Rounds loaded.
    pub ammo: u32,
    /// Magazine size.
    pub capacity: u32,
    state: LauncherState,
    /// Cleared on game over.
    pub can_fire: bool,
    /// Offset from the launcher position to the muzzle.
    pub tip_offset: Vec2,
    /// Presses below this height never fire.
    pub no_fire_below_y: f32,
    /// Interceptor speed.
    pub launch_speed: f32,
    /// Interceptor warhead.
    pub interceptor: Payload,
    /// Footprint radius for hit-testing and collisions.
    pub collider_radius: f32,
    /// Fraction of capacity at or below which the low-ammo alert fires.
    pub low_ammo_fraction: f32,
    low_ammo_alerted: bool,
    /// Collision rules per state.
    pub collision: LauncherCollision,
}

impl LauncherComponents {
    /// Creates a full, unselected launcher.
    #[must_use]
    pub fn from_config(config: &LauncherConfig, collision: LauncherCollision) -> Self {
        Self {
            ammo: config.capacity,
            capacity: config.capacity,
            state: LauncherState::Unselected,
            can_fire: true,
            tip_offset: Vec2::new(0.0, config.tip_offset),
            no_fire_below_y: config.no_fire_below_y,
            launch_speed: config.launch_speed,
            interceptor: config.interceptor,
            collider_radius: config.collider_radius,
            low_ammo_fraction: config.low_ammo_fraction,
            low_ammo_alerted: false,
            collision,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LauncherState {
        self.state
    }

    /// Returns true if the launcher is destroyed or empty.
    #[must_use]
    pub const fn is_out(&self) -> bool {
        matches!(self.state, LauncherState::Destroyed | LauncherState::NoAmmo)
    }

    /// Returns true if enemy missiles and blasts interact with the launcher.
    #[must_use]
    pub const fn is_collidable(&self) -> bool {
        match self.state {
            LauncherState::Destroyed => self.collision.when_destroyed,
            LauncherState::NoAmmo => self.collision.when_no_ammo,
            LauncherState::Unselected | LauncherState::Selected => true,
        }
    }

    fn set_state(&mut self, to: LauncherState) -> Option<Transition> {
        let from = self.state;
        if from == to {
            return None;
        }
        self.state = to;
        Some(Transition { from, to })
    }

    /// Selects the launcher unless it is destroyed or empty.
    pub fn select(&mut self) -> Option<Transition> {
        if self.is_out() {
            return None;
        }
        self.set_state(LauncherState::Selected)
    }

    /// Deselects the launcher unless it is destroyed or empty.
    pub fn deselect(&mut self) -> Option<Transition> {
        if self.is_out() {
            return None;
        }
        self.set_state(LauncherState::Unselected)
    }

    /// World position shots leave from.
    #[must_use]
    pub fn fire_origin(&self, position: Vec2) -> Vec2 {
        position + self.tip_offset
    }

    /// Spends a round on `target` if every firing condition holds.
    ///
    /// # Errors
    ///
    /// Returns the first failed condition. Nothing changes on rejection.
    pub fn try_fire(&mut self, position: Vec2, target: Vec2) -> Result<FireOrder, FireRejected> {
        if self.state != LauncherState::Selected {
            return Err(FireRejected::NotSelected(self.state));
        }
        if self.ammo == 0 {
            return Err(FireRejected::OutOfAmmo);
        }
        if !self.can_fire {
            return Err(FireRejected::FiringStopped);
        }
        if target.y < self.no_fire_below_y {
            return Err(FireRejected::BelowFloor);
        }

        self.ammo -= 1;
        let low_ammo = !self.low_ammo_alerted && self.is_low_on_ammo();
        if low_ammo {
            self.low_ammo_alerted = true;
        }
        let transition = if self.ammo == 0 {
            self.set_state(LauncherState::NoAmmo)
        } else {
            None
        };

        Ok(FireOrder {
            origin: self.fire_origin(position),
            target,
            speed: self.launch_speed,
            payload: self.interceptor,
            ammo_left: self.ammo,
            low_ammo,
            transition,
        })
    }

    /// Returns true at or below the low-ammo threshold.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn is_low_on_ammo(&self) -> bool {
        self.capacity > 0 && (self.ammo as f32 / self.capacity as f32) <= self.low_ammo_fraction
    }

    /// Refills the magazine and deselects, unless destroyed.
    pub fn resupply(&mut self) -> Option<Transition> {
        self.ammo = self.capacity;
        self.low_ammo_alerted = false;
        if self.state == LauncherState::Destroyed {
            None
        } else {
            self.set_state(LauncherState::Unselected)
        }
    }

    /// Brings a destroyed launcher back. No-op in any other state.
    ///
    /// An empty magazine comes back as `NoAmmo`.
    pub fn repair(&mut self) -> Option<Transition> {
        if self.state != LauncherState::Destroyed {
            return None;
        }
        if self.ammo == 0 {
            self.set_state(LauncherState::NoAmmo)
        } else {
            self.set_state(LauncherState::Unselected)
        }
    }

    /// Knocks the launcher out.
    pub fn receive_damage(&mut self) -> Option<Transition> {
        self.set_state(LauncherState::Destroyed)
    }

    /// Stops all further firing.
    pub fn stop_fire(&mut self) {
        self.can_fire = false;
    }
}

// =============================================================================
// Launcher Bank
// =============================================================================

/// The player's launchers, in configuration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherBank {
    ids: Vec<EntityId>,
}

impl LauncherBank {
    /// Creates a bank over already spawned launchers.
    #[must_use]
    pub fn new(ids: Vec<EntityId>) -> Self {
        Self { ids }
    }

    /// Launcher IDs in configuration order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    fn launcher(arena: &Arena, id: EntityId) -> Option<&LauncherComponents> {
        arena.get(id).and_then(Entity::as_launcher)
    }

    /// First launcher whose footprint contains `point`.
    #[must_use]
    pub fn hit_test(&self, arena: &Arena, point: Vec2) -> Option<EntityId> {
        arena
            .query_overlap(point, 0.0, KindMask::LAUNCHER)
            .into_iter()
            .find(|id| self.ids.contains(id))
    }

    /// The selected launcher, if any.
    #[must_use]
    pub fn selected(&self, arena: &Arena) -> Option<EntityId> {
        self.ids.iter().copied().find(|id| {
            Self::launcher(arena, *id).is_some_and(|l| l.state() == LauncherState::Selected)
        })
    }

    /// Returns true if every launcher is destroyed or empty.
    #[must_use]
    pub fn all_out(&self, arena: &Arena) -> bool {
        !self.ids.is_empty()
            && self
                .ids
                .iter()
                .all(|id| Self::launcher(arena, *id).map_or(true, LauncherComponents::is_out))
    }

    /// Selects `target` and deselects every other launcher.
    ///
    /// Returns false, changing nothing, if `target` is destroyed or empty.
    pub fn select(&self, world: &mut World, target: EntityId) -> bool {
        let eligible = Self::launcher(&world.arena, target).is_some_and(|l| !l.is_out());
        if !eligible {
            debug!(launcher = %target, "selection ignored");
            return false;
        }
        for id in self.ids.iter().copied().filter(|id| *id != target) {
            world.update_launcher(id, LauncherComponents::deselect);
        }
        world.update_launcher(target, LauncherComponents::select);
        true
    }

    /// Fires from `launcher` at `target`, spawning the interceptor and its
    /// marker. Returns the missile ID, or `None` if the request was rejected.
    pub fn fire(&self, world: &mut World, launcher: EntityId, target: Vec2) -> Option<EntityId> {
        let entity = world.arena.get_mut(launcher)?;
        let position = entity.position();
        let order = match entity.as_launcher_mut()?.try_fire(position, target) {
            Ok(order) => order,
            Err(reason) => {
                debug!(launcher = %launcher, ?reason, "fire request ignored");
                return None;
            }
        };

        if let Some(t) = order.transition {
            world.emit(Notification::LauncherStateChanged {
                launcher,
                from: t.from,
                to: t.to,
            });
        }
        if order.low_ammo {
            world.emit(Notification::LauncherLowAmmo {
                launcher,
                ammo: order.ammo_left,
            });
        }
        Some(world.launch_interceptor(launcher, &order))
    }

    /// Refills then repairs every launcher.
    pub fn resupply_and_repair_all(&self, world: &mut World) {
        for id in self.ids.iter().copied() {
            world.update_launcher(id, LauncherComponents::resupply);
            world.update_launcher(id, LauncherComponents::repair);
        }
    }

    /// Stops firing on every launcher.
    pub fn stop_fire_all(&self, world: &mut World) {
        for id in self.ids.iter().copied() {
            if let Some(launcher) = world.arena.get_mut(id).and_then(Entity::as_launcher_mut) {
                launcher.stop_fire();
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn launcher() -> LauncherComponents {
        LauncherComponents::from_config(&LauncherConfig::default(), LauncherCollision::default())
    }

    fn selected() -> LauncherComponents {
        let mut l = launcher();
        l.select();
        l
    }

    mod state_machine_tests {
        use super::*;

        #[test]
        fn starts_full_and_unselected() {
            let l = launcher();
            assert_eq!(l.state(), LauncherState::Unselected);
            assert_eq!(l.ammo, l.capacity);
            assert!(l.can_fire);
        }

        #[test]
        fn select_and_deselect_report_transitions() {
            let mut l = launcher();
            assert_eq!(
                l.select(),
                Some(Transition {
                    from: LauncherState::Unselected,
                    to: LauncherState::Selected
                })
            );
            assert_eq!(l.select(), None);
            assert!(l.deselect().is_some());
            assert_eq!(l.state(), LauncherState::Unselected);
        }

        #[test]
        fn select_is_noop_when_destroyed_or_empty() {
            let mut l = launcher();
            l.receive_damage();
            assert_eq!(l.select(), None);
            assert_eq!(l.deselect(), None);
            assert_eq!(l.state(), LauncherState::Destroyed);

            let mut empty = selected();
            while empty.ammo > 0 {
                empty.try_fire(Vec2::ZERO, Vec2::new(0.0, 5.0)).unwrap();
            }
            assert_eq!(empty.select(), None);
            assert_eq!(empty.state(), LauncherState::NoAmmo);
        }

        #[test]
        fn resupply_restores_ammo_and_deselects() {
            let mut l = selected();
            l.try_fire(Vec2::ZERO, Vec2::new(0.0, 5.0)).unwrap();
            let t = l.resupply();
            assert_eq!(l.ammo, l.capacity);
            assert_eq!(t.map(|t| t.to), Some(LauncherState::Unselected));
        }

        #[test]
        fn resupply_keeps_destroyed() {
            let mut l = selected();
            l.receive_damage();
            assert_eq!(l.resupply(), None);
            assert_eq!(l.state(), LauncherState::Destroyed);
            assert_eq!(l.ammo, l.capacity);
        }

        #[test]
        fn repair_only_from_destroyed() {
            let mut l = launcher();
            assert_eq!(l.repair(), None);
            l.receive_damage();
            assert_eq!(l.repair().map(|t| t.to), Some(LauncherState::Unselected));
        }

        #[test]
        fn repair_of_empty_launcher_lands_in_no_ammo() {
            let mut l = selected();
            while l.ammo > 0 {
                l.try_fire(Vec2::ZERO, Vec2::new(0.0, 5.0)).unwrap();
            }
            l.receive_damage();
            assert_eq!(l.repair().map(|t| t.to), Some(LauncherState::NoAmmo));
        }

        #[test]
        fn damage_is_idempotent() {
            let mut l = launcher();
            assert!(l.receive_damage().is_some());
            assert!(l.receive_damage().is_none());
        }

        #[test]
        fn collision_flags_follow_state() {
            let mut l = launcher();
            assert!(l.is_collidable());
            l.receive_damage();
            assert!(!l.is_collidable());
            l.collision.when_destroyed = true;
            assert!(l.is_collidable());
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn ten_shots_empty_the_magazine() {
            let mut l = selected();
            for _ in 0..10 {
                assert!(l.try_fire(Vec2::ZERO, Vec2::new(1.0, 3.0)).is_ok());
            }
            assert_eq!(l.ammo, 0);
            assert_eq!(l.state(), LauncherState::NoAmmo);

            let eleventh = l.try_fire(Vec2::ZERO, Vec2::new(1.0, 3.0));
            assert!(matches!(eleventh, Err(FireRejected::NotSelected(LauncherState::NoAmmo))));
            assert_eq!(l.ammo, 0);
        }

        #[test]
        fn last_shot_reports_transition() {
            let mut l = selected();
            l.ammo = 1;
            let order = l.try_fire(Vec2::ZERO, Vec2::new(0.0, 2.0)).unwrap();
            assert_eq!(order.ammo_left, 0);
            assert_eq!(order.transition.map(|t| t.to), Some(LauncherState::NoAmmo));
        }

        #[test]
        fn unselected_launcher_does_not_fire() {
            let mut l = launcher();
            assert_eq!(
                l.try_fire(Vec2::ZERO, Vec2::new(0.0, 2.0)),
                Err(FireRejected::NotSelected(LauncherState::Unselected))
            );
            assert_eq!(l.ammo, l.capacity);
        }

        #[test]
        fn below_floor_is_rejected() {
            let mut l = selected();
            let floor = l.no_fire_below_y;
            assert_eq!(
                l.try_fire(Vec2::ZERO, Vec2::new(0.0, floor - 0.5)),
                Err(FireRejected::BelowFloor)
            );
            assert!(l.try_fire(Vec2::ZERO, Vec2::new(0.0, floor)).is_ok());
        }

        #[test]
        fn stopped_launcher_does_not_fire() {
            let mut l = selected();
            l.stop_fire();
            assert_eq!(
                l.try_fire(Vec2::ZERO, Vec2::new(0.0, 2.0)),
                Err(FireRejected::FiringStopped)
            );
        }

        #[test]
        fn origin_is_launcher_tip() {
            let mut l = selected();
            let order = l.try_fire(Vec2::new(3.0, -4.0), Vec2::new(0.0, 2.0)).unwrap();
            assert_eq!(order.origin, Vec2::new(3.0, -4.0) + l.tip_offset);
        }

        #[test]
        fn low_ammo_alert_fires_once_per_magazine() {
            let mut l = selected();
            let alerts: Vec<u32> = (0..10)
                .filter_map(|_| l.try_fire(Vec2::ZERO, Vec2::new(0.0, 2.0)).ok())
                .filter(|o| o.low_ammo)
                .map(|o| o.ammo_left)
                .collect();
            assert_eq!(alerts, vec![4]);

            l.resupply();
            l.select();
            l.ammo = 5;
            let order = l.try_fire(Vec2::ZERO, Vec2::new(0.0, 2.0)).unwrap();
            assert!(order.low_ammo);
        }
    }
}
