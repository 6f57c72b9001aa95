//! Scripted player.
//!
//! Every few frames the autopilot keeps a launcher selected and fires at the
//! lowest enemy missile, aiming slightly below it to lead its descent.

use glam::Vec2;
use intercept_core::entity::{Entity, EntityId, LauncherComponents};
use intercept_core::Simulation;
use tracing::debug;

/// Lead below the target, in world units.
const LEAD: f32 = 0.6;

pub struct Autopilot {
    reaction_frames: u64,
    frame: u64,
    engaged: Vec<EntityId>,
}

impl Autopilot {
    pub fn new(reaction_frames: u64) -> Self {
        Self {
            reaction_frames: reaction_frames.max(1),
            frame: 0,
            engaged: Vec::new(),
        }
    }

    /// Queues this frame's pointer activations, if any.
    pub fn act(&mut self, sim: &mut Simulation) {
        self.frame += 1;
        if self.frame % self.reaction_frames != 0 || sim.is_game_over() {
            return;
        }

        self.engaged.retain(|id| sim.arena().contains(*id));

        if sim.launchers().selected(sim.arena()).is_none() {
            let Some(position) = Self::ready_launcher(sim) else {
                return;
            };
            sim.pointer_activated(position);
        }

        if let Some((id, position)) = self.pick_target(sim) {
            debug!(target = %id, x = position.x, y = position.y, "autopilot engaging");
            self.engaged.push(id);
            sim.pointer_activated(position - Vec2::new(0.0, LEAD));
        }
    }

    /// Position of the first launcher that can still be selected.
    fn ready_launcher(sim: &Simulation) -> Option<Vec2> {
        sim.launchers().ids().iter().find_map(|id| {
            let entity = sim.arena().get(*id)?;
            let launcher = entity.as_launcher()?;
            (!LauncherComponents::is_out(launcher)).then(|| entity.position())
        })
    }

    /// Lowest enemy missile not already engaged.
    fn pick_target(&self, sim: &Simulation) -> Option<(EntityId, Vec2)> {
        sim.arena()
            .entities_sorted()
            .filter(|e| e.as_missile().is_some_and(|m| !m.owned_by_player))
            .filter(|e| !self.engaged.contains(&e.id()))
            .map(|e: &Entity| (e.id(), e.position()))
            .min_by(|a, b| a.1.y.total_cmp(&b.1.y))
    }
}
