//! Obstacle pool and spawner
//!
//! A fixed arena of obstacle slots. Obstacles are never created or destroyed
//! during play: a slot is switched on at the spawn anchor, travels down the
//! track and is switched off again once it passes the despawn anchor.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::collision::swept_sphere_contact;
use super::rng::RandomSource;
use super::state::SimEvent;
use super::track::TrackGeometry;
use crate::axis;
use crate::consts::MAX_ACTIVE_OBSTACLES;
use crate::scene::TransformId;
use crate::tuning::Tuning;

/// The two obstacle kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Tree,
    Rock,
}

/// One pool slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub slot: usize,
    /// Scene transform this slot drives
    pub transform: TransformId,
    pub kind: ObstacleKind,
    pub radius: f32,
    /// Vertical offset at spawn; the collision probe sits half of it below
    pub depth: f32,
    pub active: bool,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Obstacle {
    pub fn new(slot: usize, transform: TransformId, kind: ObstacleKind, tuning: &Tuning) -> Self {
        let k = tuning.kind(kind);
        Self {
            slot,
            transform,
            kind,
            radius: k.radius,
            depth: k.depth,
            active: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    /// Point used for the swept test: the anchor pulled back by half the depth
    #[inline]
    pub fn probe(&self) -> Vec3 {
        self.position - Vec3::splat(self.depth / 2.0)
    }
}

/// Spawn timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub since_last_spawn: f32,
    /// Current gap between spawns; only ever shrinks, down to the floor
    pub interval: f32,
    pub active_count: usize,
}

impl SpawnSchedule {
    pub fn new(interval: f32) -> Self {
        Self {
            since_last_spawn: 0.0,
            interval,
            active_count: 0,
        }
    }

    /// Due for a spawn and a slot can be spared
    #[inline]
    pub fn is_due(&self) -> bool {
        self.since_last_spawn > self.interval && self.active_count < MAX_ACTIVE_OBSTACLES
    }

    /// Shorten the interval, then charge it against the accumulator
    pub fn consume(&mut self, step: f32, floor: f32) {
        self.interval = (self.interval - step).max(floor);
        self.since_last_spawn -= self.interval;
    }
}

/// Result of moving every active obstacle one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Advance {
    /// First slot whose swept path touched the actor
    pub contact: Option<usize>,
    /// Last slot that was already free when the pass reached it. Slots the
    /// pass itself frees are not candidates.
    pub free_slot: Option<usize>,
}

/// Fixed-capacity obstacle arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstaclePool {
    slots: Vec<Obstacle>,
    schedule: SpawnSchedule,
}

impl ObstaclePool {
    /// Take ownership of the slots. The slot count is the pool's capacity for
    /// good; nothing is ever pushed or removed afterwards.
    pub fn new(slots: Vec<Obstacle>, interval: f32) -> Self {
        Self {
            slots,
            schedule: SpawnSchedule::new(interval),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.schedule.active_count
    }

    pub fn schedule(&self) -> &SpawnSchedule {
        &self.schedule
    }

    pub fn slots(&self) -> &[Obstacle] {
        &self.slots
    }

    pub fn get(&self, slot: usize) -> Option<&Obstacle> {
        self.slots.get(slot)
    }

    pub fn active(&self) -> impl Iterator<Item = &Obstacle> {
        self.slots.iter().filter(|o| o.active)
    }

    /// Switch every slot off and park it at `park`
    pub fn reset(&mut self, park: Vec3, interval: f32) {
        self.schedule = SpawnSchedule::new(interval);
        for obstacle in &mut self.slots {
            obstacle.active = false;
            obstacle.position = park;
            obstacle.rotation = Quat::IDENTITY;
        }
    }

    /// Force a slot on at `position`, bypassing the spawn schedule.
    /// Refuses (returns false) if that would break the active-count cap or the
    /// slot doesn't exist.
    pub fn place(&mut self, slot: usize, position: Vec3) -> bool {
        let Some(obstacle) = self.slots.get_mut(slot) else {
            return false;
        };
        if !obstacle.active {
            if self.schedule.active_count >= MAX_ACTIVE_OBSTACLES {
                return false;
            }
            obstacle.active = true;
            self.schedule.active_count += 1;
        }
        obstacle.position = position;
        true
    }

    /// Move every active obstacle by `step`, sweep-testing each against the
    /// actor sphere, and free the ones that pass the despawn anchor.
    pub fn advance(
        &mut self,
        dt: f32,
        step: Vec3,
        actor_position: Vec3,
        actor_radius: f32,
        track: &TrackGeometry,
        events: &mut Vec<SimEvent>,
    ) -> Advance {
        self.schedule.since_last_spawn += dt;

        let mut result = Advance::default();
        for obstacle in &mut self.slots {
            if !obstacle.active {
                result.free_slot = Some(obstacle.slot);
                continue;
            }

            let probe = obstacle.probe();
            obstacle.position += step;

            if result.contact.is_none()
                && swept_sphere_contact(probe, step, actor_position, actor_radius + obstacle.radius)
            {
                result.contact = Some(obstacle.slot);
            }

            if track.has_passed_despawn(obstacle.position) {
                obstacle.active = false;
                self.schedule.active_count -= 1;
                log::debug!("Obstacle {} despawned", obstacle.slot);
                events.push(SimEvent::Despawned {
                    slot: obstacle.slot,
                });
            }
        }
        result
    }

    /// Spawn one obstacle if the schedule is due.
    ///
    /// The slot is drawn uniformly; if the draw lands on an active slot the
    /// free slot recorded by this tick's [`advance`](Self::advance) is used
    /// instead.
    ///
    /// # Panics
    ///
    /// If the draw collides and no free slot was recorded. The active-count
    /// cap guarantees one, so this means the pool state is corrupt.
    pub fn maybe_spawn<R: RandomSource>(
        &mut self,
        free_slot: Option<usize>,
        track: &TrackGeometry,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> Option<usize> {
        if !self.schedule.is_due() {
            return None;
        }
        self.schedule
            .consume(tuning.spawn_interval_step, tuning.spawn_interval_floor);

        let mut slot = rng.slot(self.capacity());
        if self.slots[slot].active {
            let fallback = free_slot.filter(|&i| self.slots.get(i).is_some_and(|o| !o.active));
            let Some(free) = fallback else {
                log::error!(
                    "Spawner found no free slot with {} of {} active",
                    self.schedule.active_count,
                    self.capacity()
                );
                panic!("obstacle pool invariant violated: no free slot to spawn into");
            };
            slot = free;
        }

        self.schedule.active_count += 1;
        let lateral = rng.unit();
        let heading = rng.unit();
        let obstacle = &mut self.slots[slot];
        obstacle.active = true;
        obstacle.position = track.spawn_point(lateral, obstacle.depth);
        obstacle.rotation = Quat::from_axis_angle(axis::VERTICAL, TAU * heading);

        log::debug!(
            "Spawned {:?} in slot {} (interval now {:.2})",
            obstacle.kind,
            slot,
            self.schedule.interval
        );
        events.push(SimEvent::Spawned {
            slot,
            kind: obstacle.kind,
        });
        Some(slot)
    }
}
