//! Frame orchestration
//!
//! One `tick` advances every subsystem in a fixed order. The order matters:
//! the run clock moves first so obstacle speed uses this tick's difficulty,
//! obstacles move (and are collision-tested) before the actor steers, and the
//! per-tick press counters are cleared last.

use glam::Vec3;

use super::actor::Actor;
use super::pool::{Obstacle, ObstaclePool};
use super::rng::{RandomSource, SeededRng};
use super::setup::SceneAnchors;
use super::state::{RunPhase, RunState, SimEvent};
use super::track::TrackGeometry;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::SetupError;
use crate::platform::InputState;
use crate::scene::{Scene, TransformId};
use crate::tuning::Tuning;

/// The camera's link to the scene and where it started
#[derive(Debug, Clone)]
struct CameraRig {
    transform: TransformId,
    origin: Vec3,
    position: Vec3,
}

/// The simulation core: owns the run, the actor, the obstacle pool and a
/// local copy of the host scene that it writes placements back into
#[derive(Debug, Clone)]
pub struct Simulation<R: RandomSource = SeededRng> {
    tuning: Tuning,
    scene: Scene,
    track: TrackGeometry,
    actor: Actor,
    actor_transform: TransformId,
    /// Lateral clamp for the actor, validated at construction
    steer_bounds: (f32, f32),
    pool: ObstaclePool,
    run: RunState,
    camera: CameraRig,
    rng: R,
    events: Vec<SimEvent>,
    time_ticks: u64,
}

impl Simulation<SeededRng> {
    /// Build a run over `scene` with a PCG generator seeded from `seed`
    pub fn new(scene: Scene, tuning: Tuning, seed: u64) -> Result<Self, SetupError> {
        Self::with_rng(scene, tuning, SeededRng::new(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    /// Build a run over `scene` drawing randomness from `rng`
    pub fn with_rng(scene: Scene, tuning: Tuning, rng: R) -> Result<Self, SetupError> {
        tuning.validate()?;
        let anchors = SceneAnchors::discover(&scene, &tuning)?;
        let steer_bounds = anchors.track.steer_bounds(tuning.lateral_margin)?;

        let base = scene.position(anchors.actor).unwrap_or_default();
        let camera_origin = scene.position(anchors.camera).unwrap_or_default();
        let slots = anchors
            .obstacles
            .iter()
            .enumerate()
            .map(|(slot, &(transform, kind))| Obstacle::new(slot, transform, kind, &tuning))
            .collect();

        let mut sim = Self {
            actor: Actor::new(base, tuning.actor_radius),
            actor_transform: anchors.actor,
            steer_bounds,
            pool: ObstaclePool::new(slots, tuning.spawn_interval_start),
            run: RunState::new(tuning.baseline_difficulty),
            camera: CameraRig {
                transform: anchors.camera,
                origin: camera_origin,
                position: camera_origin,
            },
            track: anchors.track,
            tuning,
            scene,
            rng,
            events: Vec::new(),
            time_ticks: 0,
        };
        sim.pool
            .reset(sim.track.despawn, sim.tuning.spawn_interval_start);
        sim.sync_scene();

        log::info!(
            "Simulation ready: {} obstacle slots, lateral range [{}, {}]",
            sim.pool.capacity(),
            sim.track.lateral_range.x,
            sim.track.lateral_range.y
        );
        Ok(sim)
    }

    /// Advance one tick of `dt` time units.
    ///
    /// Always clears the input's press counters, even when the run is dead or
    /// the tick was spent on a reset. Returns what happened this tick.
    pub fn tick(&mut self, input: &mut InputState, dt: f32) -> &[SimEvent] {
        self.events.clear();
        self.step(input, dt);
        input.end_tick();
        self.sync_scene();
        &self.events
    }

    fn step(&mut self, input: &InputState, dt: f32) {
        // 1. Reset short-circuits the whole tick
        if input.reset.pressed {
            self.reset();
            return;
        }

        // 2. Nothing moves while dead
        if self.run.is_dead() {
            return;
        }

        self.time_ticks += 1;

        // 3. Run clock: progress, score, difficulty
        if self.run.advance(dt, self.tuning.difficulty_ramp) > 0 {
            self.events.push(SimEvent::Scored {
                score: self.run.score,
            });
        }

        // 4. Obstacles: move, sweep-test, despawn, then maybe spawn
        let travel =
            dt * self.run.difficulty * self.actor.radius * self.tuning.travel_rate;
        let advance = self.pool.advance(
            dt,
            self.track.direction * travel,
            self.actor.position,
            self.actor.radius,
            &self.track,
            &mut self.events,
        );
        if let Some(slot) = advance.contact {
            self.run.phase = RunPhase::Dead;
            log::info!(
                "Actor hit by obstacle {} after {} ticks, score {}",
                slot,
                self.time_ticks,
                self.run.score
            );
            self.events.push(SimEvent::Died {
                slot,
                score: self.run.score,
            });
        }
        self.pool.maybe_spawn(
            advance.free_slot,
            &self.track,
            &self.tuning,
            &mut self.rng,
            &mut self.events,
        );

        // 5. Actor: steer (camera follows), pose, jump
        let intent = input.steer();
        let distance = dt * self.run.difficulty * self.tuning.lateral_speed;
        let moved = self.actor.steer(intent, distance, self.steer_bounds);
        self.camera.position.y += moved;
        self.actor.pose(intent, self.run.progress);

        if input.jump.went_down() && self.actor.start_jump() {
            self.events.push(SimEvent::Jumped);
        }
        self.actor.advance_jump(dt, self.tuning.jump_height);
    }

    /// Return run, actor, obstacles and camera to their start-of-run state.
    /// The scene itself is kept.
    pub fn reset(&mut self) {
        self.run = RunState::new(self.tuning.baseline_difficulty);
        self.actor.reset();
        self.pool
            .reset(self.track.despawn, self.tuning.spawn_interval_start);
        self.camera.position = self.camera.origin;
        self.time_ticks = 0;
        self.events.push(SimEvent::Reset);
        log::info!("Run reset");
    }

    /// Restart the random sequence, for replays
    pub fn reseed(&mut self, seed: u64) {
        self.rng.reseed(seed);
    }

    /// Force an obstacle into play at `position`. Returns false if the slot
    /// doesn't exist or the pool is at its active cap.
    pub fn place_obstacle(&mut self, slot: usize, position: Vec3) -> bool {
        let placed = self.pool.place(slot, position);
        if placed {
            self.sync_scene();
        }
        placed
    }

    /// Hand this tick's placements to the scene for the renderer
    fn sync_scene(&mut self) {
        self.scene
            .set(self.actor_transform, self.actor.position, self.actor.rotation);
        for obstacle in self.pool.slots() {
            self.scene
                .set(obstacle.transform, obstacle.position, obstacle.rotation);
        }
        if let Some(camera) = self.scene.transforms.get_mut(self.camera.transform) {
            camera.position = self.camera.position;
        }
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn phase(&self) -> RunPhase {
        self.run.phase
    }

    pub fn score(&self) -> u32 {
        self.run.score
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn pool(&self) -> &ObstaclePool {
        &self.pool
    }

    pub fn track(&self) -> &TrackGeometry {
        &self.track
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// The scene as of the end of the last tick
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Events from the last tick
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera.position
    }

    /// Ticks simulated since the run started
    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }
}

/// Fixed timestep driver for hosts that see variable frame times
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    /// Run as many `SIM_DT` ticks as `frame_dt` covers, capped at
    /// `MAX_SUBSTEPS`. Returns the number of ticks run.
    pub fn advance<R: RandomSource>(
        &mut self,
        sim: &mut Simulation<R>,
        input: &mut InputState,
        frame_dt: f32,
    ) -> u32 {
        // Long stalls (tab switch, debugger) are dropped rather than replayed
        self.accumulator += frame_dt.clamp(0.0, 0.25);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim.tick(input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_ACTIVE_OBSTACLES, POOL_CAPACITY};
    use crate::sim::actor::JumpState;
    use crate::sim::rng::ScriptedRng;
    use proptest::prelude::*;

    fn sim(seed: u64) -> Simulation {
        Simulation::new(Scene::demo(), Tuning::default(), seed).unwrap()
    }

    /// A track long enough that nothing spawned in the first couple of
    /// time units can reach the actor
    fn long_track_sim(seed: u64) -> Simulation {
        let scene = Scene::demo_track(
            Vec3::new(2000.0, -20.0, 0.0),
            Vec3::new(-200.0, 0.0, 0.0),
            20.0,
        );
        Simulation::new(scene, Tuning::default(), seed).unwrap()
    }

    fn run_for(sim: &mut Simulation, input: &mut InputState, time: f32) {
        let ticks = (time / SIM_DT).round() as usize;
        for _ in 0..ticks {
            sim.tick(input, SIM_DT);
        }
    }

    #[test]
    fn test_starts_clean() {
        let sim = sim(1);
        assert_eq!(sim.phase(), RunPhase::Playing);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.pool().capacity(), POOL_CAPACITY);
        assert_eq!(sim.pool().active_count(), 0);
        // Obstacles parked at the despawn anchor in the scene too
        let despawn = sim.track().despawn;
        for o in sim.pool().slots() {
            assert_eq!(sim.scene().position(o.transform), Some(despawn));
        }
    }

    #[test]
    fn test_setup_errors_propagate() {
        let mut scene = Scene::demo();
        scene.cameras.clear();
        assert!(matches!(
            Simulation::new(scene, Tuning::default(), 0),
            Err(SetupError::CameraCount(0))
        ));

        let tuning = Tuning {
            actor_radius: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Simulation::new(Scene::demo(), tuning, 0),
            Err(SetupError::Tuning(_))
        ));
    }

    #[test]
    fn test_two_time_units_without_input() {
        let mut sim = long_track_sim(7);
        let mut input = InputState::default();
        run_for(&mut sim, &mut input, 2.0);

        assert!(sim.score() >= 1);
        assert_eq!(sim.phase(), RunPhase::Playing);
        assert!(sim.pool().active_count() >= 1, "an obstacle has spawned");
    }

    #[test]
    fn test_obstacle_on_actor_kills() {
        let mut sim = sim(3);
        let mut input = InputState::default();
        let at = sim.actor().position;
        assert!(sim.place_obstacle(1, at));

        // Zero-length tick: no displacement at all
        let events = sim.tick(&mut input, 0.0).to_vec();
        assert_eq!(sim.phase(), RunPhase::Dead);
        assert!(events.contains(&SimEvent::Died { slot: 1, score: 0 }));
    }

    #[test]
    fn test_dead_run_is_frozen() {
        let mut sim = sim(3);
        let mut input = InputState::default();
        let at = sim.actor().position;
        sim.place_obstacle(0, at);
        sim.tick(&mut input, SIM_DT);
        assert_eq!(sim.phase(), RunPhase::Dead);

        let run = sim.run().clone();
        let obstacle = sim.pool().get(0).unwrap().position;
        input.handle_key("a", true);
        input.handle_key(" ", true);
        for _ in 0..30 {
            assert!(sim.tick(&mut input, SIM_DT).is_empty());
        }
        assert_eq!(sim.run(), &run);
        assert_eq!(sim.pool().get(0).unwrap().position, obstacle);
        assert_eq!(sim.actor().jump, JumpState::Grounded);
        // Press counters still cleared
        assert_eq!(input.jump.downs, 0);
    }

    #[test]
    fn test_reset_restores_start_of_run() {
        let mut sim = sim(11);
        let mut input = InputState::default();
        input.handle_key("a", true);
        run_for(&mut sim, &mut input, 1.5);
        input.handle_key("a", false);

        let at = sim.actor().position;
        sim.place_obstacle(5, at);
        sim.tick(&mut input, SIM_DT);
        assert_eq!(sim.phase(), RunPhase::Dead);

        input.handle_key("r", true);
        let events = sim.tick(&mut input, SIM_DT).to_vec();
        assert_eq!(events, vec![SimEvent::Reset]);

        // Held reset keeps resetting: idempotent
        sim.tick(&mut input, SIM_DT);
        input.handle_key("r", false);

        assert_eq!(sim.phase(), RunPhase::Playing);
        assert_eq!(sim.score(), 0);
        assert_eq!(sim.run().difficulty, sim.tuning().baseline_difficulty);
        assert_eq!(sim.pool().active_count(), 0);
        assert!(sim.pool().slots().iter().all(|o| !o.active));
        assert_eq!(sim.actor().position, sim.actor().base_position);
        assert_eq!(sim.pool().schedule().interval, sim.tuning().spawn_interval_start);
        let camera = sim.scene().cameras[0].transform;
        assert_eq!(sim.scene().position(camera), Some(Vec3::new(-60.0, 0.0, 30.0)));
    }

    #[test]
    fn test_steering_moves_camera_with_actor() {
        let mut sim = long_track_sim(2);
        let mut input = InputState::default();
        let camera_start = sim.camera_position();
        input.handle_key("a", true);
        run_for(&mut sim, &mut input, 0.25);

        let moved = sim.actor().position.y - sim.actor().base_position.y;
        assert!(moved > 0.0);
        assert!((sim.camera_position().y - camera_start.y - moved).abs() < 1e-4);

        // Holding long enough pins the actor at the margin
        run_for(&mut sim, &mut input, 3.0);
        assert_eq!(sim.actor().position.y, 10.0);
        assert!((sim.camera_position().y - camera_start.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut sim = long_track_sim(4);
        let mut input = InputState::default();
        input.handle_key(" ", true);
        let events = sim.tick(&mut input, SIM_DT).to_vec();
        assert!(events.contains(&SimEvent::Jumped));

        // Held, then pressed again mid-air: arc keeps going
        run_for(&mut sim, &mut input, 0.25);
        let before = sim.actor().jump_elapsed().unwrap();
        input.handle_key(" ", true);
        let events = sim.tick(&mut input, SIM_DT).to_vec();
        assert!(!events.contains(&SimEvent::Jumped));
        let after = sim.actor().jump_elapsed().unwrap();
        assert!(after > before);
        assert!(sim.actor().position.z > sim.actor().base_position.z);

        // Still held after landing: no automatic second jump
        run_for(&mut sim, &mut input, 1.0);
        assert_eq!(sim.actor().jump, JumpState::Grounded);
        assert_eq!(sim.actor().position.z, sim.actor().base_position.z);
    }

    #[test]
    fn test_scene_receives_placements() {
        let mut sim = long_track_sim(5);
        let mut input = InputState::default();
        input.handle_key("d", true);
        run_for(&mut sim, &mut input, 1.5);

        let actor_id = sim.scene().find("Hamster").unwrap();
        assert_eq!(sim.scene().position(actor_id), Some(sim.actor().position));
        for o in sim.pool().active() {
            let t = sim.scene().get(o.transform).unwrap();
            assert_eq!(t.position, o.position);
            assert_eq!(t.rotation, o.rotation);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = sim(99);
        let mut b = sim(99);
        let mut input_a = InputState::default();
        let mut input_b = InputState::default();
        for i in 0..600 {
            if i % 90 == 0 {
                input_a.handle_key("a", i % 180 == 0);
                input_b.handle_key("a", i % 180 == 0);
            }
            let ea = a.tick(&mut input_a, SIM_DT).to_vec();
            let eb = b.tick(&mut input_b, SIM_DT).to_vec();
            assert_eq!(ea, eb);
        }
        assert_eq!(a.score(), b.score());
        assert_eq!(a.phase(), b.phase());
    }

    #[test]
    fn test_reseed_mid_run_replays_spawns() {
        let mut a = sim(1);
        let mut b = sim(2);
        let mut fresh = sim(42);
        let mut input = InputState::default();

        // Half a time unit: nothing has spawned, so only the generators differ
        for _ in 0..30 {
            a.tick(&mut input, SIM_DT);
            b.tick(&mut input, SIM_DT);
            fresh.tick(&mut input, SIM_DT);
        }
        assert_eq!(a.pool().active_count(), 0);
        a.reseed(42);
        b.reseed(42);

        let mut spawns = 0;
        for i in 0..900 {
            input.handle_key("d", i % 120 < 40);
            let ea = a.tick(&mut input.clone(), SIM_DT).to_vec();
            let eb = b.tick(&mut input.clone(), SIM_DT).to_vec();
            let ef = fresh.tick(&mut input, SIM_DT).to_vec();
            assert_eq!(ea, eb);
            assert_eq!(ea, ef);
            spawns += ea
                .iter()
                .filter(|e| matches!(e, SimEvent::Spawned { .. }))
                .count();
        }
        assert!(spawns > 0);
        assert_eq!(a.score(), fresh.score());
    }

    #[test]
    fn test_spawn_collision_uses_free_slot() {
        // Both spawns land at the far edge of the track, clear of the actor
        let rng = ScriptedRng::new(&[0, 0], &[0.0, 0.0, 0.0, 0.0]);
        let mut sim = Simulation::with_rng(Scene::demo(), Tuning::default(), rng).unwrap();
        let mut input = InputState::default();
        let mut spawned = Vec::new();
        for _ in 0..200 {
            for event in sim.tick(&mut input, SIM_DT) {
                if let SimEvent::Spawned { slot, .. } = event {
                    spawned.push(*slot);
                }
            }
            if spawned.len() == 2 {
                break;
            }
        }
        // Both draws were slot 0; the second fell back to the last free slot
        assert_eq!(spawned, vec![0, POOL_CAPACITY - 1]);
    }

    #[test]
    fn test_frame_clock_substeps() {
        let mut sim = long_track_sim(6);
        let mut input = InputState::default();
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(&mut sim, &mut input, SIM_DT * 2.5), 2);
        assert_eq!(sim.time_ticks(), 2);
        // Leftover half step carries into the next frame
        assert_eq!(clock.advance(&mut sim, &mut input, SIM_DT * 0.6), 1);
        // Huge frame times are capped
        assert_eq!(clock.advance(&mut sim, &mut input, 10.0), MAX_SUBSTEPS);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Idle,
        Left,
        Right,
        Jump,
        Reset,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            6 => Just(Action::Idle),
            2 => Just(Action::Left),
            2 => Just(Action::Right),
            1 => Just(Action::Jump),
            1 => Just(Action::Reset),
        ]
    }

    fn apply(input: &mut InputState, action: &Action) {
        *input = InputState::default();
        match action {
            Action::Idle => {}
            Action::Left => {
                input.handle_key("a", true);
            }
            Action::Right => {
                input.handle_key("d", true);
            }
            Action::Jump => {
                input.handle_key(" ", true);
            }
            Action::Reset => {
                input.handle_key("r", true);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_pool_and_interval_invariants(
            seed in any::<u64>(),
            actions in prop::collection::vec((action(), 1usize..40), 1..40),
        ) {
            let mut sim = sim(seed);
            let mut input = InputState::default();
            let floor = sim.tuning().spawn_interval_floor;
            let mut last_interval = sim.pool().schedule().interval;

            for (action, ticks) in &actions {
                apply(&mut input, action);
                for _ in 0..*ticks {
                    sim.tick(&mut input, SIM_DT);

                    let active = sim.pool().slots().iter().filter(|o| o.active).count();
                    prop_assert_eq!(active, sim.pool().active_count());
                    prop_assert!(active <= MAX_ACTIVE_OBSTACLES);

                    let interval = sim.pool().schedule().interval;
                    prop_assert!(interval >= floor);
                    if sim.events().contains(&SimEvent::Reset) {
                        prop_assert_eq!(interval, sim.tuning().spawn_interval_start);
                    } else {
                        prop_assert!(interval <= last_interval);
                    }
                    last_interval = interval;
                }
            }

            // Any sequence ending in a reset lands on a clean start
            apply(&mut input, &Action::Reset);
            sim.tick(&mut input, SIM_DT);
            prop_assert_eq!(sim.phase(), RunPhase::Playing);
            prop_assert_eq!(sim.score(), 0);
            prop_assert_eq!(sim.pool().active_count(), 0);
            prop_assert_eq!(sim.actor().position, sim.actor().base_position);
        }
    }
}
