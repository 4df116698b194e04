//! Presentation snapshot
//!
//! The renderer never reads simulation internals. After a tick it takes a
//! `Frame`: score, phase, the blended background color and the placements
//! it needs to draw, plus the HUD text to overlay.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::sim::{ObstacleKind, RandomSource, RunPhase, RunState, Simulation};
use crate::tuning::Tuning;

/// Where an obstacle should be drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub slot: usize,
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub rotation: Quat,
}

/// A line of HUD text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudLine {
    pub text: String,
    /// Headline size (death screen) vs. regular
    pub large: bool,
}

impl HudLine {
    fn new(text: impl Into<String>, large: bool) -> Self {
        Self {
            text: text.into(),
            large,
        }
    }
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub score: u32,
    pub phase: RunPhase,
    pub difficulty: f32,
    /// Clear / fog color
    pub background: Vec3,
    pub actor_position: Vec3,
    pub actor_rotation: Quat,
    pub camera_position: Vec3,
    /// Active obstacles only
    pub obstacles: Vec<ObstacleView>,
    pub hud: Vec<HudLine>,
}

impl Frame {
    /// Snapshot a simulation between ticks
    pub fn capture<R: RandomSource>(sim: &Simulation<R>) -> Self {
        let run = sim.run();
        Self {
            score: run.score,
            phase: run.phase,
            difficulty: run.difficulty,
            background: background_color(sim.tuning(), run),
            actor_position: sim.actor().position,
            actor_rotation: sim.actor().rotation,
            camera_position: sim.camera_position(),
            obstacles: sim
                .pool()
                .active()
                .map(|o| ObstacleView {
                    slot: o.slot,
                    kind: o.kind,
                    position: o.position,
                    rotation: o.rotation,
                })
                .collect(),
            hud: hud_lines(run),
        }
    }
}

/// Fog drifts from the start color toward the end color as difficulty climbs;
/// a dead run shows the end color outright
pub fn background_color(tuning: &Tuning, run: &RunState) -> Vec3 {
    if run.is_dead() {
        return tuning.fog_end_color;
    }
    let t = if tuning.fog_ramp > 0.0 {
        (run.difficulty - tuning.baseline_difficulty).clamp(0.0, tuning.fog_ramp) / tuning.fog_ramp
    } else {
        1.0
    };
    tuning.fog_start_color.lerp(tuning.fog_end_color, t)
}

/// HUD overlay for the current phase
pub fn hud_lines(run: &RunState) -> Vec<HudLine> {
    match run.phase {
        RunPhase::Playing => vec![
            HudLine::new("A/D to move, Space to jump", false),
            HudLine::new(format!("Score: {}", run.score), false),
        ],
        RunPhase::Dead => vec![
            HudLine::new("DEAD HAMSTER", true),
            HudLine::new(format!("Score: {}", run.score), true),
            HudLine::new("Press 'r' to restart", true),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::InputState;
    use crate::scene::Scene;

    #[test]
    fn test_background_blend() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1.0);
        assert_eq!(background_color(&tuning, &run), tuning.fog_start_color);

        run.difficulty = 6.0;
        let mid = background_color(&tuning, &run);
        assert!((mid - Vec3::new(0.7, 0.65, 0.75)).length() < 1e-5);

        run.difficulty = 50.0;
        assert_eq!(background_color(&tuning, &run), tuning.fog_end_color);

        run.difficulty = 1.0;
        run.phase = RunPhase::Dead;
        assert_eq!(background_color(&tuning, &run), tuning.fog_end_color);
    }

    #[test]
    fn test_hud_by_phase() {
        let mut run = RunState::new(1.0);
        run.score = 42;
        let playing = hud_lines(&run);
        assert!(playing.iter().any(|l| l.text == "Score: 42"));
        assert!(playing.iter().all(|l| !l.large));

        run.phase = RunPhase::Dead;
        let dead = hud_lines(&run);
        assert_eq!(dead[0].text, "DEAD HAMSTER");
        assert!(dead.iter().any(|l| l.text.contains("restart")));
    }

    #[test]
    fn test_capture_lists_active_obstacles() {
        let mut sim = Simulation::new(Scene::demo(), Tuning::default(), 8).unwrap();
        let mut input = InputState::default();
        assert!(sim.place_obstacle(2, glam::Vec3::new(150.0, 5.0, 0.0)));
        sim.tick(&mut input, 0.0);

        let frame = Frame::capture(&sim);
        assert_eq!(frame.phase, RunPhase::Playing);
        assert_eq!(frame.obstacles.len(), 1);
        assert_eq!(frame.obstacles[0].slot, 2);
        assert_eq!(frame.obstacles[0].kind, ObstacleKind::Tree);

        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
