//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be re-balanced
//! from a JSON file without touching code. Missing fields fall back to the
//! shipped defaults.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::POOL_CAPACITY;
use crate::error::SetupError;
use crate::sim::ObstacleKind;

/// Per-kind obstacle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTuning {
    /// Scene transforms whose name starts with this belong to the kind
    pub prefix: String,
    /// How many of the pool's slots are this kind
    pub count: usize,
    /// Collision radius
    pub radius: f32,
    /// Vertical offset at spawn; half of it shifts the collision probe
    pub depth: f32,
}

/// Names of the anchor transforms the simulation looks up in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorNames {
    pub actor: String,
    /// Spawn anchor and one end of the lateral range
    pub range_right: String,
    /// Other end of the lateral range
    pub range_left: String,
    pub despawn: String,
}

impl Default for AnchorNames {
    fn default() -> Self {
        Self {
            actor: "Hamster".to_string(),
            range_right: "StartPointsRight".to_string(),
            range_left: "StartPointsLeft".to_string(),
            despawn: "EndPoint".to_string(),
        }
    }
}

/// Game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run ===
    /// Difficulty at the start of every run
    pub baseline_difficulty: f32,
    /// Difficulty gained per time unit
    pub difficulty_ramp: f32,

    // === Actor ===
    pub actor_radius: f32,
    /// Lateral units per time unit at difficulty 1
    pub lateral_speed: f32,
    /// Keep-out band inside each end of the lateral range
    pub lateral_margin: f32,
    /// Peak of the jump arc
    pub jump_height: f32,

    // === Obstacles ===
    /// Obstacle travel per time unit, per unit of difficulty and actor radius
    pub travel_rate: f32,
    pub spawn_interval_start: f32,
    /// Interval reduction per spawn
    pub spawn_interval_step: f32,
    pub spawn_interval_floor: f32,
    pub tree: KindTuning,
    pub rock: KindTuning,

    // === Scene ===
    pub anchors: AnchorNames,

    // === Presentation ===
    pub fog_start_color: Vec3,
    pub fog_end_color: Vec3,
    /// Difficulty above baseline at which the fog is fully blended
    pub fog_ramp: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            baseline_difficulty: 1.0,
            difficulty_ramp: 0.2,

            actor_radius: 5.0,
            lateral_speed: 15.0,
            lateral_margin: 10.0,
            jump_height: 10.0,

            travel_rate: 30.0,
            spawn_interval_start: 1.0,
            spawn_interval_step: 0.05,
            spawn_interval_floor: 0.2,
            tree: KindTuning {
                prefix: "TreeT".to_string(),
                count: 6,
                radius: 1.5,
                depth: 2.0,
            },
            rock: KindTuning {
                prefix: "Rock".to_string(),
                count: 6,
                radius: 7.0,
                depth: 2.5,
            },

            anchors: AnchorNames::default(),

            fog_start_color: Vec3::new(0.6, 0.8, 1.0),
            fog_end_color: Vec3::new(0.8, 0.5, 0.5),
            fog_ramp: 10.0,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning ({} + {} obstacles)", tuning.tree.count, tuning.rock.count);
        Ok(tuning)
    }

    /// Parameters for one obstacle kind
    pub fn kind(&self, kind: ObstacleKind) -> &KindTuning {
        match kind {
            ObstacleKind::Tree => &self.tree,
            ObstacleKind::Rock => &self.rock,
        }
    }

    /// Check every value a simulation depends on
    pub fn validate(&self) -> Result<(), SetupError> {
        let total = self.tree.count + self.rock.count;
        if total != POOL_CAPACITY {
            return Err(SetupError::Tuning(format!(
                "kind split {} + {} does not fill the pool of {}",
                self.tree.count, self.rock.count, POOL_CAPACITY
            )));
        }
        for kind in [ObstacleKind::Tree, ObstacleKind::Rock] {
            let k = self.kind(kind);
            if k.prefix.is_empty() {
                return Err(SetupError::Tuning(format!("{kind:?} prefix is empty")));
            }
            if !(k.radius > 0.0) || !k.depth.is_finite() {
                return Err(SetupError::Tuning(format!(
                    "{kind:?} needs a positive radius and finite depth"
                )));
            }
        }
        if self.tree.prefix.starts_with(&self.rock.prefix)
            || self.rock.prefix.starts_with(&self.tree.prefix)
        {
            return Err(SetupError::Tuning("kind prefixes overlap".to_string()));
        }
        if !(self.actor_radius > 0.0) {
            return Err(SetupError::Tuning("actor radius must be positive".to_string()));
        }
        if !(self.spawn_interval_floor > 0.0)
            || self.spawn_interval_floor > self.spawn_interval_start
            || !(self.spawn_interval_step >= 0.0)
        {
            return Err(SetupError::Tuning(
                "spawn interval needs 0 < floor <= start and a non-negative step".to_string(),
            ));
        }
        let non_negative = [
            ("baseline_difficulty", self.baseline_difficulty),
            ("difficulty_ramp", self.difficulty_ramp),
            ("lateral_speed", self.lateral_speed),
            ("lateral_margin", self.lateral_margin),
            ("jump_height", self.jump_height),
            ("travel_rate", self.travel_rate),
            ("fog_ramp", self.fog_ramp),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(SetupError::Tuning(format!("{name} must be finite and >= 0")));
            }
        }
        Ok(())
    }
}
