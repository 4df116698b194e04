//! Scene anchor discovery
//!
//! Looks up everything the simulation needs from the host scene by name and
//! checks it is all there before a run can start.

use super::pool::ObstacleKind;
use super::track::TrackGeometry;
use crate::consts::POOL_CAPACITY;
use crate::error::SetupError;
use crate::scene::{Scene, TransformId};
use crate::tuning::Tuning;

/// Everything found in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAnchors {
    pub actor: TransformId,
    pub camera: TransformId,
    pub track: TrackGeometry,
    /// Obstacle transforms in scene order; index is the pool slot
    pub obstacles: Vec<(TransformId, ObstacleKind)>,
}

impl SceneAnchors {
    pub fn discover(scene: &Scene, tuning: &Tuning) -> Result<Self, SetupError> {
        let names = &tuning.anchors;
        let lookup = |role: &'static str, name: &str| {
            scene
                .find(name)
                .and_then(|id| scene.position(id).map(|p| (id, p)))
                .ok_or_else(|| SetupError::MissingAnchor {
                    role,
                    name: name.to_string(),
                })
        };

        let (actor, _) = lookup("actor", &names.actor)?;
        let (_, right) = lookup("right range", &names.range_right)?;
        let (_, left) = lookup("left range", &names.range_left)?;
        let (_, despawn) = lookup("despawn", &names.despawn)?;

        let obstacles: Vec<(TransformId, ObstacleKind)> = scene
            .transforms
            .iter()
            .enumerate()
            .filter_map(|(id, t)| {
                if t.name.starts_with(&tuning.tree.prefix) {
                    Some((id, ObstacleKind::Tree))
                } else if t.name.starts_with(&tuning.rock.prefix) {
                    Some((id, ObstacleKind::Rock))
                } else {
                    None
                }
            })
            .collect();

        if obstacles.len() != POOL_CAPACITY {
            return Err(SetupError::ObstacleCount {
                expected: POOL_CAPACITY,
                found: obstacles.len(),
            });
        }
        for kind in [ObstacleKind::Tree, ObstacleKind::Rock] {
            let expected = tuning.kind(kind).count;
            let found = obstacles.iter().filter(|(_, k)| *k == kind).count();
            if found != expected {
                return Err(SetupError::KindSplit {
                    kind,
                    expected,
                    found,
                });
            }
        }

        let track = TrackGeometry::from_anchors(right, left, despawn)?;
        track.steer_bounds(tuning.lateral_margin)?;

        if scene.cameras.len() != 1 {
            return Err(SetupError::CameraCount(scene.cameras.len()));
        }
        let camera = scene.cameras[0].transform;
        if scene.get(camera).is_none() {
            return Err(SetupError::DanglingCamera(camera));
        }

        Ok(Self {
            actor,
            camera,
            track,
            obstacles,
        })
    }
}
