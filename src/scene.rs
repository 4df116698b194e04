//! Host scene interface
//!
//! The scene graph, meshes and drawing belong to the host. The simulation only
//! needs a flat list of named transforms it can look anchors up in and write
//! positions back to, plus the camera.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Index of a transform in [`Scene::transforms`]
pub type TransformId = usize;

/// A named placement in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// A camera attached to one of the scene's transforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub transform: TransformId,
}

/// Flat scene: transforms plus cameras referencing them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub transforms: Vec<Transform>,
    pub cameras: Vec<Camera>,
}

impl Scene {
    /// Add a transform, returning its id
    pub fn add(&mut self, transform: Transform) -> TransformId {
        self.transforms.push(transform);
        self.transforms.len() - 1
    }

    /// Add a camera looking from a new transform
    pub fn add_camera(&mut self, name: impl Into<String>, position: Vec3) -> TransformId {
        let id = self.add(Transform::new(name, position));
        self.cameras.push(Camera { transform: id });
        id
    }

    /// First transform with exactly this name
    pub fn find(&self, name: &str) -> Option<TransformId> {
        self.transforms.iter().position(|t| t.name == name)
    }

    pub fn get(&self, id: TransformId) -> Option<&Transform> {
        self.transforms.get(id)
    }

    pub fn position(&self, id: TransformId) -> Option<Vec3> {
        self.transforms.get(id).map(|t| t.position)
    }

    /// Write a placement back into the scene; unknown ids are ignored
    pub fn set(&mut self, id: TransformId, position: Vec3, rotation: Quat) {
        if let Some(t) = self.transforms.get_mut(id) {
            t.position = position;
            t.rotation = rotation;
        }
    }

    /// The demo track: lateral range [-20, 20] on Y, obstacles running from
    /// x = 200 down to x = -200, the actor sitting at the origin and six of
    /// each obstacle kind parked off-track
    pub fn demo() -> Self {
        Self::demo_track(Vec3::new(200.0, -20.0, 0.0), Vec3::new(-200.0, 0.0, 0.0), 20.0)
    }

    /// A track with the default anchor names. `spawn` is the right-hand range
    /// anchor; the left anchor mirrors it at `left_lateral`.
    pub fn demo_track(spawn: Vec3, despawn: Vec3, left_lateral: f32) -> Self {
        let mut scene = Scene::default();
        scene.add(Transform::new("Hamster", Vec3::ZERO));
        scene.add(Transform::new("StartPointsRight", spawn));
        scene.add(Transform::new(
            "StartPointsLeft",
            Vec3::new(spawn.x, left_lateral, spawn.z),
        ));
        scene.add(Transform::new("EndPoint", despawn));
        for i in 0..6 {
            scene.add(Transform::new(format!("TreeT.{i:03}"), despawn));
            scene.add(Transform::new(format!("Rock.{i:03}"), despawn));
        }
        scene.add_camera("Camera", Vec3::new(-60.0, 0.0, 30.0));
        scene
    }
}
