// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene data the projector reads from.
//!
//! Objects carry a transform and a kind. Cameras hold their lens data in a
//! separate block with its own identity, which is what live bindings point
//! at.

use camera_projector_graph::operation::{rotate_about_axis, RotationAxis};
use camera_projector_graph::{ParameterSource, SourceId, SourceResolver};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Object transform
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    /// Position (x, y, z)
    pub position: [f32; 3],
    /// Rotation in XYZ euler angles (degrees)
    pub rotation: [f32; 3],
    /// Scale
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Transform at a position with no rotation
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation in degrees
    pub fn with_rotation(mut self, rotation: [f32; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Map a local point into world space
    pub fn local_to_world(&self, local: [f32; 3]) -> [f32; 3] {
        let [rx, ry, rz] = self.rotation.map(f32::to_radians);
        let scaled = std::array::from_fn(|i| local[i] * self.scale[i]);
        let rotated = rotate_about_axis(scaled, [0.0; 3], RotationAxis::X, rx);
        let rotated = rotate_about_axis(rotated, [0.0; 3], RotationAxis::Y, ry);
        let rotated = rotate_about_axis(rotated, [0.0; 3], RotationAxis::Z, rz);
        std::array::from_fn(|i| rotated[i] + self.position[i])
    }

    /// Map a world point into local space, `None` for a zero scale
    pub fn world_to_local(&self, world: [f32; 3]) -> Option<[f32; 3]> {
        if self.scale.iter().any(|s| *s == 0.0) {
            return None;
        }
        let [rx, ry, rz] = self.rotation.map(f32::to_radians);
        let offset = std::array::from_fn(|i| world[i] - self.position[i]);
        let rotated = rotate_about_axis(offset, [0.0; 3], RotationAxis::Z, -rz);
        let rotated = rotate_about_axis(rotated, [0.0; 3], RotationAxis::Y, -ry);
        let rotated = rotate_about_axis(rotated, [0.0; 3], RotationAxis::X, -rx);
        Some(std::array::from_fn(|i| rotated[i] / self.scale[i]))
    }
}

/// Lens data of a camera
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraData {
    /// Identity of this data block
    pub id: SourceId,
    /// Focal length in millimeters
    pub lens: f32,
    /// Sensor width in millimeters
    pub sensor_width: f32,
    /// Horizontal lens shift
    pub shift_x: f32,
    /// Vertical lens shift
    pub shift_y: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            id: SourceId::new(),
            lens: 50.0,
            sensor_width: 36.0,
            shift_x: 0.0,
            shift_y: 0.0,
        }
    }
}

impl CameraData {
    /// Read an attribute by name
    pub fn attribute(&self, path: &str) -> Option<f32> {
        match path {
            "lens" => Some(self.lens),
            "sensor_width" => Some(self.sensor_width),
            "shift_x" => Some(self.shift_x),
            "shift_y" => Some(self.shift_y),
            _ => None,
        }
    }
}

/// What an object is
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ObjectKind {
    /// Perspective camera
    Camera(CameraData),
    /// Mesh geometry
    Mesh,
    /// Empty transform
    Empty,
}

impl ObjectKind {
    /// Display name of the kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectKind::Camera(_) => "Camera",
            ObjectKind::Mesh => "Mesh",
            ObjectKind::Empty => "Empty",
        }
    }
}

/// An object in the scene
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneObject {
    /// Object identity
    pub id: SourceId,
    /// Object name
    pub name: String,
    /// Object transform
    pub transform: Transform,
    /// Object kind
    pub kind: ObjectKind,
}

impl SceneObject {
    /// Create an object
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            id: SourceId::new(),
            name: name.into(),
            transform: Transform::default(),
            kind,
        }
    }

    /// Create a camera with default lens data
    pub fn camera(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Camera(CameraData::default()))
    }

    /// Set the transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Camera data, if this is a camera
    pub fn camera_data(&self) -> Option<&CameraData> {
        match &self.kind {
            ObjectKind::Camera(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable camera data, if this is a camera
    pub fn camera_data_mut(&mut self) -> Option<&mut CameraData> {
        match &mut self.kind {
            ObjectKind::Camera(data) => Some(data),
            _ => None,
        }
    }

    /// Whether this is a camera
    pub fn is_camera(&self) -> bool {
        self.camera_data().is_some()
    }
}

impl ParameterSource for SceneObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_id(&self) -> SourceId {
        self.id
    }

    fn data_id(&self) -> SourceId {
        self.camera_data().map_or(self.id, |data| data.id)
    }

    fn attribute(&self, path: &str) -> Option<f32> {
        self.camera_data()?.attribute(path)
    }
}

/// Output resolution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderSettings {
    /// Horizontal resolution in pixels
    pub resolution_x: u32,
    /// Vertical resolution in pixels
    pub resolution_y: u32,
    /// Horizontal pixel aspect
    pub pixel_aspect_x: f32,
    /// Vertical pixel aspect
    pub pixel_aspect_y: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution_x: 1920,
            resolution_y: 1080,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
        }
    }
}

impl RenderSettings {
    /// Width over height of the rendered image, `None` when degenerate
    pub fn aspect_ratio(&self) -> Option<f32> {
        let width = self.resolution_x as f32 * self.pixel_aspect_x;
        let height = self.resolution_y as f32 * self.pixel_aspect_y;
        let aspect = width / height;
        (height != 0.0 && aspect.is_finite() && aspect > 0.0).then_some(aspect)
    }
}

/// Scene data containing all objects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneData {
    /// All objects in the scene
    pub objects: IndexMap<SourceId, SceneObject>,
    /// Render output settings
    pub render: RenderSettings,
}

impl SceneData {
    /// Create a new empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object to the scene
    pub fn add_object(&mut self, object: SceneObject) -> SourceId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    /// Get an object by ID
    pub fn get(&self, id: &SourceId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Get a mutable reference to an object by ID
    pub fn get_mut(&mut self, id: &SourceId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Find an object by name
    pub fn find_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.values().find(|o| o.name == name)
    }

    /// All camera objects
    pub fn cameras(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().filter(|o| o.is_camera())
    }

    fn camera_data(&self, id: SourceId) -> Option<&CameraData> {
        self.objects
            .values()
            .filter_map(SceneObject::camera_data)
            .find(|data| data.id == id)
    }
}

impl SourceResolver for SceneData {
    fn attribute(&self, source: SourceId, path: &str) -> Option<f32> {
        self.camera_data(source)?.attribute(path)
    }

    fn world_to_local(&self, source: SourceId, position: [f32; 3]) -> Option<[f32; 3]> {
        self.get(&source)?.transform.world_to_local(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-4, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_world_to_local_inverts_local_to_world() {
        let transform = Transform {
            position: [1.0, -2.0, 3.0],
            rotation: [30.0, -45.0, 120.0],
            scale: [2.0, 1.0, 0.5],
        };
        let local = [0.3, -0.7, 1.1];
        let world = transform.local_to_world(local);
        assert_close(transform.world_to_local(world).unwrap(), local);
    }

    #[test]
    fn test_rotation_order_is_xyz() {
        // X first, then Z: local +Y -> world +Z under X 90, then stays +Z
        let transform = Transform::default().with_rotation([90.0, 0.0, 90.0]);
        assert_close(transform.local_to_world([0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        // local +X -> unchanged by X, then +Y under Z 90
        assert_close(transform.local_to_world([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zero_scale_has_no_inverse() {
        let transform = Transform {
            scale: [1.0, 0.0, 1.0],
            ..Default::default()
        };
        assert!(transform.world_to_local([1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn test_aspect_ratio() {
        let render = RenderSettings {
            resolution_x: 1920,
            resolution_y: 1080,
            pixel_aspect_x: 1.0,
            pixel_aspect_y: 1.0,
        };
        assert!((render.aspect_ratio().unwrap() - 16.0 / 9.0).abs() < 1e-6);

        let anamorphic = RenderSettings {
            resolution_x: 1000,
            resolution_y: 1000,
            pixel_aspect_x: 2.0,
            pixel_aspect_y: 1.0,
        };
        assert_eq!(anamorphic.aspect_ratio(), Some(2.0));

        let degenerate = RenderSettings {
            resolution_y: 0,
            ..Default::default()
        };
        assert_eq!(degenerate.aspect_ratio(), None);
    }

    #[test]
    fn test_scene_resolves_camera_data() {
        let mut scene = SceneData::new();
        let id = scene.add_object(SceneObject::camera("Camera").with_transform(Transform::at([0.0, 0.0, 5.0])));
        scene.add_object(SceneObject::new("Cube", ObjectKind::Mesh));

        let camera = scene.get(&id).unwrap().clone();
        let data_id = camera.data_id();
        assert_ne!(data_id, camera.object_id());
        assert_eq!(SourceResolver::attribute(&scene, data_id, "lens"), Some(50.0));
        assert_eq!(SourceResolver::attribute(&scene, id, "lens"), None);
        assert_close(scene.world_to_local(id, [0.0, 0.0, 0.0]).unwrap(), [0.0, 0.0, -5.0]);

        scene.get_mut(&id).unwrap().camera_data_mut().unwrap().lens = 35.0;
        assert_eq!(SourceResolver::attribute(&scene, data_id, "lens"), Some(35.0));
        assert_eq!(scene.cameras().count(), 1);
    }

    #[test]
    fn test_non_camera_has_no_lens_attributes() {
        let cube = SceneObject::new("Cube", ObjectKind::Mesh);
        assert_eq!(ParameterSource::attribute(&cube, "lens"), None);
        assert_eq!(cube.data_id(), cube.object_id());
    }
}
