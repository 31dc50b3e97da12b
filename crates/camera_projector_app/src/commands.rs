// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor commands.
//!
//! A command checks with [`EditorCommand::poll`] whether it can run in the
//! current state, then mutates the state in [`EditorCommand::execute`].

use crate::state::{EditorState, StatusLevel};
use camera_projector_graph::{CameraProjector, ProjectorError};

/// Result of a command that ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command completed and changed the state
    Finished,
    /// The command did nothing
    Cancelled,
}

/// Trait for editor commands
pub trait EditorCommand {
    /// Identifier of the command
    fn id(&self) -> &str;

    /// Get a description of this command
    fn description(&self) -> &str;

    /// Whether the command can run in this state
    fn poll(&self, state: &EditorState) -> bool;

    /// Execute the command
    fn execute(&self, state: &mut EditorState) -> Result<CommandOutcome, CommandError>;
}

/// Error type for command execution
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Nothing is active
    #[error("No active object")]
    NoActiveObject,

    /// The active object is not a camera
    #[error("'{0}' is not a camera")]
    NotACamera(String),

    /// Building the graph failed
    #[error(transparent)]
    Projector(#[from] ProjectorError),
}

/// Create or refresh the projection graph of the active camera
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCameraProjector;

impl CreateCameraProjector {
    /// Command identifier
    pub const ID: &'static str = "material.camera_project_new";

    /// Button label
    pub const LABEL: &'static str = "New Camera Project Node Group";
}

impl EditorCommand for CreateCameraProjector {
    fn id(&self) -> &str {
        Self::ID
    }

    fn description(&self) -> &str {
        Self::LABEL
    }

    fn poll(&self, state: &EditorState) -> bool {
        state.active_object().is_some_and(|object| object.is_camera())
    }

    fn execute(&self, state: &mut EditorState) -> Result<CommandOutcome, CommandError> {
        let camera = state.active_object
            .and_then(|id| state.scene.get(&id))
            .ok_or(CommandError::NoActiveObject)?;
        if !camera.is_camera() {
            return Err(CommandError::NotACamera(camera.name.clone()));
        }

        let aspect = state.scene.render.aspect_ratio().unwrap_or_else(|| {
            tracing::warn!(
                fallback = state.config.fallback_aspect,
                "Degenerate render resolution, using fallback aspect"
            );
            state.config.fallback_aspect
        });

        let projector = CameraProjector::with_layout(state.config.layout());
        let name = projector.ensure(&mut state.graphs, camera, aspect)?.name.clone();

        state.dirty = true;
        state.report(StatusLevel::Info, format!("Updated node group '{name}'"));
        Ok(CommandOutcome::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectorConfig;
    use crate::scene::{ObjectKind, SceneObject};
    use camera_projector_graph::graphs::camera_project::description::sockets;
    use camera_projector_graph::{graph_name, GraphRepository, PortValue};

    fn state_with(object: SceneObject) -> EditorState {
        let mut state = EditorState::new(ProjectorConfig::default());
        let id = state.scene.add_object(object);
        state.set_active(id);
        state
    }

    fn aspect_default(state: &EditorState, camera: &str) -> PortValue {
        state.graphs
            .get(&graph_name(camera))
            .unwrap()
            .interface()
            .get(sockets::ASPECT_RATIO)
            .unwrap()
            .default_value
    }

    #[test]
    fn test_creates_graph_with_render_aspect() {
        let mut state = state_with(SceneObject::camera("Camera"));
        state.scene.render.resolution_x = 2000;
        state.scene.render.resolution_y = 1000;

        assert!(CreateCameraProjector.poll(&state));
        assert_eq!(state.run(&CreateCameraProjector), CommandOutcome::Finished);
        assert_eq!(aspect_default(&state, "Camera"), PortValue::Float(2.0));
        assert_eq!(state.last_status().unwrap().level, StatusLevel::Info);
        assert!(state.dirty);
    }

    #[test]
    fn test_rerun_keeps_single_graph() {
        let mut state = state_with(SceneObject::camera("Camera"));
        state.run(&CreateCameraProjector);
        state.scene.render.resolution_x = 1080;
        state.run(&CreateCameraProjector);

        assert_eq!(state.graphs.len(), 1);
        assert!((aspect_default(&state, "Camera").as_float() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_render_uses_fallback() {
        let mut state = state_with(SceneObject::camera("Camera"));
        state.config.fallback_aspect = 1.25;
        state.scene.render.resolution_y = 0;

        assert_eq!(state.run(&CreateCameraProjector), CommandOutcome::Finished);
        assert_eq!(aspect_default(&state, "Camera"), PortValue::Float(1.25));
    }

    #[test]
    fn test_not_available_for_meshes() {
        let mut state = state_with(SceneObject::new("Cube", ObjectKind::Mesh));
        assert!(!CreateCameraProjector.poll(&state));
        assert_eq!(state.run(&CreateCameraProjector), CommandOutcome::Cancelled);
        assert_eq!(state.last_status().unwrap().level, StatusLevel::Warning);
        assert!(state.graphs.is_empty());

        assert!(matches!(
            CreateCameraProjector.execute(&mut state),
            Err(CommandError::NotACamera(name)) if name == "Cube"
        ));
    }

    #[test]
    fn test_no_active_object() {
        let mut state = EditorState::new(ProjectorConfig::default());
        assert!(!CreateCameraProjector.poll(&state));
        assert!(matches!(
            CreateCameraProjector.execute(&mut state),
            Err(CommandError::NoActiveObject)
        ));
    }

    #[test]
    fn test_failure_is_reported() {
        let mut state = state_with(SceneObject::camera("Camera"));
        state.graphs.insert(camera_projector_graph::Graph::new(
            graph_name("Camera"),
            camera_projector_graph::GraphKind::Geometry,
        ));

        assert_eq!(state.run(&CreateCameraProjector), CommandOutcome::Cancelled);
        let status = state.last_status().unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.text.contains("Camera Project | Camera"));
    }
}
