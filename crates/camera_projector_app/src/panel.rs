// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera Projector panel - property section shown for cameras.

use crate::commands::{CommandOutcome, CreateCameraProjector, EditorCommand};
use crate::state::{EditorState, StatusLevel};
use camera_projector_graph::{graph_name, GraphRepository};

/// Property panel section with the projector command
#[derive(Debug, Default)]
pub struct CameraProjectorPanel {
    /// Outcome of the last button press
    last_outcome: Option<CommandOutcome>,
}

impl CameraProjectorPanel {
    /// Section title
    pub const TITLE: &'static str = "Camera Projector";

    /// Create a new panel
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the section is shown for the current state
    pub fn poll(state: &EditorState) -> bool {
        state.active_object().is_some_and(|object| object.is_camera())
    }

    /// Outcome of the last button press
    pub fn last_outcome(&self) -> Option<CommandOutcome> {
        self.last_outcome
    }

    /// Render the panel. Does nothing unless a camera is active.
    pub fn ui(&mut self, ui: &mut egui::Ui, state: &mut EditorState) {
        if !Self::poll(state) {
            return;
        }

        egui::CollapsingHeader::new(Self::TITLE)
            .default_open(true)
            .show(ui, |ui| {
                let command = CreateCameraProjector;
                let clicked = ui
                    .add_enabled(command.poll(state), egui::Button::new(CreateCameraProjector::LABEL))
                    .on_hover_text("Creates a camera projection node group from the active camera")
                    .clicked();
                if clicked {
                    self.trigger(state);
                }

                if let Some(name) = state.active_object().map(|camera| graph_name(&camera.name)) {
                    if state.graphs.contains(&name) {
                        ui.label(format!("Node group: {name}"));
                    }
                }

                if let Some(status) = state.last_status() {
                    let color = match status.level {
                        StatusLevel::Info => ui.visuals().text_color(),
                        StatusLevel::Warning => ui.visuals().warn_fg_color,
                        StatusLevel::Error => ui.visuals().error_fg_color,
                    };
                    ui.colored_label(color, &status.text);
                }
            });
    }

    /// Run the projector command as if the button was pressed
    pub fn trigger(&mut self, state: &mut EditorState) -> CommandOutcome {
        let outcome = state.run(&CreateCameraProjector);
        self.last_outcome = Some(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectorConfig;
    use crate::scene::{ObjectKind, SceneObject};

    fn state_with(object: SceneObject) -> EditorState {
        let mut state = EditorState::new(ProjectorConfig::default());
        let id = state.scene.add_object(object);
        state.set_active(id);
        state
    }

    fn draw(panel: &mut CameraProjectorPanel, state: &mut EditorState) -> egui::FullOutput {
        let ctx = egui::Context::default();
        ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, state));
        })
    }

    #[test]
    fn test_shown_only_for_cameras() {
        assert!(CameraProjectorPanel::poll(&state_with(SceneObject::camera("Camera"))));
        assert!(!CameraProjectorPanel::poll(&state_with(SceneObject::new("Empty", ObjectKind::Empty))));
        assert!(!CameraProjectorPanel::poll(&EditorState::new(ProjectorConfig::default())));
    }

    #[test]
    fn test_draws_headless() {
        let mut panel = CameraProjectorPanel::new();
        let mut state = state_with(SceneObject::camera("Camera"));
        panel.trigger(&mut state);

        let output = draw(&mut panel, &mut state);
        assert!(!output.shapes.is_empty());
        assert_eq!(panel.last_outcome(), Some(CommandOutcome::Finished));
    }

    #[test]
    fn test_trigger_builds_graph() {
        let mut panel = CameraProjectorPanel::new();
        let mut state = state_with(SceneObject::camera("Camera"));

        assert_eq!(panel.trigger(&mut state), CommandOutcome::Finished);
        assert!(state.graphs.contains("Camera Project | Camera"));
    }

    #[test]
    fn test_mesh_draws_nothing() {
        let mut panel = CameraProjectorPanel::new();
        let mut state = state_with(SceneObject::new("Cube", ObjectKind::Mesh));

        draw(&mut panel, &mut state);
        assert_eq!(panel.last_outcome(), None);
        assert!(state.graphs.is_empty());
    }
}
