// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera projector host.
//!
//! A small stand-in for a 3D editor that owns the scene, the graph storage
//! and the property panel, and drives the projection graph builder:
//! - Scene objects, cameras and render settings
//! - The "New Camera Project Node Group" command
//! - An egui property section shown for cameras
//! - RON configuration

pub mod commands;
pub mod config;
pub mod panel;
pub mod scene;
pub mod state;

pub use commands::{CommandError, CommandOutcome, CreateCameraProjector, EditorCommand};
pub use config::{ConfigError, ProjectorConfig};
pub use panel::CameraProjectorPanel;
pub use scene::{CameraData, ObjectKind, RenderSettings, SceneData, SceneObject, Transform};
pub use state::{EditorState, StatusLevel, StatusMessage};
