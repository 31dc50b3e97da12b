// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor state management.
//!
//! Holds the scene, the active object, the graph repository and the status
//! log commands report into.

use crate::commands::{CommandOutcome, EditorCommand};
use crate::config::ProjectorConfig;
use crate::scene::{SceneData, SceneObject};
use camera_projector_graph::{InMemoryGraphRepository, SourceId};
use std::collections::VecDeque;

/// Maximum number of status messages kept
const MAX_STATUS_MESSAGES: usize = 50;

/// Severity of a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Normal completion
    Info,
    /// Command could not run
    Warning,
    /// Command failed
    Error,
}

/// A line in the status area
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    /// Severity
    pub level: StatusLevel,
    /// Message text
    pub text: String,
}

/// Main editor state
pub struct EditorState {
    /// Scene data
    pub scene: SceneData,

    /// Object the panel and commands act on
    pub active_object: Option<SourceId>,

    /// Named shader graphs
    pub graphs: InMemoryGraphRepository,

    /// Projector settings
    pub config: ProjectorConfig,

    /// Whether the graphs changed since the last save
    pub dirty: bool,

    status: VecDeque<StatusMessage>,
}

impl EditorState {
    /// Create a state with an empty scene
    pub fn new(config: ProjectorConfig) -> Self {
        Self::with_scene(SceneData::new(), config)
    }

    /// Create a state for an existing scene
    pub fn with_scene(scene: SceneData, config: ProjectorConfig) -> Self {
        Self {
            scene,
            active_object: None,
            graphs: InMemoryGraphRepository::new(),
            config,
            dirty: false,
            status: VecDeque::new(),
        }
    }

    /// The active object, if it still exists
    pub fn active_object(&self) -> Option<&SceneObject> {
        self.scene.get(&self.active_object?)
    }

    /// Make an object active. Returns false if it is not in the scene.
    pub fn set_active(&mut self, id: SourceId) -> bool {
        if self.scene.get(&id).is_none() {
            return false;
        }
        self.active_object = Some(id);
        true
    }

    /// Run a command, reporting its result in the status area
    pub fn run(&mut self, command: &dyn EditorCommand) -> CommandOutcome {
        if !command.poll(self) {
            self.report(StatusLevel::Warning, format!("{}: not available", command.description()));
            return CommandOutcome::Cancelled;
        }

        match command.execute(self) {
            Ok(outcome) => {
                tracing::info!(command = command.description(), ?outcome, "Command finished");
                outcome
            }
            Err(e) => {
                self.report(StatusLevel::Error, format!("{}: {e}", command.description()));
                CommandOutcome::Cancelled
            }
        }
    }

    /// Post a status message
    pub fn report(&mut self, level: StatusLevel, text: impl Into<String>) {
        let text = text.into();
        match level {
            StatusLevel::Info => tracing::info!("{text}"),
            StatusLevel::Warning | StatusLevel::Error => tracing::warn!("{text}"),
        }

        self.status.push_back(StatusMessage { level, text });
        while self.status.len() > MAX_STATUS_MESSAGES {
            self.status.pop_front();
        }
    }

    /// Status messages, oldest first
    pub fn status_messages(&self) -> impl Iterator<Item = &StatusMessage> {
        self.status.iter()
    }

    /// Most recent status message
    pub fn last_status(&self) -> Option<&StatusMessage> {
        self.status.back()
    }
}
