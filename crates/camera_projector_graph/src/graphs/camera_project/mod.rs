// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera projection shader graph.
//!
//! One graph per camera, named `Camera Project | <camera>`. The graph maps
//! a shading position to the UV coordinate it has when seen through the
//! camera, with user controls for aspect ratio, rotation and offset.
//!
//! [`CameraProjector::ensure`] is idempotent: it looks the graph up by name,
//! rebuilds every internal node and only declares interface sockets that
//! are missing, so user-edited defaults survive.

pub mod description;
pub mod materialize;
pub mod registry;

use crate::binding::SourceId;
use crate::graph::{Graph, GraphKind};
use crate::repository::{GraphRepository, RepositoryError};
use description::{attributes, describe, LayoutConfig, ProjectionTarget};
use materialize::{MaterializeError, Materializer};

/// Prefix of every projection graph name
pub const GRAPH_NAME_PREFIX: &str = "Camera Project | ";

/// Name of the projection graph for a camera
pub fn graph_name(camera_name: &str) -> String {
    format!("{GRAPH_NAME_PREFIX}{camera_name}")
}

/// A live camera the projection reads from
pub trait ParameterSource {
    /// Stable camera name
    fn name(&self) -> &str;

    /// Identity of the camera object, whose transform defines camera space
    fn object_id(&self) -> SourceId;

    /// Identity of the camera data holding the lens attributes
    fn data_id(&self) -> SourceId;

    /// Current value of a numeric attribute such as `lens`
    fn attribute(&self, path: &str) -> Option<f32>;
}

/// Builds and refreshes projection graphs
pub struct CameraProjector {
    materializer: Materializer,
    layout: LayoutConfig,
}

impl CameraProjector {
    /// Projector with the default layout
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    /// Projector with a custom layout
    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            materializer: Materializer::new(),
            layout,
        }
    }

    /// Layout used for new nodes
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Create or refresh the projection graph for `camera`.
    ///
    /// `default_aspect` only seeds the Aspect Ratio socket when it is first
    /// declared. The camera's attributes are checked before the repository is
    /// touched.
    pub fn ensure<'r, R>(
        &self,
        repo: &'r mut R,
        camera: &dyn ParameterSource,
        default_aspect: f32,
    ) -> Result<&'r mut Graph, ProjectorError>
    where
        R: GraphRepository + ?Sized,
    {
        for attribute in attributes::REQUIRED {
            if camera.attribute(attribute).is_none() {
                return Err(ProjectorError::InvalidParameterSource {
                    camera: camera.name().to_string(),
                    attribute,
                });
            }
        }

        let target = ProjectionTarget {
            graph_name: graph_name(camera.name()),
            object: camera.object_id(),
            data: camera.data_id(),
            default_aspect,
        };
        let description = describe(&target, &self.layout);

        let graph = repo.get_or_create(&target.graph_name, GraphKind::Shader)?;
        let report = self.materializer.apply(graph, &description)?;
        tracing::info!(
            graph = %target.graph_name,
            removed = report.removed_nodes,
            nodes = report.nodes.len(),
            links = report.links,
            "Built camera projection graph"
        );
        Ok(graph)
    }
}

impl Default for CameraProjector {
    fn default() -> Self {
        Self::new()
    }
}

/// Create or refresh the projection graph for `camera` with the default layout
pub fn ensure_camera_project_graph<'r, R>(
    repo: &'r mut R,
    camera: &dyn ParameterSource,
    default_aspect: f32,
) -> Result<&'r mut Graph, ProjectorError>
where
    R: GraphRepository + ?Sized,
{
    CameraProjector::new().ensure(repo, camera, default_aspect)
}

/// Error while building a projection graph
#[derive(Debug, thiserror::Error)]
pub enum ProjectorError {
    /// The camera lacks a required attribute
    #[error("Camera '{camera}' has no attribute '{attribute}'")]
    InvalidParameterSource {
        /// Camera name
        camera: String,
        /// Missing attribute path
        attribute: &'static str,
    },

    /// Graph storage refused the name
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Building the nodes failed
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
