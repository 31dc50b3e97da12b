// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph framework for camera projection shaders.
//!
//! This crate provides:
//! - A typed node graph with named interface sockets
//! - A closed set of operations with pure evaluation semantics
//! - Live bindings that read host attributes at evaluation time
//! - Name-keyed graph storage behind [`GraphRepository`]
//! - The camera projection graph builder in [`graphs::camera_project`]
//!
//! ## Architecture
//!
//! Graph construction is split in two: a description is produced as plain
//! data, then materialized into a [`Graph`] held by a repository. The
//! [`evaluation::Interpreter`] runs any graph directly, so the projection
//! formula can be tested without a host renderer.

pub mod binding;
pub mod connection;
pub mod evaluation;
pub mod graph;
pub mod graphs;
pub mod interface;
pub mod node;
pub mod operation;
pub mod port;
pub mod repository;

pub use binding::{LiveBinding, SourceId, SourceResolver};
pub use connection::{Connection, ConnectionId};
pub use evaluation::{evaluate, EvaluationEnvironment, EvaluationError, GraphEvaluation, Interpreter};
pub use graph::{ConnectionError, Graph, GraphKind};
pub use graphs::camera_project::{
    ensure_camera_project_graph, graph_name, CameraProjector, ParameterSource, ProjectorError,
};
pub use interface::{GraphInterface, InterfaceSocket};
pub use node::{Node, NodeId, NodeType};
pub use operation::Operation;
pub use port::{Port, PortDirection, PortId, PortType, PortValue};
pub use repository::{GraphRepository, InMemoryGraphRepository, RepositoryError};
