// SPDX-License-Identifier: MIT OR Apache-2.0
//! Apply a [`GraphDescription`] to a live graph.

use super::description::{EdgeSource, EdgeTarget, GraphDescription, NodeSpec};
use super::registry::create_projection_registry;
use crate::graph::{ConnectionError, Graph};
use crate::node::{Node, NodeId, NodeRegistry};
use crate::operation::Operation;
use crate::port::Port;
use indexmap::IndexMap;

/// What a materialization changed
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// Nodes destroyed by the initial clear
    pub removed_nodes: usize,
    /// Interface sockets that had to be declared
    pub declared_sockets: Vec<String>,
    /// Created nodes by description key
    pub nodes: IndexMap<String, NodeId>,
    /// Links created
    pub links: usize,
}

/// Builds graph contents from descriptions
pub struct Materializer {
    registry: NodeRegistry,
}

impl Materializer {
    /// Materializer for the projection node types
    pub fn new() -> Self {
        Self::with_registry(create_projection_registry())
    }

    /// Materializer using a custom registry
    pub fn with_registry(registry: NodeRegistry) -> Self {
        Self { registry }
    }

    /// Rebuild `graph` from `description`.
    ///
    /// Every existing node is removed first. Interface sockets are declared
    /// only when missing, so existing defaults survive. The graph is left
    /// partially built if an error occurs after the clear.
    pub fn apply(&self, graph: &mut Graph, description: &GraphDescription) -> Result<MaterializeReport, MaterializeError> {
        let mut report = MaterializeReport {
            removed_nodes: graph.clear_nodes(),
            ..Default::default()
        };

        let repairing = !graph.interface().is_empty();
        for socket in &description.interface {
            if graph.interface_mut().declare_if_absent(socket.clone()) {
                if repairing {
                    tracing::warn!(graph = %graph.name, socket = %socket.name, "Declaring missing interface socket");
                }
                report.declared_sockets.push(socket.name.clone());
            }
        }

        for spec in &description.nodes {
            let node = self.instantiate(graph, spec)?;
            let id = graph.add_node(node);
            report.nodes.insert(spec.key.clone(), id);
        }
        tracing::debug!(graph = %graph.name, nodes = report.nodes.len(), "Created nodes");

        let group_input = find_group_node(description, &report.nodes, &Operation::GroupInput);
        let group_output = find_group_node(description, &report.nodes, &Operation::GroupOutput);

        for edge in &description.edges {
            let (from, output) = match &edge.from {
                EdgeSource::Node { key, output } => (lookup(&report.nodes, key)?, output.as_str()),
                EdgeSource::GroupInput { socket } => {
                    (group_input.ok_or(MaterializeError::MissingGroupNode("input"))?, socket.as_str())
                }
            };
            let (to, input) = match &edge.to {
                EdgeTarget::Node { key, input } => (lookup(&report.nodes, key)?, input.as_str()),
                EdgeTarget::GroupOutput { socket } => {
                    (group_output.ok_or(MaterializeError::MissingGroupNode("output"))?, socket.as_str())
                }
            };
            graph.connect_named(from, output, to, input)?;
            report.links += 1;
        }
        tracing::debug!(graph = %graph.name, links = report.links, "Linked nodes");

        Ok(report)
    }

    fn instantiate(&self, graph: &Graph, spec: &NodeSpec) -> Result<Node, MaterializeError> {
        let mut node = self.registry
            .create_node(spec.operation.clone())
            .ok_or_else(|| MaterializeError::UnknownNodeType(spec.operation.type_id().to_string()))?
            .with_label(spec.label.clone())
            .with_position(spec.position[0], spec.position[1]);

        // Group nodes mirror the interface
        match spec.operation {
            Operation::GroupInput => {
                node.outputs.extend(graph.interface().inputs().map(|s| Port::output(s.name.clone(), s.socket_type)));
            }
            Operation::GroupOutput => {
                node.inputs.extend(graph.interface().outputs().map(|s| {
                    Port::input(s.name.clone(), s.socket_type).with_default(s.default_value)
                }));
            }
            _ => {}
        }

        for (input, value) in &spec.defaults {
            let port = node.input_named_mut(input).ok_or_else(|| MaterializeError::UnknownPort {
                node: spec.key.clone(),
                port: input.clone(),
            })?;
            port.default_value = Some(value.coerce(port.port_type));
        }

        Ok(node)
    }
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup(nodes: &IndexMap<String, NodeId>, key: &str) -> Result<NodeId, MaterializeError> {
    nodes.get(key).copied().ok_or_else(|| MaterializeError::UnknownNode(key.to_string()))
}

fn find_group_node(
    description: &GraphDescription,
    nodes: &IndexMap<String, NodeId>,
    operation: &Operation,
) -> Option<NodeId> {
    description.nodes
        .iter()
        .find(|spec| spec.operation == *operation)
        .and_then(|spec| nodes.get(&spec.key).copied())
}

/// Error while applying a description
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    /// No registered type for an operation
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// An edge refers to a node key that was not described
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A default targets an input the node does not have
    #[error("Node '{node}' has no input '{port}'")]
    UnknownPort {
        /// Node key
        node: String,
        /// Input name
        port: String,
    },

    /// An edge uses the group interface but no group node was described
    #[error("Description has no group {0} node")]
    MissingGroupNode(&'static str),

    /// Linking failed
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
