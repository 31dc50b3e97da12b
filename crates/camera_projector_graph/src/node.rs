// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::operation::Operation;
use crate::port::{Port, PortId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Input nodes (constants, parameters, coordinates)
    Input,
    /// Output nodes
    Output,
    /// Scalar math operations
    Math,
    /// Vector operations
    Vector,
    /// Conversions between scalars and vectors
    Converter,
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input ports
    pub inputs: Vec<Port>,
    /// Default output ports
    pub outputs: Vec<Port>,
}

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID
    pub node_type: String,
    /// Display label
    pub label: String,
    /// Operation performed by this node
    pub operation: Operation,
    /// Position in the graph UI
    pub position: [f32; 2],
    /// Input ports
    pub inputs: Vec<Port>,
    /// Output ports
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a new node from a type definition.
    ///
    /// Ports are copied from the type with fresh IDs so that two instances of
    /// the same type never share port identity.
    pub fn new(node_type: &NodeType, operation: Operation) -> Self {
        Self {
            id: NodeId::new(),
            node_type: node_type.id.clone(),
            label: node_type.name.clone(),
            operation,
            position: [0.0, 0.0],
            inputs: node_type.inputs.iter().map(Port::instantiate).collect(),
            outputs: node_type.outputs.iter().map(Port::instantiate).collect(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Get an input port by index
    pub fn input(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get an output port by index
    pub fn output(&self, index: usize) -> Option<&Port> {
        self.outputs.get(index)
    }

    /// Get an input port by name
    pub fn input_named(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get a mutable input port by name
    pub fn input_named_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.inputs.iter_mut().find(|p| p.name == name)
    }

    /// Get an output port by name
    pub fn output_named(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node performing `operation` from its registered type
    pub fn create_node(&self, operation: Operation) -> Option<Node> {
        self.get(operation.type_id())
            .map(|node_type| Node::new(node_type, operation))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::MathOp;
    use crate::port::PortType;

    fn math_type() -> NodeType {
        NodeType {
            id: "math".to_string(),
            name: "Math".to_string(),
            category: NodeCategory::Math,
            description: "Scalar math".to_string(),
            inputs: vec![Port::input("A", PortType::Float), Port::input("B", PortType::Float)],
            outputs: vec![Port::output("Value", PortType::Float)],
        }
    }

    #[test]
    fn test_instances_have_distinct_port_ids() {
        let mut registry = NodeRegistry::new();
        registry.register(math_type());

        let op = Operation::Math { op: MathOp::Add, clamp: false };
        let a = registry.create_node(op.clone()).unwrap();
        let b = registry.create_node(op).unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.inputs[0].id, b.inputs[0].id);
        assert_ne!(a.outputs[0].id, b.outputs[0].id);
    }

    #[test]
    fn test_port_lookup_by_name_and_id() {
        let node = Node::new(&math_type(), Operation::Math { op: MathOp::Divide, clamp: false })
            .with_label("Zoom 1")
            .with_position(250.0, -700.0);

        assert_eq!(node.label, "Zoom 1");
        assert_eq!(node.position, [250.0, -700.0]);
        let b = node.input_named("B").unwrap();
        assert_eq!(node.port(&b.id).unwrap().name, "B");
        assert!(node.output_named("Value").is_some());
        assert!(node.input_named("C").is_none());
        assert_eq!(node.ports().count(), 3);
    }

    #[test]
    fn test_unknown_type_creates_nothing() {
        let registry = NodeRegistry::new();
        assert!(registry.create_node(Operation::CombineXyz).is_none());
        assert_eq!(registry.types_in_category(NodeCategory::Math).count(), 0);
    }
}
