// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes, connections and the public interface.

use crate::connection::{Connection, ConnectionId};
use crate::interface::GraphInterface;
use crate::node::{Node, NodeId};
use crate::port::{PortDirection, PortId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What kind of node tree a graph is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphKind {
    /// Shader node tree, usable from materials
    Shader,
    /// Geometry node tree
    Geometry,
    /// Compositor node tree
    Compositor,
}

/// A node graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Tree kind
    pub kind: GraphKind,
    /// Declared inputs and outputs
    interface: GraphInterface,
    /// Nodes in the graph
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>, kind: GraphKind) -> Self {
        Self {
            name: name.into(),
            kind,
            interface: GraphInterface::new(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
        }
    }

    /// The declared interface
    pub fn interface(&self) -> &GraphInterface {
        &self.interface
    }

    /// The declared interface, for editing
    pub fn interface_mut(&mut self) -> &mut GraphInterface {
        &mut self.interface
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.connections.retain(|_, c| !c.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Remove every node and connection, keeping the interface.
    ///
    /// Returns the number of nodes removed.
    pub fn clear_nodes(&mut self) -> usize {
        let removed = self.nodes.len();
        self.connections.clear();
        self.nodes.clear();
        removed
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Find the first node with the given label
    pub fn find_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.label == label)
    }

    /// Link an output port to an input port.
    ///
    /// An input accepts a single link; linking into an already linked input
    /// replaces the previous link.
    pub fn connect(
        &mut self,
        from_node: NodeId,
        from_port: PortId,
        to_node: NodeId,
        to_port: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        let source_node = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?;
        let target_node = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?;

        let source_port = source_node.port(&from_port)
            .ok_or(ConnectionError::PortNotFound(from_port))?;
        let target_port = target_node.port(&to_port)
            .ok_or(ConnectionError::PortNotFound(to_port))?;

        if source_port.direction != PortDirection::Output
            || target_port.direction != PortDirection::Input
        {
            return Err(ConnectionError::WrongDirection);
        }
        if !source_port.can_connect(target_port) {
            return Err(ConnectionError::IncompatiblePorts);
        }
        if from_node == to_node {
            return Err(ConnectionError::SelfLoop);
        }
        if self.reaches(to_node, from_node) {
            return Err(ConnectionError::WouldCycle);
        }

        if !target_port.multi_connect {
            self.connections.retain(|_, c| !c.feeds(to_node, to_port));
        }

        let connection = Connection::new(from_node, from_port, to_node, to_port);
        let id = connection.id;
        self.connections.insert(id, connection);
        Ok(id)
    }

    /// Link ports addressed by name
    pub fn connect_named(
        &mut self,
        from_node: NodeId,
        output: &str,
        to_node: NodeId,
        input: &str,
    ) -> Result<ConnectionId, ConnectionError> {
        let from_port = self.nodes.get(&from_node)
            .ok_or(ConnectionError::NodeNotFound(from_node))?
            .output_named(output)
            .ok_or_else(|| ConnectionError::PortNameNotFound(output.to_string()))?
            .id;
        let to_port = self.nodes.get(&to_node)
            .ok_or(ConnectionError::NodeNotFound(to_node))?
            .input_named(input)
            .ok_or_else(|| ConnectionError::PortNameNotFound(input.to_string()))?
            .id;
        self.connect(from_node, from_port, to_node, to_port)
    }

    /// Remove a connection
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// The link feeding an input port, if any
    pub fn connection_to(&self, node_id: NodeId, port_id: PortId) -> Option<&Connection> {
        self.connections.values().find(|c| c.feeds(node_id, port_id))
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether `target` is downstream of (or equal to) `start`
    fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        while let Some(node_id) = stack.pop() {
            if node_id == target {
                return true;
            }
            if !seen.insert(node_id) {
                continue;
            }
            stack.extend(
                self.connections
                    .values()
                    .filter(|c| c.from_node == node_id)
                    .map(|c| c.to_node),
            );
        }
        false
    }

    /// Get nodes in topological order (for evaluation)
    pub fn topological_order(&self) -> Result<Vec<NodeId>, CycleError> {
        let mut visited = HashSet::new();
        let mut temp_mark = HashSet::new();
        let mut order = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id) {
                self.visit(*node_id, &mut visited, &mut temp_mark, &mut order)?;
            }
        }

        Ok(order)
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        temp_mark: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> Result<(), CycleError> {
        if temp_mark.contains(&node_id) {
            return Err(CycleError);
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        temp_mark.insert(node_id);

        // Dependencies first
        for connection in self.connections_for_node(node_id) {
            if connection.to_node == node_id {
                self.visit(connection.from_node, visited, temp_mark, order)?;
            }
        }

        temp_mark.remove(&node_id);
        visited.insert(node_id);
        order.push(node_id);

        Ok(())
    }

    /// Serialize the graph to pretty RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

/// Error when creating a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// No port with this name on the node
    #[error("Port not found: {0}")]
    PortNameNotFound(String),

    /// Links must run from an output to an input
    #[error("Connections must go from an output to an input")]
    WrongDirection,

    /// Incompatible port types
    #[error("Incompatible port types")]
    IncompatiblePorts,

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// The link would close a cycle
    #[error("Connection would create a cycle")]
    WouldCycle,
}

/// Error when graph contains a cycle
#[derive(Debug, thiserror::Error)]
#[error("Graph contains a cycle")]
pub struct CycleError;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeCategory, NodeType};
    use crate::operation::{MathOp, Operation};
    use crate::port::{Port, PortType};

    fn add_node(graph: &mut Graph, label: &str) -> NodeId {
        let node_type = NodeType {
            id: "math".to_string(),
            name: "Math".to_string(),
            category: NodeCategory::Math,
            description: String::new(),
            inputs: vec![Port::input("A", PortType::Float), Port::input("B", PortType::Float)],
            outputs: vec![Port::output("Value", PortType::Float)],
        };
        graph.add_node(
            Node::new(&node_type, Operation::Math { op: MathOp::Add, clamp: false }).with_label(label),
        )
    }

    #[test]
    fn test_connect_and_order() {
        let mut graph = Graph::new("Test", GraphKind::Shader);
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");
        let c = add_node(&mut graph, "c");

        graph.connect_named(b, "Value", c, "A").unwrap();
        graph.connect_named(a, "Value", b, "A").unwrap();

        let order = graph.topological_order().unwrap();
        let pos = |id| order.iter().position(|n| *n == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(b) < pos(c));
    }

    #[test]
    fn test_relink_replaces_existing_input_link() {
        let mut graph = Graph::new("Test", GraphKind::Shader);
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");
        let c = add_node(&mut graph, "c");

        graph.connect_named(a, "Value", c, "A").unwrap();
        graph.connect_named(b, "Value", c, "A").unwrap();

        assert_eq!(graph.connection_count(), 1);
        let port = graph.node(c).unwrap().input_named("A").unwrap().id;
        assert_eq!(graph.connection_to(c, port).unwrap().from_node, b);
    }

    #[test]
    fn test_rejects_cycles_and_self_loops() {
        let mut graph = Graph::new("Test", GraphKind::Shader);
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");

        graph.connect_named(a, "Value", b, "A").unwrap();
        assert!(matches!(
            graph.connect_named(b, "Value", a, "A"),
            Err(ConnectionError::WouldCycle)
        ));
        assert!(matches!(
            graph.connect_named(a, "Value", a, "B"),
            Err(ConnectionError::SelfLoop)
        ));
    }

    #[test]
    fn test_rejects_wrong_direction_and_unknown_ports() {
        let mut graph = Graph::new("Test", GraphKind::Shader);
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");

        let a_in = graph.node(a).unwrap().input_named("A").unwrap().id;
        let b_in = graph.node(b).unwrap().input_named("A").unwrap().id;
        assert!(matches!(
            graph.connect(a, a_in, b, b_in),
            Err(ConnectionError::WrongDirection)
        ));
        assert!(matches!(
            graph.connect_named(a, "Missing", b, "A"),
            Err(ConnectionError::PortNameNotFound(_))
        ));
        assert!(matches!(
            graph.connect_named(a, "Value", NodeId::new(), "A"),
            Err(ConnectionError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_clear_keeps_interface() {
        use crate::interface::InterfaceSocket;

        let mut graph = Graph::new("Test", GraphKind::Shader);
        graph.interface_mut().declare_if_absent(InterfaceSocket::input("Rotation", PortType::Float));
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");
        graph.connect_named(a, "Value", b, "A").unwrap();

        assert_eq!(graph.clear_nodes(), 2);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.interface().contains("Rotation"));
    }

    #[test]
    fn test_remove_node_drops_its_links() {
        let mut graph = Graph::new("Test", GraphKind::Shader);
        let a = add_node(&mut graph, "a");
        let b = add_node(&mut graph, "b");
        graph.connect_named(a, "Value", b, "A").unwrap();

        assert!(graph.remove_node(a).is_some());
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.find_by_label("b").is_some());
        assert!(graph.find_by_label("a").is_none());
    }

    #[test]
    fn test_ron_dump_contains_labels() {
        let mut graph = Graph::new("Dump", GraphKind::Shader);
        add_node(&mut graph, "Zoom 1");
        let ron = graph.to_ron().unwrap();
        assert!(ron.contains("Zoom 1"));
    }
}
