// SPDX-License-Identifier: MIT OR Apache-2.0
//! Declared inputs and outputs of a graph.
//!
//! Interface sockets outlive the internal nodes: clearing a graph keeps them,
//! and so do their (possibly user-edited) default values.

use crate::port::{PortDirection, PortType, PortValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named input or output on the graph's public interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceSocket {
    /// Socket name, unique within the interface
    pub name: String,
    /// Input or output
    pub direction: PortDirection,
    /// Data type
    pub socket_type: PortType,
    /// Persisted default value
    pub default_value: PortValue,
}

impl InterfaceSocket {
    /// Declare an input socket
    pub fn input(name: impl Into<String>, socket_type: PortType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
            socket_type,
            default_value: socket_type.zero(),
        }
    }

    /// Declare an output socket
    pub fn output(name: impl Into<String>, socket_type: PortType) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
            socket_type,
            default_value: socket_type.zero(),
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = value.coerce(self.socket_type);
        self
    }
}

/// Ordered set of interface sockets keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInterface {
    sockets: IndexMap<String, InterfaceSocket>,
}

impl GraphInterface {
    /// Create an empty interface
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a socket unless one with the same name exists.
    ///
    /// Returns `true` when the socket was added. An existing socket is left
    /// untouched, including its default value.
    pub fn declare_if_absent(&mut self, socket: InterfaceSocket) -> bool {
        if self.sockets.contains_key(&socket.name) {
            return false;
        }
        self.sockets.insert(socket.name.clone(), socket);
        true
    }

    /// Check whether a socket exists
    pub fn contains(&self, name: &str) -> bool {
        self.sockets.contains_key(name)
    }

    /// Get a socket by name
    pub fn get(&self, name: &str) -> Option<&InterfaceSocket> {
        self.sockets.get(name)
    }

    /// Change the default value of an existing socket
    pub fn set_default(&mut self, name: &str, value: PortValue) -> Result<(), InterfaceError> {
        let socket = self
            .sockets
            .get_mut(name)
            .ok_or_else(|| InterfaceError::SocketNotFound(name.to_string()))?;
        socket.default_value = value.coerce(socket.socket_type);
        Ok(())
    }

    /// Remove a socket
    pub fn remove(&mut self, name: &str) -> Option<InterfaceSocket> {
        self.sockets.shift_remove(name)
    }

    /// Input sockets in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &InterfaceSocket> {
        self.sockets.values().filter(|s| s.direction == PortDirection::Input)
    }

    /// Output sockets in declaration order
    pub fn outputs(&self) -> impl Iterator<Item = &InterfaceSocket> {
        self.sockets.values().filter(|s| s.direction == PortDirection::Output)
    }

    /// All sockets in declaration order
    pub fn sockets(&self) -> impl Iterator<Item = &InterfaceSocket> {
        self.sockets.values()
    }

    /// Number of sockets
    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    /// Whether no sockets are declared
    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }
}

/// Error when editing the interface
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Socket not found
    #[error("Interface socket not found: {0}")]
    SocketNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_is_append_only() {
        let mut interface = GraphInterface::new();
        assert!(interface.declare_if_absent(
            InterfaceSocket::input("Aspect Ratio", PortType::Float).with_default(PortValue::Float(1.5))
        ));
        assert!(!interface.declare_if_absent(
            InterfaceSocket::input("Aspect Ratio", PortType::Float).with_default(PortValue::Float(9.0))
        ));

        assert_eq!(interface.len(), 1);
        assert_eq!(
            interface.get("Aspect Ratio").unwrap().default_value,
            PortValue::Float(1.5)
        );
    }

    #[test]
    fn test_inputs_and_outputs_keep_order() {
        let mut interface = GraphInterface::new();
        interface.declare_if_absent(InterfaceSocket::input("B", PortType::Float));
        interface.declare_if_absent(InterfaceSocket::output("Vector", PortType::Vector3));
        interface.declare_if_absent(InterfaceSocket::input("A", PortType::Float));

        let inputs: Vec<_> = interface.inputs().map(|s| s.name.as_str()).collect();
        assert_eq!(inputs, ["B", "A"]);
        let outputs: Vec<_> = interface.outputs().map(|s| s.name.as_str()).collect();
        assert_eq!(outputs, ["Vector"]);
    }

    #[test]
    fn test_set_default() {
        let mut interface = GraphInterface::new();
        interface.declare_if_absent(InterfaceSocket::input("Rotation", PortType::Float));
        interface.set_default("Rotation", PortValue::Float(90.0)).unwrap();
        assert_eq!(interface.get("Rotation").unwrap().default_value, PortValue::Float(90.0));

        assert!(matches!(
            interface.set_default("Missing", PortValue::Float(1.0)),
            Err(InterfaceError::SocketNotFound(_))
        ));
    }
}
