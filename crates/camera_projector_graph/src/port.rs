// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Data type that can flow through ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    /// Floating point value
    Float,
    /// 3D vector
    Vector3,
}

impl PortType {
    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        // Float broadcasts into vectors, vectors collapse to their average.
        matches!(
            (self, other),
            (Self::Float | Self::Vector3, Self::Float | Self::Vector3)
        )
    }

    /// Zero value for this type
    pub fn zero(&self) -> PortValue {
        match self {
            Self::Float => PortValue::Float(0.0),
            Self::Vector3 => PortValue::Vector3([0.0; 3]),
        }
    }
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Default value (for inputs)
    pub default_value: Option<PortValue>,
    /// Whether multiple connections are allowed
    pub multi_connect: bool,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
            multi_connect: false,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
            multi_connect: true, // Outputs can have multiple connections by default
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Copy of this port with a fresh ID, used when instantiating a node type
    pub fn instantiate(&self) -> Self {
        Self {
            id: PortId::new(),
            ..self.clone()
        }
    }

    /// Check if a connection to another port is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        if self.direction == other.direction {
            return false;
        }

        self.port_type.can_connect_to(&other.port_type)
    }

    /// Value used when nothing is linked into this port
    pub fn fallback_value(&self) -> PortValue {
        self.default_value.unwrap_or_else(|| self.port_type.zero())
    }
}

/// Value that can be stored in a port
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Float
    Float(f32),
    /// 3D vector
    Vector3([f32; 3]),
}

impl PortValue {
    /// Get the port type for this value
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Float(_) => PortType::Float,
            Self::Vector3(_) => PortType::Vector3,
        }
    }

    /// Read as a scalar. Vectors collapse to the average of their components.
    pub fn as_float(&self) -> f32 {
        match *self {
            Self::Float(v) => v,
            Self::Vector3([x, y, z]) => (x + y + z) / 3.0,
        }
    }

    /// Read as a vector. Scalars are broadcast to every component.
    pub fn as_vector(&self) -> [f32; 3] {
        match *self {
            Self::Float(v) => [v; 3],
            Self::Vector3(v) => v,
        }
    }

    /// Convert to the representation expected by a port of `port_type`
    pub fn coerce(&self, port_type: PortType) -> PortValue {
        match port_type {
            PortType::Float => Self::Float(self.as_float()),
            PortType::Vector3 => Self::Vector3(self.as_vector()),
        }
    }
}
