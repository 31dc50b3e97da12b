// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node types available to the camera projection graph.

use crate::node::{NodeCategory, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};

/// Create the registry of node types used by projection graphs.
///
/// Group input/output types are registered without ports; their ports mirror
/// the graph interface and are added when the nodes are materialized.
pub fn create_projection_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Group Interface
    // ========================================================================

    registry.register(NodeType {
        id: "group_input".to_string(),
        name: "Group Input".to_string(),
        category: NodeCategory::Input,
        description: "Declared inputs of the graph".to_string(),
        inputs: vec![],
        outputs: vec![],
    });

    registry.register(NodeType {
        id: "group_output".to_string(),
        name: "Group Output".to_string(),
        category: NodeCategory::Output,
        description: "Declared outputs of the graph".to_string(),
        inputs: vec![],
        outputs: vec![],
    });

    // ========================================================================
    // Input Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "texture_coordinate".to_string(),
        name: "Texture Coordinate".to_string(),
        category: NodeCategory::Input,
        description: "Shading position in the space of a reference object".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Object", PortType::Vector3)],
    });

    registry.register(NodeType {
        id: "value".to_string(),
        name: "Value".to_string(),
        category: NodeCategory::Input,
        description: "Constant scalar".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Value", PortType::Float)],
    });

    registry.register(NodeType {
        id: "bound_value".to_string(),
        name: "Bound Value".to_string(),
        category: NodeCategory::Input,
        description: "Scalar that follows a host attribute".to_string(),
        inputs: vec![],
        outputs: vec![Port::output("Value", PortType::Float)],
    });

    // ========================================================================
    // Math Nodes
    // ========================================================================

    registry.register(NodeType {
        id: "math".to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Math,
        description: "Scalar math operation".to_string(),
        inputs: vec![
            Port::input("A", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("B", PortType::Float).with_default(PortValue::Float(0.5)),
        ],
        outputs: vec![Port::output("Value", PortType::Float)],
    });

    registry.register(NodeType {
        id: "vector_math".to_string(),
        name: "Vector Math".to_string(),
        category: NodeCategory::Vector,
        description: "Component-wise vector operation".to_string(),
        inputs: vec![
            Port::input("A", PortType::Vector3),
            Port::input("B", PortType::Vector3),
        ],
        outputs: vec![Port::output("Vector", PortType::Vector3)],
    });

    registry.register(NodeType {
        id: "vector_rotate".to_string(),
        name: "Vector Rotate".to_string(),
        category: NodeCategory::Vector,
        description: "Rotate a vector around a center point".to_string(),
        inputs: vec![
            Port::input("Vector", PortType::Vector3),
            Port::input("Center", PortType::Vector3),
            Port::input("Angle", PortType::Float),
        ],
        outputs: vec![Port::output("Vector", PortType::Vector3)],
    });

    registry.register(NodeType {
        id: "mix".to_string(),
        name: "Mix".to_string(),
        category: NodeCategory::Vector,
        description: "Blend from A to B by factor".to_string(),
        inputs: vec![
            Port::input("Fac", PortType::Float).with_default(PortValue::Float(0.5)),
            Port::input("A", PortType::Vector3),
            Port::input("B", PortType::Vector3),
        ],
        outputs: vec![Port::output("Result", PortType::Vector3)],
    });

    // ========================================================================
    // Converters
    // ========================================================================

    registry.register(NodeType {
        id: "combine_xyz".to_string(),
        name: "Combine XYZ".to_string(),
        category: NodeCategory::Converter,
        description: "Build a vector from components".to_string(),
        inputs: vec![
            Port::input("X", PortType::Float),
            Port::input("Y", PortType::Float),
            Port::input("Z", PortType::Float),
        ],
        outputs: vec![Port::output("Vector", PortType::Vector3)],
    });

    registry.register(NodeType {
        id: "separate_xyz".to_string(),
        name: "Separate XYZ".to_string(),
        category: NodeCategory::Converter,
        description: "Split a vector into components".to_string(),
        inputs: vec![Port::input("Vector", PortType::Vector3)],
        outputs: vec![
            Port::output("X", PortType::Float),
            Port::output("Y", PortType::Float),
            Port::output("Z", PortType::Float),
        ],
    });

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{LiveBinding, SourceId};
    use crate::operation::{MathOp, Operation, RotationAxis, VectorMathOp};

    #[test]
    fn test_every_operation_has_a_type() {
        let registry = create_projection_registry();
        let operations = [
            Operation::GroupInput,
            Operation::GroupOutput,
            Operation::TextureCoordinate { object: None },
            Operation::Value(1.0),
            Operation::BoundValue(LiveBinding::property(SourceId::new(), "lens")),
            Operation::Math { op: MathOp::Add, clamp: false },
            Operation::VectorMath(VectorMathOp::Add),
            Operation::CombineXyz,
            Operation::SeparateXyz,
            Operation::VectorRotate { axis: RotationAxis::Z, invert: false },
            Operation::Mix { clamp: false },
        ];

        for operation in operations {
            let node = registry.create_node(operation.clone()).unwrap();
            if let Some(arity) = operation.arity() {
                assert_eq!(node.inputs.len(), arity, "{}", node.node_type);
            }
        }
    }

    #[test]
    fn test_categories() {
        let registry = create_projection_registry();
        assert_eq!(registry.types_in_category(NodeCategory::Converter).count(), 2);
        assert_eq!(registry.types().count(), 11);
    }
}
