// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-independent description of the camera projection graph.
//!
//! [`describe`] lays out the whole network as plain data: interface sockets,
//! node specs and edge specs. Nothing here touches a repository; the
//! [`super::materialize`] module applies a description to a live graph.
//!
//! The network maps a shading position to the UV coordinate it has when
//! seen through the camera:
//!
//! ```text
//! p      = camera-space position
//! zoom   = -(lens / sensor_width)
//! v      = (p.x / p.z, p.y / p.z, p.z) * zoom - (shift_x, shift_y, 0)
//! v      = rotate_z(v - (loc_x, loc_y, 0), radians(rotation))
//! basis  = aspect < 1 ? (1, aspect, 0) : (1 / aspect, 1, 0)
//! uv     = v * basis + (0.5, 0.5, 0)
//! ```

use crate::binding::{LiveBinding, SourceId};
use crate::interface::InterfaceSocket;
use crate::operation::{MathOp, Operation, RotationAxis, VectorMathOp};
use crate::port::{PortType, PortValue};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Interface socket names
pub mod sockets {
    /// Aspect ratio input
    pub const ASPECT_RATIO: &str = "Aspect Ratio";
    /// Rotation input, in degrees
    pub const ROTATION: &str = "Rotation";
    /// Horizontal user offset
    pub const LOC_X: &str = "Loc X";
    /// Vertical user offset
    pub const LOC_Y: &str = "Loc Y";
    /// UV output
    pub const VECTOR: &str = "Vector";
}

/// Camera data attributes followed by bound nodes
pub mod attributes {
    /// Focal length in millimeters
    pub const LENS: &str = "lens";
    /// Sensor width in millimeters
    pub const SENSOR_WIDTH: &str = "sensor_width";
    /// Horizontal lens shift
    pub const SHIFT_X: &str = "shift_x";
    /// Vertical lens shift
    pub const SHIFT_Y: &str = "shift_y";

    /// All attributes a camera must expose
    pub const REQUIRED: [&str; 4] = [LENS, SENSOR_WIDTH, SHIFT_X, SHIFT_Y];
}

/// Node keys, stable across rebuilds
pub mod keys {
    #![allow(missing_docs)]
    pub const GROUP_INPUT: &str = "group_input";
    pub const CAMERA_TRANSFORM: &str = "camera_transform";
    pub const LENS: &str = "lens";
    pub const SENSOR_WIDTH: &str = "sensor_width";
    pub const LENS_SHIFT_X: &str = "lens_shift_x";
    pub const LENS_SHIFT_Y: &str = "lens_shift_y";
    pub const ZOOM_1: &str = "zoom_1";
    pub const ZOOM_2: &str = "zoom_2";
    pub const LENS_SHIFT_1: &str = "lens_shift_1";
    pub const TO_RADIANS: &str = "to_radians";
    pub const USER_LOCATION: &str = "user_location";
    pub const PERSPECTIVE_1: &str = "perspective_1";
    pub const PERSPECTIVE_2: &str = "perspective_2";
    pub const PERSPECTIVE_3: &str = "perspective_3";
    pub const PERSPECTIVE_4: &str = "perspective_4";
    pub const ZOOM_3: &str = "zoom_3";
    pub const LENS_SHIFT_2: &str = "lens_shift_2";
    pub const USER_TRANSLATE: &str = "user_translate";
    pub const USER_ROTATE: &str = "user_rotate";
    pub const ASPECT_RATIO_1: &str = "aspect_ratio_1";
    pub const ASPECT_RATIO_2: &str = "aspect_ratio_2";
    pub const ASPECT_RATIO_DIV: &str = "aspect_ratio_div";
    pub const ASPECT_RATIO_LT: &str = "aspect_ratio_lt";
    pub const ASPECT_RATIO_SWITCH: &str = "aspect_ratio_switch";
    pub const USER_TRANSFORMS: &str = "user_transforms";
    pub const RECENTER: &str = "recenter";
    pub const GROUP_OUTPUT: &str = "group_output";
}

/// The camera a description is built for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTarget {
    /// Graph name
    pub graph_name: String,
    /// Camera object, for the camera-space transform
    pub object: SourceId,
    /// Camera data block, for live lens and shift values
    pub data: SourceId,
    /// Initial value of the aspect ratio input
    pub default_aspect: f32,
}

/// Node placement settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal distance between node columns
    pub column_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { column_spacing: 250.0 }
    }
}

/// One node to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Key used by edges
    pub key: String,
    /// Display label
    pub label: String,
    /// Operation, including any bindings
    pub operation: Operation,
    /// Layout position
    pub position: [f32; 2],
    /// Constant values for unlinked inputs, by input name
    pub defaults: Vec<(String, PortValue)>,
}

/// Where an edge starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeSource {
    /// Output of an internal node
    Node {
        /// Node key
        key: String,
        /// Output port name
        output: String,
    },
    /// Declared graph input
    GroupInput {
        /// Interface socket name
        socket: String,
    },
}

/// Where an edge ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeTarget {
    /// Input of an internal node
    Node {
        /// Node key
        key: String,
        /// Input port name
        input: String,
    },
    /// Declared graph output
    GroupOutput {
        /// Interface socket name
        socket: String,
    },
}

/// One link to create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    /// Upstream end
    pub from: EdgeSource,
    /// Downstream end
    pub to: EdgeTarget,
}

/// Complete, host-independent description of a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    /// Graph name
    pub name: String,
    /// Interface sockets to declare if absent
    pub interface: Vec<InterfaceSocket>,
    /// Nodes in creation order
    pub nodes: Vec<NodeSpec>,
    /// Links in creation order
    pub edges: Vec<EdgeSpec>,
}

impl GraphDescription {
    /// Find a node spec by key
    pub fn node(&self, key: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Edges feeding a node
    pub fn edges_into<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a EdgeSpec> + 'a {
        self.edges.iter().filter(move |e| matches!(&e.to, EdgeTarget::Node { key: k, .. } if k == key))
    }
}

struct Builder {
    nodes: Vec<NodeSpec>,
    edges: Vec<EdgeSpec>,
    column_spacing: f32,
}

impl Builder {
    fn node(&mut self, key: &str, label: &str, operation: Operation, column: u8, y: f32) -> &mut NodeSpec {
        self.nodes.push(NodeSpec {
            key: key.to_string(),
            label: label.to_string(),
            operation,
            position: [f32::from(column) * self.column_spacing, y],
            defaults: Vec::new(),
        });
        let last = self.nodes.len() - 1;
        &mut self.nodes[last]
    }

    fn link(&mut self, from: &str, output: &str, to: &str, input: &str) {
        self.edges.push(EdgeSpec {
            from: EdgeSource::Node { key: from.to_string(), output: output.to_string() },
            to: EdgeTarget::Node { key: to.to_string(), input: input.to_string() },
        });
    }

    fn link_input(&mut self, socket: &str, to: &str, input: &str) {
        self.edges.push(EdgeSpec {
            from: EdgeSource::GroupInput { socket: socket.to_string() },
            to: EdgeTarget::Node { key: to.to_string(), input: input.to_string() },
        });
    }

    fn link_output(&mut self, from: &str, output: &str, socket: &str) {
        self.edges.push(EdgeSpec {
            from: EdgeSource::Node { key: from.to_string(), output: output.to_string() },
            to: EdgeTarget::GroupOutput { socket: socket.to_string() },
        });
    }
}

impl NodeSpec {
    fn with(&mut self, input: &str, value: PortValue) -> &mut Self {
        self.defaults.push((input.to_string(), value));
        self
    }
}

fn math(op: MathOp) -> Operation {
    Operation::Math { op, clamp: false }
}

/// Describe the projection graph for a camera.
///
/// Nodes are listed leaf to root: scalar sources, then the combinational
/// nodes feeding the main chain, then the perspective divide, zoom and
/// shift, user transform, aspect correction and recentering.
pub fn describe(target: &ProjectionTarget, layout: &LayoutConfig) -> GraphDescription {
    use keys::*;

    let interface = vec![
        InterfaceSocket::input(sockets::ASPECT_RATIO, PortType::Float)
            .with_default(PortValue::Float(target.default_aspect)),
        InterfaceSocket::input(sockets::ROTATION, PortType::Float),
        InterfaceSocket::input(sockets::LOC_X, PortType::Float),
        InterfaceSocket::input(sockets::LOC_Y, PortType::Float),
        InterfaceSocket::output(sockets::VECTOR, PortType::Vector3),
    ];

    let mut b = Builder {
        nodes: Vec::new(),
        edges: Vec::new(),
        column_spacing: layout.column_spacing,
    };
    let bound = |path: &str| Operation::BoundValue(LiveBinding::property(target.data, path));

    // Scalar sources
    b.node(GROUP_INPUT, "Group Input", Operation::GroupInput, 0, -1500.0);
    b.node(
        CAMERA_TRANSFORM,
        "Camera Transform",
        Operation::TextureCoordinate { object: Some(target.object) },
        0,
        0.0,
    );
    b.node(LENS, "Lens", bound(attributes::LENS), 0, -700.0);
    b.node(SENSOR_WIDTH, "Sensor Width", bound(attributes::SENSOR_WIDTH), 0, -900.0);
    b.node(LENS_SHIFT_X, "Lens Shift X", bound(attributes::SHIFT_X), 0, -1100.0);
    b.node(LENS_SHIFT_Y, "Lens Shift Y", bound(attributes::SHIFT_Y), 0, -1300.0);

    // Combinational nodes off the main chain
    b.node(ZOOM_1, "Zoom 1", math(MathOp::Divide), 1, -700.0);
    b.node(ZOOM_2, "Zoom 2", math(MathOp::Multiply), 2, -700.0)
        .with("B", PortValue::Float(-1.0));
    b.node(LENS_SHIFT_1, "Lens Shift 1", Operation::CombineXyz, 1, -1100.0)
        .with("Z", PortValue::Float(0.0));
    b.node(TO_RADIANS, "Degrees to Radians", math(MathOp::Multiply), 1, -1500.0)
        .with("B", PortValue::Float(PI / 180.0));
    b.node(USER_LOCATION, "User Location", Operation::CombineXyz, 1, -1700.0)
        .with("Z", PortValue::Float(0.0));

    // Perspective divide
    b.node(PERSPECTIVE_1, "Perspective 1", Operation::SeparateXyz, 3, 0.0);
    b.node(PERSPECTIVE_2, "Perspective 2", math(MathOp::Divide), 4, 0.0);
    b.node(PERSPECTIVE_3, "Perspective 3", math(MathOp::Divide), 4, -200.0);
    b.node(PERSPECTIVE_4, "Perspective 4", Operation::CombineXyz, 5, 0.0);

    // Zoom and lens shift
    b.node(ZOOM_3, "Zoom 3", Operation::VectorMath(VectorMathOp::Multiply), 6, 0.0);
    b.node(LENS_SHIFT_2, "Lens Shift 2", Operation::VectorMath(VectorMathOp::Subtract), 7, 0.0);

    // User transform
    b.node(USER_TRANSLATE, "User Translate", Operation::VectorMath(VectorMathOp::Subtract), 8, 0.0);
    b.node(
        USER_ROTATE,
        "User Rotate",
        Operation::VectorRotate { axis: RotationAxis::Z, invert: false },
        9,
        0.0,
    )
    .with("Center", PortValue::Vector3([0.0, 0.0, 0.0]));

    // Aspect correction
    b.node(ASPECT_RATIO_1, "Aspect Ratio 1", Operation::CombineXyz, 8, -700.0)
        .with("X", PortValue::Float(1.0))
        .with("Z", PortValue::Float(0.0));
    b.node(ASPECT_RATIO_2, "Aspect Ratio 2", Operation::CombineXyz, 8, -850.0)
        .with("Y", PortValue::Float(1.0))
        .with("Z", PortValue::Float(0.0));
    b.node(ASPECT_RATIO_DIV, "Divide", math(MathOp::Divide), 7, -850.0)
        .with("A", PortValue::Float(1.0));
    b.node(ASPECT_RATIO_LT, "Less Than", math(MathOp::LessThan), 8, -500.0)
        .with("B", PortValue::Float(1.0));
    b.node(ASPECT_RATIO_SWITCH, "Aspect Ratio Switch", Operation::Mix { clamp: false }, 9, -600.0);
    b.node(USER_TRANSFORMS, "User Transforms", Operation::VectorMath(VectorMathOp::Multiply), 10, 0.0);

    // Recenter
    b.node(RECENTER, "Recenter", Operation::VectorMath(VectorMathOp::Add), 11, 0.0)
        .with("B", PortValue::Vector3([0.5, 0.5, 0.0]));
    b.node(GROUP_OUTPUT, "Group Output", Operation::GroupOutput, 12, 0.0);

    // Zoom factor and shift vector
    b.link(CAMERA_TRANSFORM, "Object", PERSPECTIVE_1, "Vector");
    b.link(LENS, "Value", ZOOM_1, "A");
    b.link(SENSOR_WIDTH, "Value", ZOOM_1, "B");
    b.link(ZOOM_1, "Value", ZOOM_2, "A");
    b.link(ZOOM_2, "Value", ZOOM_3, "B");
    b.link(LENS_SHIFT_X, "Value", LENS_SHIFT_1, "X");
    b.link(LENS_SHIFT_Y, "Value", LENS_SHIFT_1, "Y");
    b.link(LENS_SHIFT_1, "Vector", LENS_SHIFT_2, "B");

    // External parameters
    b.link_input(sockets::ASPECT_RATIO, ASPECT_RATIO_1, "Y");
    b.link_input(sockets::ASPECT_RATIO, ASPECT_RATIO_DIV, "B");
    b.link_input(sockets::ASPECT_RATIO, ASPECT_RATIO_LT, "A");
    b.link_input(sockets::ROTATION, TO_RADIANS, "A");
    b.link(TO_RADIANS, "Value", USER_ROTATE, "Angle");
    b.link_input(sockets::LOC_X, USER_LOCATION, "X");
    b.link_input(sockets::LOC_Y, USER_LOCATION, "Y");
    b.link(USER_LOCATION, "Vector", USER_TRANSLATE, "B");

    // Main chain
    b.link(PERSPECTIVE_1, "X", PERSPECTIVE_2, "A");
    b.link(PERSPECTIVE_1, "Y", PERSPECTIVE_3, "A");
    b.link(PERSPECTIVE_1, "Z", PERSPECTIVE_2, "B");
    b.link(PERSPECTIVE_1, "Z", PERSPECTIVE_3, "B");
    b.link(PERSPECTIVE_1, "Z", PERSPECTIVE_4, "Z");
    b.link(PERSPECTIVE_2, "Value", PERSPECTIVE_4, "X");
    b.link(PERSPECTIVE_3, "Value", PERSPECTIVE_4, "Y");
    b.link(PERSPECTIVE_4, "Vector", ZOOM_3, "A");
    b.link(ZOOM_3, "Vector", LENS_SHIFT_2, "A");
    b.link(LENS_SHIFT_2, "Vector", USER_TRANSLATE, "A");

    // Aspect branch: factor 1 (aspect below one) picks the (1, aspect) basis
    b.link(ASPECT_RATIO_DIV, "Value", ASPECT_RATIO_2, "X");
    b.link(ASPECT_RATIO_2, "Vector", ASPECT_RATIO_SWITCH, "A");
    b.link(ASPECT_RATIO_1, "Vector", ASPECT_RATIO_SWITCH, "B");
    b.link(ASPECT_RATIO_LT, "Value", ASPECT_RATIO_SWITCH, "Fac");

    b.link(USER_TRANSLATE, "Vector", USER_ROTATE, "Vector");
    b.link(USER_ROTATE, "Vector", USER_TRANSFORMS, "A");
    b.link(ASPECT_RATIO_SWITCH, "Result", USER_TRANSFORMS, "B");
    b.link(USER_TRANSFORMS, "Vector", RECENTER, "A");
    b.link_output(RECENTER, "Vector", sockets::VECTOR);

    GraphDescription {
        name: target.graph_name.clone(),
        interface,
        nodes: b.nodes,
        edges: b.edges,
    }
}
