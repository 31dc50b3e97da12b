// SPDX-License-Identifier: MIT OR Apache-2.0
//! Operation kinds a node can perform.
//!
//! Every node carries exactly one [`Operation`]. Pure operations compute
//! their outputs from their inputs alone (see [`Operation::evaluate_pure`]);
//! the remaining kinds read from the evaluation environment (group inputs,
//! the shading position, live host attributes) and are handled by the
//! interpreter in [`crate::evaluation`].

use crate::binding::{LiveBinding, SourceId};
use crate::port::PortValue;
use serde::{Deserialize, Serialize};

/// Scalar math operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathOp {
    /// A + B
    Add,
    /// A - B
    Subtract,
    /// A * B
    Multiply,
    /// A / B, zero when B is zero
    Divide,
    /// 1 if A < B, else 0
    LessThan,
    /// 1 if A > B, else 0
    GreaterThan,
}

impl MathOp {
    /// Apply to two scalars
    pub fn apply(self, a: f32, b: f32) -> f32 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => safe_divide(a, b),
            Self::LessThan => f32::from(u8::from(a < b)),
            Self::GreaterThan => f32::from(u8::from(a > b)),
        }
    }
}

/// Component-wise vector operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VectorMathOp {
    /// A + B
    Add,
    /// A - B
    Subtract,
    /// A * B
    Multiply,
    /// A / B, zero in components where B is zero
    Divide,
}

impl VectorMathOp {
    /// Apply to two vectors
    pub fn apply(self, a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        std::array::from_fn(|i| match self {
            Self::Add => a[i] + b[i],
            Self::Subtract => a[i] - b[i],
            Self::Multiply => a[i] * b[i],
            Self::Divide => safe_divide(a[i], b[i]),
        })
    }
}

/// Axis for [`Operation::VectorRotate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationAxis {
    /// Rotate in the YZ plane
    X,
    /// Rotate in the ZX plane
    Y,
    /// Rotate in the XY plane
    Z,
}

/// Rotate `vector` around `center` by `angle` radians (counter-clockwise
/// when looking down the positive axis).
pub fn rotate_about_axis(vector: [f32; 3], center: [f32; 3], axis: RotationAxis, angle: f32) -> [f32; 3] {
    let [x, y, z] = VectorMathOp::Subtract.apply(vector, center);
    let (sin, cos) = angle.sin_cos();
    let rotated = match axis {
        RotationAxis::X => [x, y * cos - z * sin, y * sin + z * cos],
        RotationAxis::Y => [x * cos + z * sin, y, -x * sin + z * cos],
        RotationAxis::Z => [x * cos - y * sin, x * sin + y * cos, z],
    };
    VectorMathOp::Add.apply(rotated, center)
}

fn safe_divide(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        0.0
    } else {
        a / b
    }
}

/// The operation performed by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// Exposes the graph's declared inputs as outputs
    GroupInput,
    /// Collects the graph's declared outputs
    GroupOutput,
    /// Shading position in the local frame of `object`
    TextureCoordinate {
        /// Reference object, world space when unset
        object: Option<SourceId>,
    },
    /// Constant scalar
    Value(f32),
    /// Scalar read live from a host attribute
    BoundValue(LiveBinding),
    /// Scalar math
    Math {
        /// Operation
        op: MathOp,
        /// Clamp the result to [0, 1]
        clamp: bool,
    },
    /// Component-wise vector math
    VectorMath(VectorMathOp),
    /// Three scalars into a vector
    CombineXyz,
    /// Vector into three scalars
    SeparateXyz,
    /// Rotate a vector around a center point
    VectorRotate {
        /// Rotation axis
        axis: RotationAxis,
        /// Rotate by the negated angle
        invert: bool,
    },
    /// Linear blend between two vectors
    Mix {
        /// Clamp the result to [0, 1]
        clamp: bool,
    },
}

impl Operation {
    /// Node type this operation instantiates from
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::GroupInput => "group_input",
            Self::GroupOutput => "group_output",
            Self::TextureCoordinate { .. } => "texture_coordinate",
            Self::Value(_) => "value",
            Self::BoundValue(_) => "bound_value",
            Self::Math { .. } => "math",
            Self::VectorMath(_) => "vector_math",
            Self::CombineXyz => "combine_xyz",
            Self::SeparateXyz => "separate_xyz",
            Self::VectorRotate { .. } => "vector_rotate",
            Self::Mix { .. } => "mix",
        }
    }

    /// Number of inputs a pure operation reads, `None` for environment-driven kinds
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::GroupInput
            | Self::GroupOutput
            | Self::TextureCoordinate { .. }
            | Self::BoundValue(_) => None,
            Self::Value(_) => Some(0),
            Self::SeparateXyz => Some(1),
            Self::Math { .. } | Self::VectorMath(_) => Some(2),
            Self::CombineXyz | Self::VectorRotate { .. } | Self::Mix { .. } => Some(3),
        }
    }

    /// The live binding carried by this operation, if any
    pub fn binding(&self) -> Option<&LiveBinding> {
        match self {
            Self::BoundValue(binding) => Some(binding),
            _ => None,
        }
    }

    /// Compute outputs from already-resolved inputs.
    ///
    /// Inputs must be in port order and at least [`Operation::arity`] long.
    /// Returns `None` for kinds that need the evaluation environment.
    pub fn evaluate_pure(&self, inputs: &[PortValue]) -> Option<Vec<PortValue>> {
        if inputs.len() < self.arity()? {
            return None;
        }

        let outputs = match self {
            Self::Value(value) => vec![PortValue::Float(*value)],
            Self::Math { op, clamp } => {
                let result = op.apply(inputs[0].as_float(), inputs[1].as_float());
                vec![PortValue::Float(clamp_if(result, *clamp))]
            }
            Self::VectorMath(op) => {
                vec![PortValue::Vector3(op.apply(inputs[0].as_vector(), inputs[1].as_vector()))]
            }
            Self::CombineXyz => vec![PortValue::Vector3([
                inputs[0].as_float(),
                inputs[1].as_float(),
                inputs[2].as_float(),
            ])],
            Self::SeparateXyz => {
                let [x, y, z] = inputs[0].as_vector();
                vec![PortValue::Float(x), PortValue::Float(y), PortValue::Float(z)]
            }
            Self::VectorRotate { axis, invert } => {
                let angle = inputs[2].as_float();
                let angle = if *invert { -angle } else { angle };
                vec![PortValue::Vector3(rotate_about_axis(
                    inputs[0].as_vector(),
                    inputs[1].as_vector(),
                    *axis,
                    angle,
                ))]
            }
            Self::Mix { clamp } => {
                let fac = inputs[0].as_float().clamp(0.0, 1.0);
                let a = inputs[1].as_vector();
                let b = inputs[2].as_vector();
                let mixed: [f32; 3] =
                    std::array::from_fn(|i| clamp_if(a[i] * (1.0 - fac) + b[i] * fac, *clamp));
                vec![PortValue::Vector3(mixed)]
            }
            Self::GroupInput
            | Self::GroupOutput
            | Self::TextureCoordinate { .. }
            | Self::BoundValue(_) => return None,
        };
        Some(outputs)
    }
}

fn clamp_if(value: f32, clamp: bool) -> f32 {
    if clamp {
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn approx(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn test_divide_by_zero_is_zero() {
        assert_eq!(MathOp::Divide.apply(3.0, 0.0), 0.0);
        assert_eq!(VectorMathOp::Divide.apply([1.0, 2.0, 3.0], [1.0, 0.0, 2.0]), [1.0, 0.0, 1.5]);
    }

    #[test]
    fn test_less_than_is_strict() {
        assert_eq!(MathOp::LessThan.apply(0.5, 1.0), 1.0);
        assert_eq!(MathOp::LessThan.apply(1.0, 1.0), 0.0);
        assert_eq!(MathOp::GreaterThan.apply(2.0, 1.0), 1.0);
    }

    #[test]
    fn test_rotate_half_turn_about_z() {
        let rotated = rotate_about_axis([1.0, 0.0, 0.0], [0.0; 3], RotationAxis::Z, PI);
        assert!(approx(rotated, [-1.0, 0.0, 0.0]));

        let rotated = rotate_about_axis([1.0, 2.0, 5.0], [0.0; 3], RotationAxis::Z, PI);
        assert!(approx(rotated, [-1.0, -2.0, 5.0]));
    }

    #[test]
    fn test_rotate_quarter_turn_around_center() {
        let rotated = rotate_about_axis([2.0, 1.0, 0.0], [1.0, 1.0, 0.0], RotationAxis::Z, PI / 2.0);
        assert!(approx(rotated, [1.0, 2.0, 0.0]));

        let rotated = rotate_about_axis([0.0, 1.0, 0.0], [0.0; 3], RotationAxis::X, PI / 2.0);
        assert!(approx(rotated, [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_mix_selects_by_factor() {
        let mix = Operation::Mix { clamp: false };
        let a = PortValue::Vector3([1.0, 2.0, 0.0]);
        let b = PortValue::Vector3([3.0, 4.0, 0.0]);

        let out = mix.evaluate_pure(&[PortValue::Float(0.0), a, b]).unwrap();
        assert_eq!(out, vec![a]);
        let out = mix.evaluate_pure(&[PortValue::Float(1.0), a, b]).unwrap();
        assert_eq!(out, vec![b]);
    }

    #[test]
    fn test_vector_math_broadcasts_scalar() {
        let op = Operation::VectorMath(VectorMathOp::Multiply);
        let out = op
            .evaluate_pure(&[PortValue::Vector3([1.0, -2.0, 3.0]), PortValue::Float(2.0)])
            .unwrap();
        assert_eq!(out, vec![PortValue::Vector3([2.0, -4.0, 6.0])]);
    }

    #[test]
    fn test_inverted_rotation() {
        let op = Operation::VectorRotate { axis: RotationAxis::Z, invert: true };
        let out = op
            .evaluate_pure(&[
                PortValue::Vector3([1.0, 0.0, 0.0]),
                PortValue::Vector3([0.0; 3]),
                PortValue::Float(PI / 2.0),
            ])
            .unwrap();
        assert!(approx(out[0].as_vector(), [0.0, -1.0, 0.0]));
    }

    #[test]
    fn test_environment_kinds_are_not_pure() {
        assert!(Operation::GroupInput.evaluate_pure(&[]).is_none());
        assert!(Operation::TextureCoordinate { object: None }.evaluate_pure(&[]).is_none());
        assert!(Operation::BoundValue(LiveBinding::property(SourceId::new(), "lens"))
            .evaluate_pure(&[])
            .is_none());
    }

    #[test]
    fn test_short_input_list_is_rejected() {
        let op = Operation::Math { op: MathOp::Add, clamp: false };
        assert!(op.evaluate_pure(&[PortValue::Float(1.0)]).is_none());
    }
}
