// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation.
//!
//! [`Interpreter`] is a reference evaluator for the closed set of
//! [`Operation`]s. It evaluates a graph for a single shading point, reading
//! live bindings through the host's [`SourceResolver`] at evaluation time.

use crate::binding::SourceResolver;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::operation::Operation;
use crate::port::{PortId, PortValue};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Result of evaluating a node
#[derive(Debug, Clone)]
pub struct NodeOutput {
    /// Output values by port ID
    pub values: HashMap<PortId, PortValue>,
}

impl NodeOutput {
    /// Create a new empty output
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set an output value
    pub fn set(&mut self, port_id: PortId, value: PortValue) {
        self.values.insert(port_id, value);
    }

    /// Get an output value
    pub fn get(&self, port_id: &PortId) -> Option<&PortValue> {
        self.values.get(port_id)
    }
}

impl Default for NodeOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything outside the graph that evaluation may read
pub struct EvaluationEnvironment<'a> {
    /// Host objects and attributes
    pub resolver: &'a dyn SourceResolver,
    /// World-space shading position
    pub position: [f32; 3],
    /// Values for group inputs, overriding the interface defaults
    pub group_inputs: HashMap<String, PortValue>,
}

impl<'a> EvaluationEnvironment<'a> {
    /// Environment for one shading position
    pub fn new(resolver: &'a dyn SourceResolver, position: [f32; 3]) -> Self {
        Self {
            resolver,
            position,
            group_inputs: HashMap::new(),
        }
    }

    /// Override a group input
    pub fn with_group_input(mut self, name: impl Into<String>, value: PortValue) -> Self {
        self.group_inputs.insert(name.into(), value);
        self
    }
}

/// Context for graph evaluation
pub struct EvaluationContext<'a> {
    /// The graph being evaluated
    pub graph: &'a Graph,
    /// The environment being evaluated in
    pub env: &'a EvaluationEnvironment<'a>,
    /// Cached node outputs
    outputs: HashMap<NodeId, NodeOutput>,
    /// Evaluation order
    order: Vec<NodeId>,
}

impl<'a> EvaluationContext<'a> {
    /// Create a new evaluation context
    pub fn new(graph: &'a Graph, env: &'a EvaluationEnvironment<'a>) -> Result<Self, EvaluationError> {
        let order = graph.topological_order()
            .map_err(|_| EvaluationError::CycleDetected)?;

        Ok(Self {
            graph,
            env,
            outputs: HashMap::new(),
            order,
        })
    }

    /// Get the linked value arriving at an input port
    pub fn get_input(&self, node_id: NodeId, port_id: PortId) -> Option<PortValue> {
        let connection = self.graph.connection_to(node_id, port_id)?;
        let source_output = self.outputs.get(&connection.from_node)?;
        source_output.get(&connection.from_port).copied()
    }

    /// Get the linked value, or the port's own default, converted to the port's type
    pub fn get_input_or_default(&self, node_id: NodeId, port_id: PortId) -> Result<PortValue, EvaluationError> {
        let node = self.graph.node(node_id).ok_or(EvaluationError::NodeNotFound(node_id))?;
        let port = node.port(&port_id).ok_or(EvaluationError::MissingInput(port_id))?;
        let value = self.get_input(node_id, port_id).unwrap_or_else(|| port.fallback_value());
        Ok(value.coerce(port.port_type))
    }

    /// Resolve every input of a node in port order
    pub fn resolve_inputs(&self, node_id: NodeId) -> Result<Vec<PortValue>, EvaluationError> {
        let node = self.graph.node(node_id).ok_or(EvaluationError::NodeNotFound(node_id))?;
        node.inputs
            .iter()
            .map(|port| self.get_input_or_default(node_id, port.id))
            .collect()
    }

    /// Set the output for a node
    pub fn set_output(&mut self, node_id: NodeId, output: NodeOutput) {
        self.outputs.insert(node_id, output);
    }

    /// Get the evaluation order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Get all outputs
    pub fn outputs(&self) -> &HashMap<NodeId, NodeOutput> {
        &self.outputs
    }

    /// Evaluate every node in order and collect the results
    pub fn run(mut self, evaluator: &dyn NodeEvaluator) -> Result<GraphEvaluation, EvaluationError> {
        let order = self.order.clone();
        for node_id in order {
            let output = evaluator.evaluate(node_id, &mut self)?;
            self.set_output(node_id, output);
        }

        let mut result = GraphEvaluation::default();
        for node in self.graph.nodes() {
            if node.operation == Operation::GroupOutput && result.outputs.is_empty() {
                for port in &node.inputs {
                    result.outputs.insert(port.name.clone(), self.get_input_or_default(node.id, port.id)?);
                }
            }

            let Some(output) = self.outputs.get(&node.id) else {
                continue;
            };
            let by_name = node.outputs
                .iter()
                .filter_map(|port| output.get(&port.id).map(|v| (port.name.clone(), *v)))
                .collect();
            result.nodes.insert(node.id, by_name);
        }
        Ok(result)
    }
}

/// Trait for evaluating nodes
pub trait NodeEvaluator {
    /// Evaluate a node and produce outputs
    fn evaluate(&self, node_id: NodeId, ctx: &mut EvaluationContext) -> Result<NodeOutput, EvaluationError>;
}

/// Reference evaluator for the built-in operations
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter;

impl NodeEvaluator for Interpreter {
    fn evaluate(&self, node_id: NodeId, ctx: &mut EvaluationContext) -> Result<NodeOutput, EvaluationError> {
        let node = ctx.graph.node(node_id).ok_or(EvaluationError::NodeNotFound(node_id))?;
        let env = ctx.env;

        let values = match &node.operation {
            Operation::GroupInput => node.outputs
                .iter()
                .map(|port| {
                    env.group_inputs
                        .get(&port.name)
                        .copied()
                        .or_else(|| ctx.graph.interface().get(&port.name).map(|s| s.default_value))
                        .map(|v| v.coerce(port.port_type))
                        .ok_or_else(|| EvaluationError::MissingGroupInput(port.name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Operation::GroupOutput => Vec::new(),
            Operation::TextureCoordinate { object } => {
                let local = match object {
                    Some(object) => env.resolver
                        .world_to_local(*object, env.position)
                        .ok_or(EvaluationError::UnresolvedObject(node_id))?,
                    None => env.position,
                };
                vec![PortValue::Vector3(local)]
            }
            Operation::BoundValue(binding) => {
                let value = binding
                    .read(env.resolver)
                    .ok_or_else(|| EvaluationError::UnresolvedBinding(binding.path.clone()))?;
                vec![PortValue::Float(value)]
            }
            operation => {
                let inputs = ctx.resolve_inputs(node_id)?;
                operation
                    .evaluate_pure(&inputs)
                    .ok_or(EvaluationError::ArityMismatch(node_id))?
            }
        };

        let mut output = NodeOutput::new();
        for (port, value) in node.outputs.iter().zip(values) {
            output.set(port.id, value.coerce(port.port_type));
        }
        Ok(output)
    }
}

/// Values produced by one evaluation
#[derive(Debug, Clone, Default)]
pub struct GraphEvaluation {
    /// Group outputs by socket name
    pub outputs: IndexMap<String, PortValue>,
    /// Node outputs by port name
    pub nodes: HashMap<NodeId, IndexMap<String, PortValue>>,
}

impl GraphEvaluation {
    /// A group output value
    pub fn output(&self, name: &str) -> Option<PortValue> {
        self.outputs.get(name).copied()
    }

    /// An internal node's output value
    pub fn node_value(&self, node_id: NodeId, port: &str) -> Option<PortValue> {
        self.nodes.get(&node_id)?.get(port).copied()
    }
}

/// Evaluate a graph with the reference [`Interpreter`]
pub fn evaluate(graph: &Graph, env: &EvaluationEnvironment<'_>) -> Result<GraphEvaluation, EvaluationError> {
    EvaluationContext::new(graph, env)?.run(&Interpreter)
}

/// Error during evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// Graph contains a cycle
    #[error("Graph contains a cycle")]
    CycleDetected,

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Missing required input
    #[error("Missing required input: {0:?}")]
    MissingInput(PortId),

    /// Group input has neither an override nor an interface default
    #[error("Missing group input: {0}")]
    MissingGroupInput(String),

    /// Referenced object could not be resolved by the host
    #[error("Unresolved object reference on node {0:?}")]
    UnresolvedObject(NodeId),

    /// Bound attribute could not be read
    #[error("Unresolved live binding: {0}")]
    UnresolvedBinding(String),

    /// Node has fewer inputs than its operation needs
    #[error("Operation arity mismatch on node {0:?}")]
    ArityMismatch(NodeId),
}
