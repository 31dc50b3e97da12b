// SPDX-License-Identifier: MIT OR Apache-2.0
//! Live bindings from graph nodes to attributes owned by the host.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a host-owned object or data block that nodes can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(pub Uuid);

impl SourceId {
    /// Create a new random source ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// One-way binding of a node value to a host attribute.
///
/// The value is read through a [`SourceResolver`] each time the graph is
/// evaluated, so changes on the host side show up without rebuilding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LiveBinding {
    /// Data block holding the attribute
    pub source: SourceId,
    /// Attribute path within the data block
    pub path: String,
}

impl LiveBinding {
    /// Create a binding to a property
    pub fn property(source: SourceId, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    /// Read the current value through a resolver
    pub fn read(&self, resolver: &dyn SourceResolver) -> Option<f32> {
        resolver.attribute(self.source, &self.path)
    }
}

/// Host capability used during evaluation to resolve live references.
pub trait SourceResolver {
    /// Current value of a scalar attribute, `None` if the source or path is unknown
    fn attribute(&self, source: SourceId, path: &str) -> Option<f32>;

    /// Transform a world-space point into the local frame of an object
    fn world_to_local(&self, object: SourceId, point: [f32; 3]) -> Option<[f32; 3]>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Knob {
        id: SourceId,
        value: Cell<f32>,
    }

    impl SourceResolver for Knob {
        fn attribute(&self, source: SourceId, path: &str) -> Option<f32> {
            (source == self.id && path == "value").then(|| self.value.get())
        }

        fn world_to_local(&self, _object: SourceId, point: [f32; 3]) -> Option<[f32; 3]> {
            Some(point)
        }
    }

    #[test]
    fn test_binding_reads_current_value() {
        let knob = Knob {
            id: SourceId::new(),
            value: Cell::new(1.0),
        };
        let binding = LiveBinding::property(knob.id, "value");
        assert_eq!(binding.read(&knob), Some(1.0));

        knob.value.set(4.0);
        assert_eq!(binding.read(&knob), Some(4.0));
    }

    #[test]
    fn test_unknown_path_reads_none() {
        let knob = Knob {
            id: SourceId::new(),
            value: Cell::new(1.0),
        };
        assert_eq!(LiveBinding::property(knob.id, "missing").read(&knob), None);
        assert_eq!(LiveBinding::property(SourceId::new(), "value").read(&knob), None);
    }
}
