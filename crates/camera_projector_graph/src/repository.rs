// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named graph storage.
//!
//! The host owns graphs and hands them out by name. Builders receive the
//! storage as a [`GraphRepository`] so tests can substitute
//! [`InMemoryGraphRepository`].

use crate::graph::{Graph, GraphKind};
use indexmap::IndexMap;

/// Name-keyed graph storage provided by the host
pub trait GraphRepository {
    /// Get a graph by name
    fn get(&self, name: &str) -> Option<&Graph>;

    /// Get a mutable graph by name
    fn get_mut(&mut self, name: &str) -> Option<&mut Graph>;

    /// Store a graph under its own name, replacing any previous entry
    fn insert(&mut self, graph: Graph);

    /// Remove a graph by name
    fn remove(&mut self, name: &str) -> Option<Graph>;

    /// Names of all stored graphs
    fn names(&self) -> Vec<String>;

    /// Check whether a name is taken
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a graph of `kind`, creating an empty one on a miss.
    ///
    /// Fails when the name is held by a graph of a different kind.
    fn get_or_create(&mut self, name: &str, kind: GraphKind) -> Result<&mut Graph, RepositoryError> {
        if let Some(existing) = self.get(name) {
            if existing.kind != kind {
                return Err(RepositoryError::KindMismatch {
                    name: name.to_string(),
                    expected: kind,
                    found: existing.kind,
                });
            }
            tracing::debug!(graph = name, "Reusing existing graph");
        } else {
            tracing::info!(graph = name, ?kind, "Creating graph");
            self.insert(Graph::new(name, kind));
        }

        self.get_mut(name)
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }
}

/// Graph storage kept in memory, in creation order
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphRepository {
    graphs: IndexMap<String, Graph>,
}

impl InMemoryGraphRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored graphs
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the repository is empty
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// All stored graphs
    pub fn graphs(&self) -> impl Iterator<Item = &Graph> {
        self.graphs.values()
    }
}

impl GraphRepository for InMemoryGraphRepository {
    fn get(&self, name: &str) -> Option<&Graph> {
        self.graphs.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Graph> {
        self.graphs.get_mut(name)
    }

    fn insert(&mut self, graph: Graph) {
        self.graphs.insert(graph.name.clone(), graph);
    }

    fn remove(&mut self, name: &str) -> Option<Graph> {
        self.graphs.shift_remove(name)
    }

    fn names(&self) -> Vec<String> {
        self.graphs.keys().cloned().collect()
    }
}

/// Error from graph storage
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The name is held by a graph of another kind
    #[error("Graph '{name}' exists as {found:?}, expected {expected:?}")]
    KindMismatch {
        /// Requested name
        name: String,
        /// Requested kind
        expected: GraphKind,
        /// Kind already stored under the name
        found: GraphKind,
    },

    /// Graph vanished between insert and lookup
    #[error("Graph not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_reuses_by_name() {
        let mut repo = InMemoryGraphRepository::new();
        repo.get_or_create("Camera Project | Camera", GraphKind::Shader).unwrap();
        repo.get_or_create("Camera Project | Camera", GraphKind::Shader).unwrap();
        repo.get_or_create("Camera Project | Camera.001", GraphKind::Shader).unwrap();

        assert_eq!(repo.len(), 2);
        assert_eq!(
            repo.names(),
            vec!["Camera Project | Camera".to_string(), "Camera Project | Camera.001".to_string()]
        );
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let mut repo = InMemoryGraphRepository::new();
        repo.insert(Graph::new("Taken", GraphKind::Geometry));

        let err = repo.get_or_create("Taken", GraphKind::Shader).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::KindMismatch { found: GraphKind::Geometry, expected: GraphKind::Shader, .. }
        ));
        assert_eq!(repo.get("Taken").unwrap().kind, GraphKind::Geometry);
    }

    #[test]
    fn test_remove() {
        let mut repo = InMemoryGraphRepository::new();
        repo.insert(Graph::new("A", GraphKind::Shader));
        assert!(repo.contains("A"));
        assert!(repo.remove("A").is_some());
        assert!(!repo.contains("A"));
        assert!(repo.is_empty());
    }
}
