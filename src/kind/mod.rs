//! Entity kinds and their "is-a" graph
//!
//! Every kind has at most one parent and any number of capability kinds.
//! Kinds are declared once at startup, either through [`KindGraphBuilder`]
//! or from a serialized declaration table, and never change afterwards.

pub mod resolve;

pub use resolve::{Ancestry, Resolver};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Identifier of a kind within a [`KindGraph`]
///
/// Ids are only issued by the graph; they are not serializable, since a
/// stored id would not survive rebuilding the graph from another table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(u32);

impl KindId {
    /// Raw index into the graph that issued this id
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Serialized form of a single kind declaration
///
/// `parent` and `capabilities` name kinds declared earlier in the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindDecl {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone)]
struct KindInfo {
    name: String,
    parent: Option<KindId>,
    capabilities: Vec<KindId>,
}

/// Immutable kind hierarchy
#[derive(Debug, Clone, Default)]
pub struct KindGraph {
    kinds: Vec<KindInfo>,
    by_name: HashMap<String, KindId>,
}

impl KindGraph {
    pub fn builder() -> KindGraphBuilder {
        KindGraphBuilder::default()
    }

    /// Build a graph from a declaration table
    ///
    /// References to names that were not declared earlier are dropped with a
    /// warning; lookups through them simply never match.
    pub fn from_decls(decls: &[KindDecl]) -> Self {
        let mut builder = Self::builder();
        for decl in decls {
            let parent = decl
                .parent
                .as_deref()
                .and_then(|name| builder.lookup_ref(&decl.name, name));
            let capabilities: Vec<KindId> = decl
                .capabilities
                .iter()
                .filter_map(|name| builder.lookup_ref(&decl.name, name))
                .collect();
            builder.declare(&decl.name, parent, &capabilities);
        }
        builder.build()
    }

    /// Parse a JSON array of [`KindDecl`] and build the graph
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let decls: Vec<KindDecl> = serde_json::from_str(json)?;
        Ok(Self::from_decls(&decls))
    }

    pub fn id(&self, name: &str) -> Option<KindId> {
        self.by_name.get(name).copied()
    }

    /// Like [`KindGraph::id`], for kinds the caller cannot do without
    pub fn require(&self, name: &str) -> Result<KindId, Error> {
        self.id(name).ok_or_else(|| Error::UnknownKind(name.to_string()))
    }

    pub fn name(&self, kind: KindId) -> Option<&str> {
        self.kinds.get(kind.index()).map(|k| k.name.as_str())
    }

    /// Direct parent, if any
    pub fn parent(&self, kind: KindId) -> Option<KindId> {
        self.kinds.get(kind.index()).and_then(|k| k.parent)
    }

    /// Directly implemented capability kinds, in declaration order
    pub fn capabilities(&self, kind: KindId) -> &[KindId] {
        self.kinds
            .get(kind.index())
            .map(|k| k.capabilities.as_slice())
            .unwrap_or(&[])
    }

    /// Whether `ancestor` is `kind` itself or reachable from it
    pub fn is_a(&self, kind: KindId, ancestor: KindId) -> bool {
        Resolver::new(self)
            .with_dedupe(true)
            .ancestry(kind)
            .any(|k| k == ancestor)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Human-readable label for logs
    pub(crate) fn label(&self, kind: KindId) -> &str {
        self.name(kind).unwrap_or("<unknown>")
    }
}

/// Incremental constructor for a [`KindGraph`]
///
/// A kind may only reference kinds already declared, which keeps the graph
/// acyclic.
#[derive(Debug, Default)]
pub struct KindGraphBuilder {
    graph: KindGraph,
}

impl KindGraphBuilder {
    /// Declare a kind and return its id
    ///
    /// Declaring a name twice keeps the first declaration.
    pub fn declare(
        &mut self,
        name: &str,
        parent: Option<KindId>,
        capabilities: &[KindId],
    ) -> KindId {
        if let Some(existing) = self.graph.id(name) {
            log::warn!("Kind '{}' declared twice, keeping the first declaration", name);
            return existing;
        }

        let id = KindId(self.graph.kinds.len() as u32);
        self.graph.kinds.push(KindInfo {
            name: name.to_string(),
            parent,
            capabilities: capabilities.to_vec(),
        });
        self.graph.by_name.insert(name.to_string(), id);
        id
    }

    /// Declare a kind with no parent and no capabilities
    pub fn root(&mut self, name: &str) -> KindId {
        self.declare(name, None, &[])
    }

    /// Declare a kind with a single parent
    pub fn child(&mut self, name: &str, parent: KindId) -> KindId {
        self.declare(name, Some(parent), &[])
    }

    pub fn id(&self, name: &str) -> Option<KindId> {
        self.graph.id(name)
    }

    pub fn build(self) -> KindGraph {
        log::info!("Kind graph built with {} kinds", self.graph.len());
        self.graph
    }

    fn lookup_ref(&self, owner: &str, name: &str) -> Option<KindId> {
        let id = self.graph.id(name);
        if id.is_none() {
            log::warn!("Kind '{}' refers to undeclared kind '{}', ignoring", owner, name);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut b = KindGraph::builder();
        let ghost = b.root("Ghost");
        let clyde = b.child("Clyde", ghost);
        let graph = b.build();

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.id("Clyde"), Some(clyde));
        assert_eq!(graph.require("Ghost").unwrap(), ghost);
        assert!(matches!(graph.require("Inky"), Err(Error::UnknownKind(name)) if name == "Inky"));
        assert_eq!(graph.name(ghost), Some("Ghost"));
        assert_eq!(graph.parent(clyde), Some(ghost));
        assert_eq!(graph.parent(ghost), None);
        assert!(graph.is_a(clyde, ghost));
        assert!(!graph.is_a(ghost, clyde));
    }

    #[test]
    fn test_redeclare_keeps_first() {
        let mut b = KindGraph::builder();
        let base = b.root("Base");
        let first = b.root("Thing");
        let second = b.child("Thing", base);
        let graph = b.build();

        assert_eq!(first, second);
        assert_eq!(graph.parent(first), None);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"name": "Unit"},
            {"name": "Edible"},
            {"name": "Pellet", "parent": "Unit", "capabilities": ["Edible"]}
        ]"#;
        let graph = KindGraph::from_json(json).unwrap();
        let pellet = graph.id("Pellet").unwrap();

        assert_eq!(graph.parent(pellet), graph.id("Unit"));
        assert_eq!(graph.capabilities(pellet), &[graph.id("Edible").unwrap()]);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            KindGraph::from_json("{not json"),
            Err(Error::Declaration(_))
        ));
    }

    #[test]
    fn test_undeclared_reference_is_dropped() {
        let decls = vec![KindDecl {
            name: "Orphan".to_string(),
            parent: Some("Missing".to_string()),
            capabilities: vec!["AlsoMissing".to_string()],
        }];
        let graph = KindGraph::from_decls(&decls);
        let orphan = graph.id("Orphan").unwrap();

        assert_eq!(graph.parent(orphan), None);
        assert!(graph.capabilities(orphan).is_empty());
        assert_eq!(graph.id("Missing"), None);
    }

    #[test]
    fn test_unknown_id_has_no_ancestors() {
        let mut b = KindGraph::builder();
        b.root("A");
        b.root("B");
        let big = b.build();
        let small = KindGraph::builder().build();

        let foreign = big.id("B").unwrap();
        assert_eq!(small.name(foreign), None);
        assert_eq!(small.parent(foreign), None);
        assert!(small.capabilities(foreign).is_empty());
    }
}
