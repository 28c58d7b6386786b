//! Most-specific kind resolution
//!
//! Walks a kind's ancestors breadth-first (the kind itself, then its parent,
//! then its capabilities, then the next level up) and returns the first one
//! present in a key set. Nearer ancestors therefore always win over more
//! general ones without any explicit priority.

use std::collections::{HashMap, HashSet, VecDeque};

use super::{KindGraph, KindId};

/// Finds the nearest registered ancestor of a kind
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'g> {
    graph: &'g KindGraph,
    dedupe: bool,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g KindGraph) -> Self {
        Self {
            graph,
            dedupe: false,
        }
    }

    /// Skip kinds already visited through another path
    ///
    /// Only removes repeats from the walk; the resolved kind is unchanged.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Breadth-first linearization of `kind` and its ancestors
    pub fn ancestry(&self, kind: KindId) -> Ancestry<'g> {
        let mut queue = VecDeque::with_capacity(8);
        queue.push_back(kind);
        let visited = self.dedupe.then(|| HashSet::from([kind]));
        Ancestry {
            graph: self.graph,
            queue,
            visited,
        }
    }

    /// First kind in the ancestry of `kind` that is a key of `keys`
    pub fn resolve<V>(&self, keys: &HashMap<KindId, V>, kind: KindId) -> Option<KindId> {
        self.ancestry(kind).find(|k| keys.contains_key(k))
    }
}

/// Lazy iterator over a kind's ancestry, see [`Resolver::ancestry`]
#[derive(Debug, Clone)]
pub struct Ancestry<'g> {
    graph: &'g KindGraph,
    queue: VecDeque<KindId>,
    visited: Option<HashSet<KindId>>,
}

impl Ancestry<'_> {
    fn enqueue(&mut self, kind: KindId) {
        if let Some(visited) = &mut self.visited {
            if !visited.insert(kind) {
                return;
            }
        }
        self.queue.push_back(kind);
    }
}

impl Iterator for Ancestry<'_> {
    type Item = KindId;

    fn next(&mut self) -> Option<KindId> {
        let current = self.queue.pop_front()?;

        // Parent before capabilities
        if let Some(parent) = self.graph.parent(current) {
            self.enqueue(parent);
        }
        let graph = self.graph;
        for &capability in graph.capabilities(current) {
            self.enqueue(capability);
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Diamond: Sprite -> {Moving, Drawable}, both capability kinds share Entity
    fn diamond() -> (KindGraph, [KindId; 5]) {
        let mut b = KindGraph::builder();
        let entity = b.root("Entity");
        let moving = b.child("Moving", entity);
        let drawable = b.child("Drawable", entity);
        let base = b.root("Base");
        let sprite = b.declare("Sprite", Some(base), &[moving, drawable]);
        (b.build(), [entity, moving, drawable, base, sprite])
    }

    #[test]
    fn test_ancestry_order() {
        let (graph, [entity, moving, drawable, base, sprite]) = diamond();
        let order: Vec<KindId> = Resolver::new(&graph).ancestry(sprite).collect();
        // Entity is reached through both capability kinds
        assert_eq!(order, vec![sprite, base, moving, drawable, entity, entity]);
    }

    #[test]
    fn test_ancestry_dedupe() {
        let (graph, [entity, moving, drawable, base, sprite]) = diamond();
        let order: Vec<KindId> = Resolver::new(&graph)
            .with_dedupe(true)
            .ancestry(sprite)
            .collect();
        assert_eq!(order, vec![sprite, base, moving, drawable, entity]);
    }

    #[test]
    fn test_parent_level_before_grandparent() {
        let mut b = KindGraph::builder();
        let grand = b.root("Grand");
        let cap = b.root("Cap");
        let parent = b.child("Parent", grand);
        let kind = b.declare("Kind", Some(parent), &[cap]);
        let graph = b.build();

        let order: Vec<KindId> = Resolver::new(&graph).ancestry(kind).collect();
        assert_eq!(order, vec![kind, parent, cap, grand]);
    }

    #[test]
    fn test_resolve_most_specific() {
        let mut b = KindGraph::builder();
        let ghost = b.root("Ghost");
        let clyde = b.child("Clyde", ghost);
        let blinky = b.child("Blinky", ghost);
        let player = b.root("Player");
        let graph = b.build();

        let keys: HashMap<KindId, ()> = [(ghost, ()), (clyde, ())].into();
        let resolver = Resolver::new(&graph);

        assert_eq!(resolver.resolve(&keys, clyde), Some(clyde));
        assert_eq!(resolver.resolve(&keys, blinky), Some(ghost));
        assert_eq!(resolver.resolve(&keys, player), None);
    }

    #[test]
    fn test_resolve_empty_keys() {
        let (graph, [.., sprite]) = diamond();
        let keys: HashMap<KindId, ()> = HashMap::new();
        assert_eq!(Resolver::new(&graph).resolve(&keys, sprite), None);
    }

    /// Builds a single-parent chain, returning ids from root to leaf
    fn chain(depth: usize) -> (KindGraph, Vec<KindId>) {
        let mut b = KindGraph::builder();
        let mut ids = vec![b.root("K0")];
        for i in 1..depth {
            let parent = ids[i - 1];
            ids.push(b.child(&format!("K{}", i), parent));
        }
        (b.build(), ids)
    }

    proptest! {
        #[test]
        fn prop_nearest_registered_ancestor_wins(
            depth in 1usize..8,
            registered in proptest::collection::vec(any::<bool>(), 8),
            dedupe in any::<bool>(),
        ) {
            let (graph, ids) = chain(depth);
            let keys: HashMap<KindId, ()> = ids
                .iter()
                .zip(&registered)
                .filter(|(_, r)| **r)
                .map(|(id, _)| (*id, ()))
                .collect();

            let leaf = ids[depth - 1];
            let expected = ids.iter().rev().find(|id| keys.contains_key(*id)).copied();
            let resolved = Resolver::new(&graph).with_dedupe(dedupe).resolve(&keys, leaf);
            prop_assert_eq!(resolved, expected);
        }
    }
}
