//! Collision rule registry and dispatcher
//!
//! Rules are keyed by an ordered (collider kind, collidee kind) pair. At
//! dispatch time both entities' kinds are resolved to their nearest
//! registered ancestors, collider side first, then collidee side within the
//! collider's rules. The collider side never backtracks: once a collider key
//! is chosen, only its rules are considered.

use std::collections::HashMap;
use std::rc::Rc;

use super::handler::{CollisionHandler, Inverse, Unit};
use crate::error::Error;
use crate::kind::{KindGraph, KindId, Resolver};
use crate::settings::CollisionSettings;

type HandlerRef<U> = Rc<dyn CollisionHandler<U>>;

/// Registry of collision rules for entities of type `U`
pub struct CollisionMap<U: ?Sized> {
    graph: Rc<KindGraph>,
    settings: CollisionSettings,
    handlers: HashMap<KindId, HashMap<KindId, HandlerRef<U>>>,
}

impl<U: Unit + ?Sized + 'static> CollisionMap<U> {
    /// Create an empty map with default settings
    pub fn new(graph: Rc<KindGraph>) -> Self {
        Self::with_settings(graph, CollisionSettings::default())
    }

    pub fn with_settings(graph: Rc<KindGraph>, settings: CollisionSettings) -> Self {
        Self {
            graph,
            settings,
            handlers: HashMap::new(),
        }
    }

    pub fn graph(&self) -> &KindGraph {
        &self.graph
    }

    pub fn settings(&self) -> &CollisionSettings {
        &self.settings
    }

    /// Register a two-way rule: `handler` also runs, with arguments
    /// swapped back, when a `collidee` kind moves onto a `collider` kind
    pub fn register<F>(
        &mut self,
        collider: KindId,
        collidee: KindId,
        handler: F,
    ) -> Result<(), Error>
    where
        F: Fn(&U, &U) + 'static,
    {
        self.register_with(collider, collidee, true, handler)
    }

    /// Register a rule for `collider` moving onto `collidee` only
    pub fn register_asymmetric<F>(
        &mut self,
        collider: KindId,
        collidee: KindId,
        handler: F,
    ) -> Result<(), Error>
    where
        F: Fn(&U, &U) + 'static,
    {
        self.register_with(collider, collidee, false, handler)
    }

    /// Register a rule, optionally with its mirrored counterpart
    ///
    /// Re-registering a pair replaces the previous handler, unless the map is
    /// strict, in which case the call fails and the map is left unchanged.
    /// A symmetric rule between a kind and itself ends up as its own mirror,
    /// so it runs with the two entities swapped.
    pub fn register_with<H>(
        &mut self,
        collider: KindId,
        collidee: KindId,
        symmetric: bool,
        handler: H,
    ) -> Result<(), Error>
    where
        H: CollisionHandler<U> + 'static,
    {
        if self.settings.strict {
            self.ensure_vacant(collider, collidee)?;
            if symmetric && collider != collidee {
                self.ensure_vacant(collidee, collider)?;
            }
        }

        let handler: HandlerRef<U> = Rc::new(handler);
        self.insert(collider, collidee, Rc::clone(&handler));
        if symmetric {
            self.insert(collidee, collider, Rc::new(Inverse::new(handler)));
        }
        Ok(())
    }

    /// Run the rule matching the two entities' kinds, if any
    ///
    /// Returns whether a handler ran. A pair without a rule is a silent no-op.
    pub fn dispatch(&self, collider: &U, collidee: &U) -> bool {
        let Some((collider_key, collidee_key)) = self.resolve_rule(collider.kind(), collidee.kind())
        else {
            log::trace!(
                "No collision rule for {} vs {}",
                self.graph.label(collider.kind()),
                self.graph.label(collidee.kind())
            );
            return false;
        };

        let Some(handler) = self
            .handlers
            .get(&collider_key)
            .and_then(|rules| rules.get(&collidee_key))
        else {
            return false;
        };

        log::trace!(
            "Collision {} vs {} handled by rule {} vs {}",
            self.graph.label(collider.kind()),
            self.graph.label(collidee.kind()),
            self.graph.label(collider_key),
            self.graph.label(collidee_key)
        );
        handler.handle_collision(collider, collidee);
        true
    }

    /// Dispatch `mover` against each occupant in order, skipping itself
    ///
    /// The mover is recognised by address, so `occupants` must yield the same
    /// instance as `mover`; a clone of the mover is treated as another entity.
    /// Returns the number of collisions that had a rule.
    pub fn collide_all<'a, I>(&self, mover: &U, occupants: I) -> usize
    where
        I: IntoIterator<Item = &'a U>,
        U: 'a,
    {
        occupants
            .into_iter()
            .filter(|occupant| !std::ptr::eq(mover, *occupant))
            .filter(|occupant| self.dispatch(mover, occupant))
            .count()
    }

    /// The registered pair a collision between these kinds would use
    pub fn resolve_rule(&self, collider: KindId, collidee: KindId) -> Option<(KindId, KindId)> {
        let resolver = Resolver::new(&self.graph).with_dedupe(self.settings.dedupe_ancestry);
        let collider_key = resolver.resolve(&self.handlers, collider)?;
        let rules = self.handlers.get(&collider_key)?;
        let collidee_key = resolver.resolve(rules, collidee)?;
        Some((collider_key, collidee_key))
    }

    /// Whether a rule is registered for exactly this ordered pair
    pub fn contains_rule(&self, collider: KindId, collidee: KindId) -> bool {
        self.handlers
            .get(&collider)
            .is_some_and(|rules| rules.contains_key(&collidee))
    }

    /// Number of registered ordered pairs, mirrors included
    pub fn len(&self) -> usize {
        self.handlers.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn ensure_vacant(&self, collider: KindId, collidee: KindId) -> Result<(), Error> {
        if !self.contains_rule(collider, collidee) {
            return Ok(());
        }
        let collider = self.graph.label(collider).to_string();
        let collidee = self.graph.label(collidee).to_string();
        log::warn!("Rejected duplicate collision rule {} vs {}", collider, collidee);
        Err(Error::DuplicateRule { collider, collidee })
    }

    fn insert(&mut self, collider: KindId, collidee: KindId, handler: HandlerRef<U>) {
        let replaced = self
            .handlers
            .entry(collider)
            .or_default()
            .insert(collidee, handler)
            .is_some();

        if replaced {
            log::debug!(
                "Replaced collision rule {} vs {}",
                self.graph.label(collider),
                self.graph.label(collidee)
            );
        } else {
            log::debug!(
                "Registered collision rule {} vs {}",
                self.graph.label(collider),
                self.graph.label(collidee)
            );
        }
    }
}
