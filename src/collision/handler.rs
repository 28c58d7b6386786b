//! Collision handlers and the argument-swapping adapter

use std::rc::Rc;

use crate::kind::KindId;

/// A movable game entity with a fixed runtime kind
pub trait Unit {
    fn kind(&self) -> KindId;
}

/// Behavior run when a collider moves onto a collidee
pub trait CollisionHandler<U: ?Sized> {
    fn handle_collision(&self, collider: &U, collidee: &U);
}

impl<U: ?Sized, F> CollisionHandler<U> for F
where
    F: Fn(&U, &U),
{
    fn handle_collision(&self, collider: &U, collidee: &U) {
        self(collider, collidee)
    }
}

/// Mirror of a handler registered for the opposite kind order
///
/// Called as `(b, a)`, it runs the wrapped handler as `(a, b)`.
pub struct Inverse<U: ?Sized> {
    handler: Rc<dyn CollisionHandler<U>>,
}

impl<U: ?Sized> Inverse<U> {
    pub fn new(handler: Rc<dyn CollisionHandler<U>>) -> Self {
        Self { handler }
    }
}

impl<U: ?Sized> CollisionHandler<U> for Inverse<U> {
    fn handle_collision(&self, collider: &U, collidee: &U) {
        self.handler.handle_collision(collidee, collider);
    }
}
