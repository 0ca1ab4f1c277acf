//! Identity and client back-reference shared by every entity.

use crate::client::Client;
use std::fmt;
use std::sync::{Arc, Weak};

/// A non-owning handle to the [`Client`] an entity was hydrated for.
///
/// Entities never keep their client alive. Continuation methods upgrade the handle when they
/// run and fail if the client has since been dropped. A handle built with
/// [`ClientHandle::detached`] (the default) never upgrades, which is what manually constructed
/// entities get.
#[derive(Clone, Default)]
pub struct ClientHandle(Option<Weak<dyn Client>>);

impl ClientHandle {
    /// Creates a handle pointing at `client` without taking ownership of it.
    pub fn new<C: Client + 'static>(client: &Arc<C>) -> Self {
        Self::from_weak(Arc::downgrade(client))
    }

    /// Creates a handle from an existing weak reference.
    ///
    /// Useful for clients that hand out handles to themselves (see [`Arc::new_cyclic`]).
    pub fn from_weak<C: Client + 'static>(client: Weak<C>) -> Self {
        let client: Weak<dyn Client> = client;
        Self(Some(client))
    }

    /// A handle that is not attached to any client.
    pub fn detached() -> Self {
        Self(None)
    }

    /// The client, if it is still alive.
    pub fn upgrade(&self) -> Option<Arc<dyn Client>> {
        self.0.as_ref().and_then(Weak::upgrade)
    }

    /// Whether the handle still points at a live client.
    pub fn is_attached(&self) -> bool {
        self.0.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }
}

/// Two handles are equal when they point at the same client (or are both detached).
impl PartialEq for ClientHandle {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.0 {
            None => "detached",
            Some(weak) if weak.strong_count() == 0 => "dropped",
            Some(_) => "attached",
        };
        f.debug_tuple("ClientHandle").field(&state).finish()
    }
}

/// Behavior common to every hydrated entity.
pub trait Entity {
    /// The opaque identifier YouTube uses for this entity.
    ///
    /// Set during hydration and never changed afterwards.
    fn id(&self) -> &str;

    /// The client this entity was hydrated for.
    fn client(&self) -> &ClientHandle;
}
