//! Opaque execution context.
//!
//! A [`Context`] is an immutable chain of typed values that travels with a
//! call. Deriving a context with [`Context::with_value`] never affects the
//! parent, and cloning is a reference-count bump.
//!
//! Values are keyed by a type implementing [`ContextKey`]. Lookups match on the
//! key's `TypeId`, so a private key type cannot collide with any key defined
//! elsewhere, whatever its name.
//!
//! ```rust
//! use ctxlog::{Context, ContextKey};
//!
//! struct Attempt;
//! impl ContextKey for Attempt {
//!     type Value = u32;
//! }
//!
//! let ctx = Context::background().with_value::<Attempt>(2);
//! assert_eq!(ctx.value::<Attempt>(), Some(&2));
//! assert_eq!(Context::background().value::<Attempt>(), None);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A key for values stored in a [`Context`].
pub trait ContextKey: 'static {
    type Value: Send + Sync + 'static;
}

struct Node {
    key: TypeId,
    value: Box<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Immutable per-call execution context.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Node>>,
}

impl Context {
    /// The empty root context.
    pub const fn background() -> Self {
        Self { head: None }
    }

    /// A child context carrying `value` under key `K`, shadowing any value
    /// the parent holds for the same key.
    pub fn with_value<K: ContextKey>(&self, value: K::Value) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key: TypeId::of::<K>(),
                value: Box::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// The nearest value stored under key `K`.
    pub fn value<K: ContextKey>(&self) -> Option<&K::Value> {
        let wanted = TypeId::of::<K>();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == wanted {
                return n.value.downcast_ref::<K::Value>();
            }
            node = n.parent.as_deref();
        }
        None
    }

    pub fn is_background(&self) -> bool {
        self.head.is_none()
    }

    /// Whether both contexts are the same chain.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            depth += 1;
            node = n.parent.as_deref();
        }
        depth
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.depth())
            .finish()
    }
}

// ============================================================================
// Request ID
// ============================================================================

struct RequestIdKey;

impl ContextKey for RequestIdKey {
    type Value = String;
}

pub fn context_with_request_id(ctx: &Context, request_id: impl Into<String>) -> Context {
    ctx.with_value::<RequestIdKey>(request_id.into())
}

/// The request ID attached to `ctx`, if any.
pub fn request_id(ctx: &Context) -> Option<&str> {
    ctx.value::<RequestIdKey>().map(String::as_str)
}

/// A fresh random request ID.
pub fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// Tenancy
// ============================================================================

/// Identity of the tenant a call is made on behalf of.
pub trait TenancyInfo: Send + Sync {
    fn tenant_id(&self) -> &str;
    fn partition_id(&self) -> &str;
    fn profile_id(&self) -> &str;
    fn access_id(&self) -> &str;
    fn contact_id(&self) -> &str;
    fn session_id(&self) -> &str;
    fn device_id(&self) -> &str;
    fn roles(&self) -> &[String];
}

struct TenancyKey;

impl ContextKey for TenancyKey {
    type Value = Arc<dyn TenancyInfo>;
}

pub fn set_tenancy(ctx: &Context, info: Arc<dyn TenancyInfo>) -> Context {
    ctx.with_value::<TenancyKey>(info)
}

pub fn tenancy(ctx: &Context) -> Option<Arc<dyn TenancyInfo>> {
    ctx.value::<TenancyKey>().cloned()
}
